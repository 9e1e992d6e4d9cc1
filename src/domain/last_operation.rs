use std::fmt;

use serde::{Deserialize, Serialize};

/// The lifecycle action a [`LastOperation`] record belongs to.
///
/// The kind is carried on the record itself rather than inferred from the
/// request that triggered it, so a poll can tell "the last thing that
/// happened was a delete" apart from a create or update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// Progress of a lifecycle action. Serialized with the wire strings the
/// platform polls for (`"in progress"`, `"succeeded"`, `"failed"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationState {
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "succeeded")]
    Succeeded,
    #[serde(rename = "failed")]
    Failed,
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InProgress => "in progress",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Status record of the most recent lifecycle action on a service instance.
///
/// Written exclusively by the instance service: created when a mutating
/// request is accepted, driven to a terminal state by the backend either
/// synchronously or through later polls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastOperation {
    pub operation: Operation,
    pub state: OperationState,
    pub description: String,
}

impl LastOperation {
    pub fn new(
        operation: Operation,
        state: OperationState,
        description: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            state,
            description: description.into(),
        }
    }

    pub fn in_progress(operation: Operation, description: impl Into<String>) -> Self {
        Self::new(operation, OperationState::InProgress, description)
    }

    pub fn succeeded(operation: Operation, description: impl Into<String>) -> Self {
        Self::new(operation, OperationState::Succeeded, description)
    }

    pub fn failed(operation: Operation, description: impl Into<String>) -> Self {
        Self::new(operation, OperationState::Failed, description)
    }

    pub fn is_in_progress(&self) -> bool {
        self.state == OperationState::InProgress
    }

    pub fn is_succeeded(&self) -> bool {
        self.state == OperationState::Succeeded
    }

    pub fn is_delete(&self) -> bool {
        self.operation == Operation::Delete
    }
}
