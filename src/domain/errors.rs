use thiserror::Error;

/// Broker-level failures surfaced to callers.
///
/// Backend provisioning failures are deliberately absent: they are captured
/// into the instance's `LastOperation` as a failed record so a later poll
/// still sees them, instead of being raised here.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("this broker only supports asynchronous operations: {0}")]
    AsyncRequired(String),
    #[error("an operation is already in progress: {0}")]
    OperationInProgress(String),
    #[error("service instance already exists: {0}")]
    InstanceExists(String),
    #[error("service binding already exists: {0}")]
    BindingExists(String),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("resource is gone: {0}")]
    Gone(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl BrokerError {
    pub fn async_required(message: impl Into<String>) -> Self {
        Self::AsyncRequired(message.into())
    }

    pub fn operation_in_progress(message: impl Into<String>) -> Self {
        Self::OperationInProgress(message.into())
    }

    pub fn instance_exists(message: impl Into<String>) -> Self {
        Self::InstanceExists(message.into())
    }

    pub fn binding_exists(message: impl Into<String>) -> Self {
        Self::BindingExists(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn gone(message: impl Into<String>) -> Self {
        Self::Gone(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}
