use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::last_operation::LastOperation;

/// A provisioned unit of the brokered service, keyed by the platform-assigned
/// instance id. Identity fields are fixed at creation; only the parameter map
/// and the lifecycle record change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstance {
    pub id: String,
    pub service_definition_id: String,
    pub plan_id: String,
    pub organization_guid: String,
    pub space_guid: String,
    pub parameters: HashMap<String, Value>,
    pub accepts_incomplete: bool,
    pub last_operation: Option<LastOperation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything needed to construct a fresh instance from a provision request.
#[derive(Debug, Clone)]
pub struct NewInstance {
    pub id: String,
    pub service_definition_id: String,
    pub plan_id: String,
    pub organization_guid: String,
    pub space_guid: String,
    pub parameters: HashMap<String, Value>,
    pub accepts_incomplete: bool,
}

/// Mutable fields an update request may touch.
#[derive(Debug, Clone)]
pub struct InstanceUpdate {
    pub parameters: HashMap<String, Value>,
    pub accepts_incomplete: bool,
}

impl ServiceInstance {
    pub fn create(new: NewInstance) -> Self {
        let now = Utc::now();
        Self {
            id: new.id,
            service_definition_id: new.service_definition_id,
            plan_id: new.plan_id,
            organization_guid: new.organization_guid,
            space_guid: new.space_guid,
            parameters: new.parameters,
            accepts_incomplete: new.accepts_incomplete,
            last_operation: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge an update into the instance: request parameters overwrite
    /// existing keys, identity fields stay untouched.
    pub fn apply_update(&mut self, update: InstanceUpdate) {
        self.parameters.extend(update.parameters);
        self.accepts_incomplete = update.accepts_incomplete;
        self.updated_at = Utc::now();
    }

    pub fn record_operation(&mut self, record: LastOperation) {
        self.last_operation = Some(record);
        self.updated_at = Utc::now();
    }

    /// True while a lifecycle action is still running for this instance.
    /// No new mutating request may be accepted in that state.
    pub fn in_progress(&self) -> bool {
        self.last_operation
            .as_ref()
            .is_some_and(LastOperation::is_in_progress)
    }

    pub fn add_parameter(&mut self, key: impl Into<String>, value: Value) {
        self.parameters.insert(key.into(), value);
    }

    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key)
    }
}
