use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    binding::NewBinding,
    errors::BrokerError,
    instance::{InstanceUpdate, NewInstance, ServiceInstance},
    last_operation::{LastOperation, OperationState},
};

#[derive(Debug, Deserialize)]
pub struct CreateServiceInstanceRequest {
    pub service_id: String,
    pub plan_id: String,
    pub organization_guid: String,
    pub space_guid: String,
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
}

impl CreateServiceInstanceRequest {
    pub fn validate(&self) -> Result<(), BrokerError> {
        if self.service_id.trim().is_empty() {
            return Err(BrokerError::validation("service_id must not be blank"));
        }
        if self.plan_id.trim().is_empty() {
            return Err(BrokerError::validation("plan_id must not be blank"));
        }
        Ok(())
    }

    pub fn into_new_instance(self, instance_id: &str, accepts_incomplete: bool) -> NewInstance {
        NewInstance {
            id: instance_id.to_string(),
            service_definition_id: self.service_id,
            plan_id: self.plan_id,
            organization_guid: self.organization_guid,
            space_guid: self.space_guid,
            parameters: self.parameters,
            accepts_incomplete,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateServiceInstanceRequest {
    pub service_id: String,
    // Accepted on the wire but not applied: plan and identity fields are
    // fixed once the instance exists.
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
}

impl UpdateServiceInstanceRequest {
    pub fn validate(&self) -> Result<(), BrokerError> {
        if self.service_id.trim().is_empty() {
            return Err(BrokerError::validation("service_id must not be blank"));
        }
        Ok(())
    }

    pub fn into_update(self, accepts_incomplete: bool) -> InstanceUpdate {
        InstanceUpdate {
            parameters: self.parameters,
            accepts_incomplete,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateServiceBindingRequest {
    pub service_id: String,
    pub plan_id: String,
    #[serde(default)]
    pub bind_resource: Option<BindResource>,
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct BindResource {
    #[serde(default)]
    pub app_guid: Option<String>,
}

impl CreateServiceBindingRequest {
    pub fn validate(&self) -> Result<(), BrokerError> {
        if self.service_id.trim().is_empty() {
            return Err(BrokerError::validation("service_id must not be blank"));
        }
        if self.plan_id.trim().is_empty() {
            return Err(BrokerError::validation("plan_id must not be blank"));
        }
        Ok(())
    }

    pub fn into_new_binding(self, binding_id: &str) -> NewBinding {
        NewBinding {
            id: binding_id.to_string(),
            service_definition_id: self.service_id,
            plan_id: self.plan_id,
            app_guid: self.bind_resource.and_then(|resource| resource.app_guid),
            parameters: self.parameters,
        }
    }
}

/// Body of create/update/delete responses: whether the operation runs
/// asynchronously, i.e. the caller's `accepts_incomplete` choice echoed back.
#[derive(Debug, Serialize)]
pub struct ServiceInstanceResponse {
    #[serde(rename = "async")]
    pub asynchronous: bool,
}

impl From<&ServiceInstance> for ServiceInstanceResponse {
    fn from(instance: &ServiceInstance) -> Self {
        Self {
            asynchronous: instance.accepts_incomplete,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LastOperationResponse {
    pub state: OperationState,
    pub description: String,
    pub delete_operation: bool,
}

impl From<&LastOperation> for LastOperationResponse {
    fn from(record: &LastOperation) -> Self {
        Self {
            state: record.state,
            description: record.description.clone(),
            delete_operation: record.is_delete(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceBindingResponse {
    pub credentials: HashMap<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
