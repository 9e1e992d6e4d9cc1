use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::instance::ServiceInstance;

/// Credentials handed to an application bound to a service instance.
///
/// The credential map is a snapshot: the owning instance's parameters
/// overlaid with whatever the bind request supplied. Bindings complete
/// synchronously and carry no lifecycle record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceBinding {
    pub id: String,
    pub service_instance_id: String,
    pub service_definition_id: String,
    pub plan_id: String,
    pub app_guid: Option<String>,
    pub parameters: HashMap<String, Value>,
    pub credentials: HashMap<String, Value>,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to construct a binding from a bind request.
#[derive(Debug, Clone)]
pub struct NewBinding {
    pub id: String,
    pub service_definition_id: String,
    pub plan_id: String,
    pub app_guid: Option<String>,
    pub parameters: HashMap<String, Value>,
}

impl ServiceBinding {
    pub fn create(new: NewBinding, instance: &ServiceInstance) -> Self {
        let mut credentials = instance.parameters.clone();
        credentials.extend(new.parameters.clone());

        Self {
            id: new.id,
            service_instance_id: instance.id.clone(),
            service_definition_id: new.service_definition_id,
            plan_id: new.plan_id,
            app_guid: new.app_guid,
            parameters: new.parameters,
            credentials,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{NewBinding, ServiceBinding};
    use crate::domain::instance::{NewInstance, ServiceInstance};

    #[test]
    fn credentials_overlay_instance_parameters() {
        let instance = ServiceInstance::create(NewInstance {
            id: "instance-1".into(),
            service_definition_id: "service-def".into(),
            plan_id: "plan".into(),
            organization_guid: "org".into(),
            space_guid: "space".into(),
            parameters: [
                ("username".to_string(), json!("world")),
                ("password".to_string(), json!("guest")),
            ]
            .into(),
            accepts_incomplete: false,
        });

        let binding = ServiceBinding::create(
            NewBinding {
                id: "binding-1".into(),
                service_definition_id: "service-def".into(),
                plan_id: "plan".into(),
                app_guid: Some("app".into()),
                parameters: [("password".to_string(), json!("override"))].into(),
            },
            &instance,
        );

        assert_eq!(binding.credentials["username"], json!("world"));
        assert_eq!(binding.credentials["password"], json!("override"));
        assert_eq!(binding.service_instance_id, "instance-1");
    }
}
