use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::{
    domain::{
        errors::BrokerError,
        instance::ServiceInstance,
        last_operation::{LastOperation, Operation},
    },
    infrastructure::BrokeredService,
};

pub const USERNAME_KEY: &str = "username";
pub const PASSWORD_KEY: &str = "password";

/// In-process stand-in for the "Hello" backing service.
///
/// In async mode every mutating call answers with an in-progress record and
/// parks the operation kind; the next `last_operation` call completes it.
/// In sync mode calls complete immediately. Create attaches generated
/// credentials to the instance parameters, which bindings later snapshot.
pub struct HelloService {
    async_mode: bool,
    pending: RwLock<HashMap<String, Operation>>,
}

impl HelloService {
    pub fn new(async_mode: bool) -> Self {
        Self {
            async_mode,
            pending: RwLock::new(HashMap::new()),
        }
    }

    async fn begin(&self, operation: Operation, id: &str) -> LastOperation {
        if self.async_mode {
            self.pending.write().await.insert(id.to_string(), operation);
            debug!(instance_id = %id, %operation, "hello backend started async work");
            LastOperation::in_progress(operation, in_progress_description(operation))
        } else {
            LastOperation::succeeded(operation, completed_description(operation))
        }
    }
}

#[async_trait]
impl BrokeredService for HelloService {
    fn is_async(&self) -> bool {
        self.async_mode
    }

    async fn create_instance(
        &self,
        instance: &mut ServiceInstance,
    ) -> Result<LastOperation, BrokerError> {
        instance.add_parameter(USERNAME_KEY, json!(format!("user-{}", instance.id)));
        instance.add_parameter(PASSWORD_KEY, json!(Uuid::new_v4().to_string()));
        Ok(self.begin(Operation::Create, &instance.id).await)
    }

    async fn update_instance(
        &self,
        instance: &mut ServiceInstance,
    ) -> Result<LastOperation, BrokerError> {
        Ok(self.begin(Operation::Update, &instance.id).await)
    }

    async fn delete_instance(
        &self,
        instance: &mut ServiceInstance,
    ) -> Result<LastOperation, BrokerError> {
        Ok(self.begin(Operation::Delete, &instance.id).await)
    }

    async fn last_operation(
        &self,
        instance: &ServiceInstance,
    ) -> Result<LastOperation, BrokerError> {
        if let Some(operation) = self.pending.write().await.remove(&instance.id) {
            debug!(instance_id = %instance.id, %operation, "hello backend finished async work");
            return Ok(LastOperation::succeeded(
                operation,
                completed_description(operation),
            ));
        }

        match instance.last_operation.clone() {
            Some(record) => Ok(record),
            None => Err(BrokerError::storage(format!(
                "no operation recorded for instance {}",
                instance.id
            ))),
        }
    }
}

fn in_progress_description(operation: Operation) -> &'static str {
    match operation {
        Operation::Create => "creating.",
        Operation::Update => "updating.",
        Operation::Delete => "deleting.",
    }
}

fn completed_description(operation: Operation) -> &'static str {
    match operation {
        Operation::Create => "created.",
        Operation::Update => "updated.",
        Operation::Delete => "deleted.",
    }
}

#[cfg(test)]
mod tests {
    use super::{HelloService, PASSWORD_KEY, USERNAME_KEY};
    use crate::{
        domain::{
            instance::{NewInstance, ServiceInstance},
            last_operation::{Operation, OperationState},
        },
        infrastructure::BrokeredService,
    };

    fn sample(id: &str) -> ServiceInstance {
        ServiceInstance::create(NewInstance {
            id: id.into(),
            service_definition_id: "service-def".into(),
            plan_id: "plan".into(),
            organization_guid: "org".into(),
            space_guid: "space".into(),
            parameters: Default::default(),
            accepts_incomplete: true,
        })
    }

    #[tokio::test]
    async fn sync_mode_completes_immediately() {
        let backend = HelloService::new(false);
        let mut instance = sample("sync");

        let record = backend
            .create_instance(&mut instance)
            .await
            .expect("create works");
        assert_eq!(record.state, OperationState::Succeeded);
        assert!(instance.parameter(USERNAME_KEY).is_some());
        assert!(instance.parameter(PASSWORD_KEY).is_some());
    }

    #[tokio::test]
    async fn async_mode_completes_on_poll() {
        let backend = HelloService::new(true);
        let mut instance = sample("async");

        let record = backend
            .create_instance(&mut instance)
            .await
            .expect("create works");
        assert_eq!(record.state, OperationState::InProgress);
        instance.record_operation(record);

        let refreshed = backend
            .last_operation(&instance)
            .await
            .expect("poll works");
        assert_eq!(refreshed.operation, Operation::Create);
        assert_eq!(refreshed.state, OperationState::Succeeded);
    }

    #[tokio::test]
    async fn poll_without_pending_work_echoes_stored_record() {
        let backend = HelloService::new(true);
        let mut instance = sample("echo");

        let record = backend
            .create_instance(&mut instance)
            .await
            .expect("create works");
        instance.record_operation(record);

        let first = backend
            .last_operation(&instance)
            .await
            .expect("poll works");
        instance.record_operation(first.clone());

        let second = backend
            .last_operation(&instance)
            .await
            .expect("poll works");
        assert_eq!(second, first);
    }
}
