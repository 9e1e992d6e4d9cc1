use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    domain::{errors::BrokerError, instance::ServiceInstance},
    infrastructure::InstanceRepository,
};

#[derive(Default)]
pub struct InMemoryInstanceRepository {
    instances_by_id: RwLock<HashMap<String, ServiceInstance>>,
}

impl InMemoryInstanceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InstanceRepository for InMemoryInstanceRepository {
    async fn find(&self, id: &str) -> Result<Option<ServiceInstance>, BrokerError> {
        Ok(self.instances_by_id.read().await.get(id).cloned())
    }

    async fn save(&self, instance: &ServiceInstance) -> Result<(), BrokerError> {
        self.instances_by_id
            .write()
            .await
            .insert(instance.id.clone(), instance.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), BrokerError> {
        self.instances_by_id.write().await.remove(id);
        Ok(())
    }
}
