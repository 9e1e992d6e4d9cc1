use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    domain::{binding::ServiceBinding, errors::BrokerError},
    infrastructure::BindingRepository,
};

#[derive(Default)]
pub struct InMemoryBindingRepository {
    bindings_by_id: RwLock<HashMap<String, ServiceBinding>>,
}

impl InMemoryBindingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BindingRepository for InMemoryBindingRepository {
    async fn find(&self, id: &str) -> Result<Option<ServiceBinding>, BrokerError> {
        Ok(self.bindings_by_id.read().await.get(id).cloned())
    }

    async fn save(&self, binding: &ServiceBinding) -> Result<(), BrokerError> {
        self.bindings_by_id
            .write()
            .await
            .insert(binding.id.clone(), binding.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), BrokerError> {
        self.bindings_by_id.write().await.remove(id);
        Ok(())
    }
}
