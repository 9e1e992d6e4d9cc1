use async_trait::async_trait;

use crate::domain::{
    binding::ServiceBinding, errors::BrokerError, instance::ServiceInstance,
    last_operation::LastOperation,
};

pub mod hello_service;
pub mod in_memory_binding_repository;
pub mod in_memory_instance_repository;

#[async_trait]
pub trait InstanceRepository: Send + Sync {
    async fn find(&self, id: &str) -> Result<Option<ServiceInstance>, BrokerError>;
    async fn save(&self, instance: &ServiceInstance) -> Result<(), BrokerError>;
    async fn delete(&self, id: &str) -> Result<(), BrokerError>;
}

#[async_trait]
pub trait BindingRepository: Send + Sync {
    async fn find(&self, id: &str) -> Result<Option<ServiceBinding>, BrokerError>;
    async fn save(&self, binding: &ServiceBinding) -> Result<(), BrokerError>;
    async fn delete(&self, id: &str) -> Result<(), BrokerError>;
}

/// The pluggable backend that performs the real provisioning work for one
/// brokered service type.
///
/// Each mutating call may do the actual work and must return promptly with
/// either a terminal record or an in-progress one; `last_operation` is only
/// consulted while the stored record is still in progress. Mutating calls
/// take the instance mutably so a backend can attach connection or
/// credential material to its parameters.
#[async_trait]
pub trait BrokeredService: Send + Sync {
    /// Whether provisioning runs asynchronously. When true, callers must
    /// opt into incomplete responses before any mutating call is accepted.
    fn is_async(&self) -> bool;

    async fn create_instance(
        &self,
        instance: &mut ServiceInstance,
    ) -> Result<LastOperation, BrokerError>;

    async fn update_instance(
        &self,
        instance: &mut ServiceInstance,
    ) -> Result<LastOperation, BrokerError>;

    async fn delete_instance(
        &self,
        instance: &mut ServiceInstance,
    ) -> Result<LastOperation, BrokerError>;

    async fn last_operation(
        &self,
        instance: &ServiceInstance,
    ) -> Result<LastOperation, BrokerError>;
}
