use std::sync::Arc;

use tracing::info;

use crate::{
    application::dto::CreateServiceBindingRequest,
    domain::{binding::ServiceBinding, errors::BrokerError},
    infrastructure::{BindingRepository, InstanceRepository},
};

/// Binding lifecycle. Bindings complete synchronously: credentials are a
/// snapshot of the owning instance's parameters taken at bind time.
#[derive(Clone)]
pub struct BindingService {
    instances: Arc<dyn InstanceRepository>,
    bindings: Arc<dyn BindingRepository>,
}

impl BindingService {
    pub fn new(instances: Arc<dyn InstanceRepository>, bindings: Arc<dyn BindingRepository>) -> Self {
        Self {
            instances,
            bindings,
        }
    }

    pub async fn create_binding(
        &self,
        instance_id: &str,
        binding_id: &str,
        request: CreateServiceBindingRequest,
    ) -> Result<ServiceBinding, BrokerError> {
        request.validate()?;

        let Some(instance) = self.instances.find(instance_id).await? else {
            return Err(BrokerError::not_found(format!(
                "service instance {instance_id} not found"
            )));
        };
        if instance.in_progress() {
            return Err(BrokerError::operation_in_progress(format!(
                "service instance {instance_id} has an operation in progress"
            )));
        }
        if self.bindings.find(binding_id).await?.is_some() {
            return Err(BrokerError::binding_exists(binding_id));
        }

        let binding = ServiceBinding::create(request.into_new_binding(binding_id), &instance);
        self.bindings.save(&binding).await?;
        info!(instance_id = %instance_id, binding_id = %binding_id, "service binding created");
        Ok(binding)
    }

    pub async fn delete_binding(
        &self,
        instance_id: &str,
        binding_id: &str,
    ) -> Result<(), BrokerError> {
        if self.instances.find(instance_id).await?.is_none() {
            return Err(BrokerError::not_found(format!(
                "service instance {instance_id} not found"
            )));
        }

        let Some(binding) = self.bindings.find(binding_id).await? else {
            return Err(BrokerError::gone(format!(
                "service binding {binding_id} no longer exists"
            )));
        };
        if binding.service_instance_id != instance_id {
            return Err(BrokerError::not_found(format!(
                "service binding {binding_id} does not belong to instance {instance_id}"
            )));
        }

        self.bindings.delete(binding_id).await?;
        info!(instance_id = %instance_id, binding_id = %binding_id, "service binding removed");
        Ok(())
    }
}
