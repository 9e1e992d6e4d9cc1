use std::sync::Arc;

use crate::application::{binding_service::BindingService, instance_service::InstanceService};

#[derive(Clone)]
pub struct AppState {
    pub instance_service: Arc<InstanceService>,
    pub binding_service: Arc<BindingService>,
}

impl AppState {
    pub fn new(
        instance_service: Arc<InstanceService>,
        binding_service: Arc<BindingService>,
    ) -> Self {
        Self {
            instance_service,
            binding_service,
        }
    }
}
