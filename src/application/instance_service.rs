use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    application::dto::{
        CreateServiceInstanceRequest, LastOperationResponse, UpdateServiceInstanceRequest,
    },
    domain::{
        errors::BrokerError,
        instance::ServiceInstance,
        last_operation::{LastOperation, Operation},
    },
    infrastructure::{BrokeredService, InstanceRepository},
};

/// Coordinates the provisioning lifecycle of service instances against the
/// backend and the instance store.
///
/// The instance's `last_operation` is written exclusively here. Each
/// operation runs its load/validate/invoke/persist sequence under a
/// per-instance-id mutex, so the in-progress guard is checked and the new
/// record written atomically with respect to the store. That guard is the
/// entire concurrency-control mechanism.
#[derive(Clone)]
pub struct InstanceService {
    repository: Arc<dyn InstanceRepository>,
    backend: Arc<dyn BrokeredService>,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl InstanceService {
    pub fn new(repository: Arc<dyn InstanceRepository>, backend: Arc<dyn BrokeredService>) -> Self {
        Self {
            repository,
            backend,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Provision a new instance. Refused before any backend or store write
    /// when the backend is asynchronous and the caller did not opt in.
    pub async fn create_instance(
        &self,
        instance_id: &str,
        request: CreateServiceInstanceRequest,
        accepts_incomplete: bool,
    ) -> Result<ServiceInstance, BrokerError> {
        request.validate()?;
        self.require_async_accepted(instance_id, accepts_incomplete)?;

        let lock = self.lock_for(instance_id).await;
        let _guard = lock.lock().await;

        if self.repository.find(instance_id).await?.is_some() {
            return Err(BrokerError::instance_exists(instance_id));
        }

        let mut instance =
            ServiceInstance::create(request.into_new_instance(instance_id, accepts_incomplete));
        let record = match self.backend.create_instance(&mut instance).await {
            Ok(record) => record,
            Err(err) => failed_record(Operation::Create, instance_id, &err),
        };

        info!(
            instance_id = %instance.id,
            operation = %record.operation,
            state = %record.state,
            "provision request accepted"
        );
        instance.record_operation(record);
        self.repository.save(&instance).await?;
        Ok(instance)
    }

    /// Update an existing instance. Rejected while another operation is
    /// still running for the same id.
    pub async fn update_instance(
        &self,
        instance_id: &str,
        request: UpdateServiceInstanceRequest,
        accepts_incomplete: bool,
    ) -> Result<ServiceInstance, BrokerError> {
        request.validate()?;
        self.require_async_accepted(instance_id, accepts_incomplete)?;

        let lock = self.lock_for(instance_id).await;
        let _guard = lock.lock().await;

        let mut instance = self.find_required(instance_id).await?;
        require_idle(&instance)?;

        instance.apply_update(request.into_update(accepts_incomplete));
        let record = match self.backend.update_instance(&mut instance).await {
            Ok(record) => record,
            Err(err) => failed_record(Operation::Update, instance_id, &err),
        };

        info!(
            instance_id = %instance.id,
            operation = %record.operation,
            state = %record.state,
            "update request accepted"
        );
        instance.record_operation(record);
        self.repository.save(&instance).await?;
        Ok(instance)
    }

    /// Deprovision an instance. A synchronously succeeded delete removes
    /// the record immediately; an in-progress one stays stored until a
    /// poll discovers completion.
    pub async fn delete_instance(
        &self,
        instance_id: &str,
        accepts_incomplete: bool,
    ) -> Result<ServiceInstance, BrokerError> {
        self.require_async_accepted(instance_id, accepts_incomplete)?;

        let lock = self.lock_for(instance_id).await;
        let _guard = lock.lock().await;

        let mut instance = self.find_required(instance_id).await?;
        require_idle(&instance)?;

        instance.accepts_incomplete = accepts_incomplete;
        let record = match self.backend.delete_instance(&mut instance).await {
            Ok(record) => record,
            Err(err) => failed_record(Operation::Delete, instance_id, &err),
        };

        info!(
            instance_id = %instance.id,
            operation = %record.operation,
            state = %record.state,
            "deprovision request accepted"
        );
        let removed = record.is_succeeded();
        instance.record_operation(record);

        if removed {
            self.repository.delete(instance_id).await?;
            self.discard_lock(instance_id).await;
            info!(instance_id = %instance.id, "service instance removed");
        } else {
            self.repository.save(&instance).await?;
        }
        Ok(instance)
    }

    /// Poll the status of the most recent lifecycle action. A missing
    /// record answers Gone, the terminal signal of a completed delete.
    pub async fn last_operation(
        &self,
        instance_id: &str,
    ) -> Result<LastOperationResponse, BrokerError> {
        let lock = self.lock_for(instance_id).await;
        let _guard = lock.lock().await;

        let Some(mut instance) = self.repository.find(instance_id).await? else {
            return Err(BrokerError::gone(format!(
                "service instance {instance_id} no longer exists"
            )));
        };

        let Some(current) = instance.last_operation.clone() else {
            return Err(BrokerError::not_found(format!(
                "no operation recorded for service instance {instance_id}"
            )));
        };

        // Terminal records are reported as stored; the backend is only
        // consulted while work is still running.
        if !current.is_in_progress() {
            return Ok(LastOperationResponse::from(&current));
        }

        let refreshed = match self.backend.last_operation(&instance).await {
            Ok(record) => record,
            Err(err) => failed_record(current.operation, instance_id, &err),
        };

        if refreshed.is_delete() && refreshed.is_succeeded() {
            // A succeeded delete is reported to this caller once, then the
            // record vanishes; subsequent polls see Gone.
            self.repository.delete(instance_id).await?;
            self.discard_lock(instance_id).await;
            info!(instance_id = %instance.id, "service instance removed after delete completed");
            return Ok(LastOperationResponse::from(&refreshed));
        }

        instance.record_operation(refreshed.clone());
        self.repository.save(&instance).await?;
        Ok(LastOperationResponse::from(&refreshed))
    }

    fn require_async_accepted(
        &self,
        instance_id: &str,
        accepts_incomplete: bool,
    ) -> Result<(), BrokerError> {
        if self.backend.is_async() && !accepts_incomplete {
            return Err(BrokerError::async_required(format!(
                "service instance {instance_id} requires accepts_incomplete=true"
            )));
        }
        Ok(())
    }

    async fn find_required(&self, instance_id: &str) -> Result<ServiceInstance, BrokerError> {
        self.repository.find(instance_id).await?.ok_or_else(|| {
            BrokerError::not_found(format!("service instance {instance_id} not found"))
        })
    }

    async fn lock_for(&self, instance_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(
            locks
                .entry(instance_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    async fn discard_lock(&self, instance_id: &str) {
        self.locks.lock().await.remove(instance_id);
    }
}

fn require_idle(instance: &ServiceInstance) -> Result<(), BrokerError> {
    if instance.in_progress() {
        return Err(BrokerError::operation_in_progress(format!(
            "service instance {} has an operation in progress",
            instance.id
        )));
    }
    Ok(())
}

fn failed_record(operation: Operation, instance_id: &str, err: &BrokerError) -> LastOperation {
    warn!(instance_id = %instance_id, %operation, error = %err, "backend call failed");
    LastOperation::failed(operation, err.to_string())
}
