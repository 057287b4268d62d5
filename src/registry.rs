//! Fábrica de controladores: asocia cada `JobType` con su implementación de
//! `JobController`. El conjunto es cerrado; los tipos que implementa otra
//! parte del engine devuelven `UnsupportedJobType`.
use std::sync::Arc;

use deploy_core::{CancellationToken, Job, JobController, JobError, JobType, PlatformConnector, Result, Workflow, WorkflowStore};
use deploy_release::{Discoverer, ReleaseJobController};
use log::debug;

use crate::config::AppConfig;

pub struct ControllerRegistry {
    discoverer: Arc<Discoverer>,
    cancel: CancellationToken,
}

impl ControllerRegistry {
    pub fn new(store: Arc<dyn WorkflowStore>, connector: Arc<dyn PlatformConnector>, config: &AppConfig) -> Result<Self> {
        let discoverer = Discoverer::new(store, connector, config.discovery.clone())?;
        Ok(Self { discoverer: Arc::new(discoverer),
                  cancel: CancellationToken::new() })
    }

    /// Token padre: cancelarlo corta las llamadas de todos los controladores
    /// creados por este registro.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn discoverer(&self) -> &Arc<Discoverer> {
        &self.discoverer
    }

    pub fn build_controller(&self, job: Job, workflow: &Workflow) -> Result<Box<dyn JobController>> {
        build_controller(job, workflow, Arc::clone(&self.discoverer), self.cancel.child_token())
    }
}

pub fn build_controller(job: Job, workflow: &Workflow, discoverer: Arc<Discoverer>, cancel: CancellationToken) -> Result<Box<dyn JobController>> {
    match job.job_type {
        JobType::PlatformRelease => {
            let controller = ReleaseJobController::new(job, workflow, discoverer)?.with_cancellation(cancel);
            Ok(Box::new(controller))
        }
        other => {
            debug!("no controller for job {} of type {other}", job.name);
            Err(JobError::UnsupportedJobType(other))
        }
    }
}
