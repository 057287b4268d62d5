//! Controlador de ciclo de vida del job de release.
//!
//! Cada operación decodifica el spec opaco del job, lo muta y lo vuelve a
//! escribir en el job. El controlador no guarda estado propio entre
//! llamadas fuera del job mismo.
use std::sync::Arc;

use async_trait::async_trait;
use deploy_core::{CancellationToken, Job, JobController, JobError, JobSpecCodec, Result, TaskDescriptor, Workflow};
use log::{debug, error, info};

use crate::discovery::Discoverer;
use crate::merger::select_defaults;
use crate::spec::ReleaseJobSpec;
use crate::tasks::expand_tasks;

pub struct ReleaseJobController {
    job: Job,
    workflow_name: String,
    project: String,
    discoverer: Arc<Discoverer>,
    cancel: CancellationToken,
}

impl ReleaseJobController {
    pub fn new(job: Job, workflow: &Workflow, discoverer: Arc<Discoverer>) -> Result<Self> {
        if job.job_type != ReleaseJobSpec::JOB_TYPE {
            return Err(JobError::UnsupportedJobType(job.job_type));
        }
        Ok(Self { job,
                  workflow_name: workflow.name.clone(),
                  project: workflow.project.clone(),
                  discoverer,
                  cancel: CancellationToken::new() })
    }

    /// Token que corta toda llamada externa en curso o futura.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Spec tipado tal como está ahora en el job.
    pub fn spec(&self) -> Result<ReleaseJobSpec> {
        ReleaseJobSpec::decode_job(&self.job)
    }

    fn write_back(&mut self, spec: &ReleaseJobSpec) -> Result<()> {
        self.job.spec = spec.encode()?;
        Ok(())
    }

    fn decode(&self, operation: &str) -> Result<ReleaseJobSpec> {
        self.spec().inspect_err(|e| error!("{operation} on job {}: {e}", self.job.name))
    }
}

#[async_trait]
impl JobController for ReleaseJobController {
    fn job(&self) -> &Job {
        &self.job
    }

    async fn instantiate(&mut self) -> Result<()> {
        let spec = self.decode("instantiate")?;
        self.write_back(&spec)
    }

    async fn set_preset(&mut self) -> Result<()> {
        let mut spec = self.decode("set_preset")?;
        // un único descubrimiento alimenta opciones y selección
        let options = self.discoverer.discover(&self.project, &self.cancel).await?;
        spec.service_config.services = select_defaults(&options, &spec.env_config.name, &spec.service_config.default_services);
        spec.env_options = options;
        self.write_back(&spec)?;
        info!("set_preset on job {}: {} option env(s), {} service(s) preselected",
              self.job.name,
              spec.env_options.len(),
              spec.service_config.services.len());
        Ok(())
    }

    async fn clear_selection_field(&mut self) -> Result<()> {
        let mut spec = self.decode("clear_selection_field")?;
        spec.clear_selection();
        self.write_back(&spec)
    }

    async fn set_options(&mut self) -> Result<()> {
        let mut spec = self.decode("set_options")?;
        spec.env_options = self.discoverer.discover(&self.project, &self.cancel).await?;
        self.write_back(&spec)?;
        info!("set_options on job {}: {} option env(s)", self.job.name, spec.env_options.len());
        Ok(())
    }

    async fn clear_options(&mut self) -> Result<()> {
        let mut spec = self.decode("clear_options")?;
        spec.env_options = Vec::new();
        self.write_back(&spec)
    }

    // el spec actual se descarta: no se decodifica
    async fn merge_args(&mut self, args: &Job) -> Result<()> {
        if !self.job.same_identity(args) {
            let err = JobError::NotFound(format!("merge args target job {} of type {}, not job {} of type {}",
                                                 args.name, args.job_type, self.job.name, self.job.job_type));
            error!("merge_args on job {}: {err}", self.job.name);
            return Err(err);
        }
        let spec = ReleaseJobSpec::decode_job(args).inspect_err(|e| error!("merge_args on job {}: {e}", self.job.name))?;
        self.write_back(&spec)?;
        debug!("merge_args on job {}: spec replaced", self.job.name);
        Ok(())
    }

    async fn update_with_latest_setting(&mut self) -> Result<()> {
        let mut spec = self.decode("update_with_latest_setting")?;
        let guard = self.discoverer.guard(&self.cancel);
        let store = Arc::clone(self.discoverer.store());
        let latest_workflow =
            guard.run("find_workflow", store.find_workflow(&self.workflow_name))
                 .await?
                 .ok_or_else(|| JobError::NotFound(format!("workflow {}", self.workflow_name)))
                 .inspect_err(|e| error!("update_with_latest_setting on job {}: {e}", self.job.name))?;
        let latest_job = latest_workflow.find_job(&self.job.name, self.job.job_type)
                                        .ok_or_else(|| {
                                            JobError::NotFound(format!("job {} of type {} in workflow {}",
                                                                       self.job.name, self.job.job_type, self.workflow_name))
                                        })
                                        .inspect_err(|e| error!("update_with_latest_setting on job {}: {e}", self.job.name))?;
        let latest = ReleaseJobSpec::decode_job(latest_job)?;
        spec.absorb_template(&latest);
        self.write_back(&spec)?;
        info!("update_with_latest_setting on job {}: template fields refreshed", self.job.name);
        Ok(())
    }

    async fn to_jobs(&mut self, task_id: i64) -> Result<Vec<TaskDescriptor>> {
        let mut spec = self.decode("to_jobs")?;
        spec.resolve_upstream();
        self.write_back(&spec)?;
        if spec.service_config.services.is_empty() {
            return Ok(Vec::new());
        }

        let guard = self.discoverer.guard(&self.cancel);
        let store = Arc::clone(self.discoverer.store());
        let environments = guard.run("list_environments", store.list_environments(&self.project)).await?;
        let env_name = &spec.env_config.name;
        let env = environments.iter()
                              .find(|env| &env.name == env_name)
                              .ok_or_else(|| {
                                  JobError::Configuration(format!("environment '{env_name}' is not registered for project {}", self.project))
                              })
                              .inspect_err(|e| error!("to_jobs on job {}: {e}", self.job.name))?;
        let tasks = expand_tasks(task_id, &self.job.name, &spec, env);
        info!("to_jobs on job {}: {} task(s) for env {env_name}", self.job.name, tasks.len());
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploy_core::{JobType, Stage};
    use serde_json::json;

    struct NoStore;

    #[async_trait]
    impl deploy_core::WorkflowStore for NoStore {
        async fn find_default_account(&self, _project: &str) -> Result<Option<deploy_core::Account>> {
            Ok(None)
        }
        async fn list_environments(&self, _project: &str) -> Result<Vec<deploy_core::Environment>> {
            Ok(Vec::new())
        }
        async fn find_workflow(&self, _name: &str) -> Result<Option<Workflow>> {
            Ok(None)
        }
    }

    struct NoPlatform;

    #[async_trait]
    impl deploy_core::PlatformConnector for NoPlatform {
        async fn connect(&self, _account: &deploy_core::Account, _region_id: &str) -> Result<Arc<dyn deploy_core::PlatformClient>> {
            Err(JobError::platform("connect", "unreachable in unit tests"))
        }
    }

    fn discoverer() -> Arc<Discoverer> {
        Arc::new(Discoverer::new(Arc::new(NoStore), Arc::new(NoPlatform), Default::default()).unwrap())
    }

    fn workflow() -> Workflow {
        Workflow { name: "wf".into(),
                   project: "P".into(),
                   stages: vec![Stage { name: "s".into(),
                                        jobs: vec![] }] }
    }

    #[test]
    fn rejects_other_job_types() {
        let job = Job::new("build", JobType::Build, json!({}));
        let err = ReleaseJobController::new(job, &workflow(), discoverer()).err();
        assert_eq!(err, Some(JobError::UnsupportedJobType(JobType::Build)));
    }

    #[tokio::test]
    async fn malformed_spec_is_decode_error() {
        let job = Job::new("ship", JobType::PlatformRelease, json!({"envConfig": 5}));
        let mut ctl = ReleaseJobController::new(job, &workflow(), discoverer()).unwrap();
        assert!(matches!(ctl.instantiate().await, Err(JobError::Decode(_))));
        assert!(matches!(ctl.clear_options().await, Err(JobError::Decode(_))));
    }

    #[tokio::test]
    async fn instantiate_normalizes_null_spec() {
        let job = Job::new("ship", JobType::PlatformRelease, serde_json::Value::Null);
        let mut ctl = ReleaseJobController::new(job, &workflow(), discoverer()).unwrap();
        ctl.instantiate().await.unwrap();
        assert_eq!(ctl.job().spec["serviceConfig"]["source"], json!("literal"));
        assert_eq!(ctl.spec().unwrap(), ReleaseJobSpec::default());
    }

    #[tokio::test]
    async fn merge_args_rejects_foreign_job() {
        let job = Job::new("ship", JobType::PlatformRelease, json!({"envConfig": {"name": "old"}}));
        let mut ctl = ReleaseJobController::new(job, &workflow(), discoverer()).unwrap();
        let renamed = Job::new("ship-renamed", JobType::PlatformRelease, json!({"envConfig": {"name": "prod"}}));
        assert!(matches!(ctl.merge_args(&renamed).await, Err(JobError::NotFound(_))));
        assert_eq!(ctl.job().spec, json!({"envConfig": {"name": "old"}}));

        let same = Job::new("ship", JobType::PlatformRelease, json!({"envConfig": {"name": "prod"}}));
        ctl.merge_args(&same).await.unwrap();
        assert_eq!(ctl.spec().unwrap().env_config.name, "prod");
    }

    #[tokio::test]
    async fn merge_args_repairs_corrupt_spec() {
        let job = Job::new("ship", JobType::PlatformRelease, json!({"envConfig": 5}));
        let mut ctl = ReleaseJobController::new(job, &workflow(), discoverer()).unwrap();
        let args = Job::new("ship", JobType::PlatformRelease, json!({"envConfig": {"name": "dev"}}));
        ctl.merge_args(&args).await.unwrap();
        assert_eq!(ctl.spec().unwrap().env_config.name, "dev");
    }

    #[tokio::test]
    async fn malformed_args_are_decode_error() {
        let job = Job::new("ship", JobType::PlatformRelease, json!({"envConfig": {"name": "dev"}}));
        let mut ctl = ReleaseJobController::new(job, &workflow(), discoverer()).unwrap();
        let args = Job::new("ship", JobType::PlatformRelease, json!({"serviceConfig": {"services": "all"}}));
        assert!(matches!(ctl.merge_args(&args).await, Err(JobError::Decode(_))));
        assert_eq!(ctl.spec().unwrap().env_config.name, "dev");
    }

    #[tokio::test]
    async fn missing_workflow_is_not_found() {
        let job = Job::new("ship", JobType::PlatformRelease, json!({}));
        let mut ctl = ReleaseJobController::new(job, &workflow(), discoverer()).unwrap();
        assert!(matches!(ctl.update_with_latest_setting().await, Err(JobError::NotFound(_))));
    }
}
