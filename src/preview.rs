//! Recorrido de demostración: para cada job de release de un workflow,
//! `instantiate` → `set_preset` → `to_jobs`, tal como lo haría el engine al
//! abrir el job y enviarlo a ejecución sin cambios del usuario.
use deploy_core::{JobError, JobType, Result, TaskDescriptor};
use log::info;
use serde::Serialize;
use serde_json::Value;

use crate::registry::ControllerRegistry;

#[derive(Debug, Clone, Serialize)]
pub struct JobPreview {
    pub job: String,
    pub spec: Value,
    pub tasks: Vec<TaskDescriptor>,
}

pub async fn preview_workflow(registry: &ControllerRegistry, workflow_name: &str, task_id: i64) -> Result<Vec<JobPreview>> {
    let workflow = registry.discoverer()
                           .store()
                           .find_workflow(workflow_name)
                           .await?
                           .ok_or_else(|| JobError::NotFound(format!("workflow {workflow_name}")))?;

    let mut previews = Vec::new();
    for job in workflow.jobs().filter(|job| job.job_type == JobType::PlatformRelease) {
        let mut controller = registry.build_controller(job.clone(), &workflow)?;
        controller.instantiate().await?;
        controller.set_preset().await?;
        let tasks = controller.to_jobs(task_id).await?;
        info!("job {}: {} task(s)", job.name, tasks.len());
        previews.push(JobPreview { job: job.name.clone(),
                                   spec: controller.job().spec.clone(),
                                   tasks });
    }
    Ok(previews)
}
