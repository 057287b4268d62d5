//! Expansión del spec final en descriptores de tarea, uno por servicio
//! seleccionado y en el orden de la selección.
use deploy_core::{Environment, JobType, TaskDescriptor};

use crate::spec::ReleaseJobSpec;

pub fn expand_tasks(task_id: i64, job_name: &str, spec: &ReleaseJobSpec, env: &Environment) -> Vec<TaskDescriptor> {
    let upstream_job = spec.upstream_job().map(str::to_string);
    spec.service_config
        .services
        .iter()
        .map(|selection| {
            TaskDescriptor { task_id,
                             job_name: job_name.to_string(),
                             job_type: JobType::PlatformRelease,
                             key: TaskDescriptor::task_key(job_name, &selection.service_name, &selection.service_module),
                             env: env.name.clone(),
                             region_id: env.region_id.clone(),
                             app_id: selection.app_id.clone(),
                             app_name: selection.app_name.clone(),
                             service_name: selection.service_name.clone(),
                             service_module: selection.service_module.clone(),
                             image: selection.image.clone(),
                             envs: selection.envs.clone(),
                             upstream_job: upstream_job.clone(),
                             fingerprint: String::new() }.sealed()
        })
        .collect()
}
