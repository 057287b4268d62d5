//! Flujo completo a través de la fachada: fixture → registro → controlador.
use std::sync::Arc;

use deployflow::config::AppConfig;
use deployflow::deploy_core::{CancellationToken, Job, JobController, JobError, JobSpecCodec, JobType, Workflow};
use deployflow::deploy_release::{ReleaseJobSpec, ServiceIdentity};
use deployflow::fixture::Fixture;
use deployflow::preview::preview_workflow;
use deployflow::registry::ControllerRegistry;
use serde_json::json;

const FIXTURE: &str = include_str!("../fixtures/release.json");

fn registry() -> (ControllerRegistry, Arc<deployflow::deploy_adapters::InMemoryWorkflowStore>) {
    let (store, platform) = Fixture::from_json(FIXTURE).expect("fixture").into_adapters();
    let store = Arc::new(store);
    let registry = ControllerRegistry::new(store.clone(), Arc::new(platform), &AppConfig::default()).expect("registry");
    (registry, store)
}

fn fixture_workflow() -> Workflow {
    Fixture::from_json(FIXTURE).expect("fixture").workflows.remove(0)
}

#[tokio::test]
async fn preview_produces_tasks_for_default_services() {
    let (registry, _) = registry();
    let previews = preview_workflow(&registry, "shop-release", 99).await.unwrap();
    assert_eq!(previews.len(), 1);

    let preview = &previews[0];
    assert_eq!(preview.job, "release-dev");
    let keys: Vec<_> = preview.tasks.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(keys, vec!["release-dev/cart/api", "release-dev/web"]);
    assert!(preview.tasks.iter().all(|t| t.region_id == "cn-hangzhou" && t.task_id == 99));
    assert_eq!(preview.tasks[0].envs.len(), 2);

    let spec = ReleaseJobSpec::decode(&preview.spec).unwrap();
    assert_eq!(spec.env_options.iter().map(|o| o.env.as_str()).collect::<Vec<_>>(), vec!["dev", "prod"]);
    // legacy-cron no tiene tag de servicio
    assert!(spec.env_options[0].services.iter().all(|s| s.app_id != "app-legacy"));
    assert_eq!(spec.env_options[0].services.len(), 3);
}

#[tokio::test]
async fn preview_of_missing_workflow_is_not_found() {
    let (registry, _) = registry();
    assert!(matches!(preview_workflow(&registry, "nope", 1).await, Err(JobError::NotFound(_))));
}

#[tokio::test]
async fn edit_refresh_resave_and_submit() {
    let (registry, store) = registry();
    let workflow = fixture_workflow();
    let job = workflow.find_job("release-dev", JobType::PlatformRelease).cloned().unwrap();
    let mut controller = registry.build_controller(job, &workflow).unwrap();

    controller.instantiate().await.unwrap();
    controller.set_preset().await.unwrap();

    // el usuario cambia a prod: se limpia la selección y se eligen servicios
    controller.clear_selection_field().await.unwrap();
    let mut spec = ReleaseJobSpec::decode(&controller.job().spec).unwrap();
    assert!(spec.service_config.services.is_empty());
    let web_prod = spec.env_options[1].services[0].clone();
    spec.env_config.name = "prod".into();
    spec.service_config.services = vec![(&web_prod).into()];
    let edited = Job::new("release-dev", JobType::PlatformRelease, spec.encode().unwrap());
    controller.merge_args(&edited).await.unwrap();

    // refresco de opciones: la selección sobrevive
    controller.set_options().await.unwrap();
    let refreshed = ReleaseJobSpec::decode(&controller.job().spec).unwrap();
    assert_eq!(refreshed.service_config.services.len(), 1);
    assert_eq!(refreshed.env_config.name, "prod");

    // el workflow se re-guarda con otra plantilla
    let mut resaved = workflow.clone();
    resaved.stages[1].jobs[0].spec = json!({
        "serviceConfig": {"defaultServices": [{"serviceName": "web"}]}
    });
    store.put_workflow(resaved);
    controller.update_with_latest_setting().await.unwrap();
    let merged = ReleaseJobSpec::decode(&controller.job().spec).unwrap();
    assert_eq!(merged.service_config.default_services, vec![ServiceIdentity::new("web", "")]);
    assert_eq!(merged.env_config.name, "prod");
    assert!(merged.env_options.is_empty());

    let tasks = controller.to_jobs(5).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].app_id, "app-web-prod");
    assert_eq!(tasks[0].region_id, "cn-shanghai");
    assert_eq!(tasks[0].key, "release-dev/web");
}

#[tokio::test]
async fn unsupported_kinds_and_cancellation() {
    let (registry, _) = registry();
    let workflow = fixture_workflow();
    let build = workflow.find_job("compile", JobType::Build).cloned().unwrap();
    assert!(matches!(registry.build_controller(build, &workflow).err(), Some(JobError::UnsupportedJobType(JobType::Build))));

    let cancel = CancellationToken::new();
    let registry = registry.with_cancellation(cancel.clone());
    let job = workflow.find_job("release-dev", JobType::PlatformRelease).cloned().unwrap();
    let mut controller = registry.build_controller(job, &workflow).unwrap();
    cancel.cancel();
    assert!(matches!(controller.set_preset().await, Err(JobError::Cancelled(_))));
}
