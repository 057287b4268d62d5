//! Fixtures compartidas: proyecto `P`, entorno `E` en región `R`.
#![allow(dead_code)]

use std::sync::Arc;

use deploy_adapters::{InMemoryPlatform, InMemoryWorkflowStore, PlatformApp};
use deploy_core::{Account, Environment};
use deploy_release::{Discoverer, DiscoveryConfig};

pub const PROJECT: &str = "P";
pub const ENV: &str = "E";
pub const REGION: &str = "R";

pub fn account() -> Account {
    Account { id: "acc-1".into(),
              name: "default".into(),
              credential_ref: "secret/acc-1".into(),
              is_default: true }
}

pub fn env(name: &str, region: &str) -> Environment {
    Environment { project: PROJECT.into(),
                  name: name.into(),
                  region_id: region.into() }
}

/// Aplicación con tags de proyecto y entorno, y opcionalmente de servicio y
/// módulo.
pub fn app(app_id: &str, env: &str, service: Option<&str>, module: Option<&str>) -> PlatformApp {
    let mut app = PlatformApp::new(app_id, format!("name-{app_id}")).image(format!("registry/{app_id}:1"))
                                                                      .tag("zadig-project", PROJECT)
                                                                      .tag("zadig-env", env);
    if let Some(service) = service {
        app = app.tag("zadig-service", service);
    }
    if let Some(module) = module {
        app = app.tag("zadig-service-module", module);
    }
    app
}

/// App1 {svcA, m1, K=V} y App2 sin tag de servicio.
pub fn fixture() -> (Arc<InMemoryWorkflowStore>, InMemoryPlatform) {
    let store = InMemoryWorkflowStore::new().with_account(account()).with_environment(env(ENV, REGION));
    let platform = InMemoryPlatform::new().with_app(REGION, app("app-1", ENV, Some("svcA"), Some("m1")).env("K", "V"))
                                          .with_app(REGION, app("app-2", ENV, None, None));
    (Arc::new(store), platform)
}

pub fn discoverer_with(store: &Arc<InMemoryWorkflowStore>, platform: &InMemoryPlatform, config: DiscoveryConfig) -> Arc<Discoverer> {
    Arc::new(Discoverer::new(store.clone(), Arc::new(platform.clone()), config).expect("valid discovery config"))
}

pub fn discoverer(store: &Arc<InMemoryWorkflowStore>, platform: &InMemoryPlatform) -> Arc<Discoverer> {
    discoverer_with(store, platform, DiscoveryConfig::default())
}
