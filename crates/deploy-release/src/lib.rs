//! deploy-release: job de release sobre la plataforma de aplicaciones.
//!
//! Piezas, de las hojas hacia arriba:
//! - `identity`: (servicio, módulo) a partir de los tags de un recurso.
//! - `envvars`: variables de entorno codificadas por la plataforma.
//! - `discovery`: entornos del proyecto y aplicaciones etiquetadas en cada uno.
//! - `merger`: selección por defecto a partir de identidades.
//! - `controller`: `JobController` del job de release.
//! - `tasks`: expansión del spec final en `TaskDescriptor`s.
pub mod config;
pub mod controller;
pub mod discovery;
pub mod envvars;
pub mod identity;
pub mod merger;
pub mod spec;
pub mod tasks;

pub use config::DiscoveryConfig;
pub use controller::ReleaseJobController;
pub use discovery::Discoverer;
pub use identity::{resolve_identity, Identity, TagKeys};
pub use merger::{compute_defaults, select_defaults, select_from_services};
pub use spec::{DeploySelection, EnvConfig, EnvOption, ReleaseJobSpec, ServiceConfig, ServiceIdentity, ServiceInfo, ServiceSource};
pub use tasks::expand_tasks;
