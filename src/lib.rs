//! deployflow: fachada del ciclo de vida de jobs de release.
//!
//! - `config`: parámetros de descubrimiento desde variables de entorno.
//! - `registry`: `JobType` → `JobController`.
//! - `fixture` / `preview`: estado en memoria y recorrido de demostración.
//! - `errors`: errores de la aplicación.
//!
//! Los crates `deploy-core`, `deploy-release` y `deploy-adapters` se
//! re-exportan para que un cliente dependa sólo de éste.

pub mod config;
pub mod errors;
pub mod fixture;
pub mod preview;
pub mod registry;

pub use deploy_adapters;
pub use deploy_core;
pub use deploy_release;

pub use config::AppConfig;
pub use errors::AppError;
pub use registry::{build_controller, ControllerRegistry};
