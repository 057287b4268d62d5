//! deploy-core: modelo y contratos del ciclo de vida de jobs.
//!
//! Este crate no conoce ningún tipo de job concreto. Define:
//! - `model`: workflow, jobs con spec opaco, cuentas y entornos, y el
//!   contrato `JobSpecCodec` para decodificar specs tipados.
//! - `job`: el trait `JobController` y el `TaskDescriptor` de salida.
//! - `store` / `platform`: fronteras con el workflow store y la plataforma.
//! - `call`: guarda de cancelación/deadline para toda llamada externa.
//! - `errors`: taxonomía `JobError`.
pub mod call;
pub mod constants;
pub mod errors;
pub mod hashing;
pub mod job;
pub mod model;
pub mod platform;
pub mod store;

pub use call::CallGuard;
pub use errors::{JobError, PlatformFailure, Result};
pub use job::{JobController, TaskDescriptor};
pub use model::{Account, EnvVar, Environment, Job, JobSpecCodec, JobType, Stage, Workflow};
pub use platform::{PlatformClient, PlatformConnector, TransportError};
pub use store::WorkflowStore;

pub use tokio_util::sync::CancellationToken;
