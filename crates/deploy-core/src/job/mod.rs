//! Contrato de ciclo de vida de jobs y salida de ejecución.
//!
//! - `JobController`: las siete operaciones que el engine invoca sobre un job
//!   más `to_jobs` en el envío de una ejecución.
//! - `TaskDescriptor`: unidad autocontenida que consume el task runner.

mod controller;
mod task;

pub use controller::JobController;
pub use task::TaskDescriptor;
