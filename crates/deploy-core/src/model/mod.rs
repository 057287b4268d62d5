//! Modelos neutrales (Job, Workflow, Account, Environment) y el contrato de
//! decodificación de specs.

pub mod codec;
pub mod inventory;
pub mod job;

pub use codec::JobSpecCodec;
pub use inventory::{Account, EnvVar, Environment};
pub use job::{Job, JobType, Stage, Workflow};
