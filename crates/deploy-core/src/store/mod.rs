//! Acceso de sólo lectura al workflow store del engine.
//!
//! La persistencia de workflows pertenece al sistema que nos rodea; este
//! crate sólo consulta la cuenta por defecto, los entornos del proyecto y la
//! última versión guardada de un workflow.
use async_trait::async_trait;

use crate::errors::Result;
use crate::model::{Account, Environment, Workflow};

#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Cuenta de plataforma por defecto para el proyecto, si existe.
    async fn find_default_account(&self, project: &str) -> Result<Option<Account>>;

    /// Entornos registrados para el proyecto, en orden de registro.
    async fn list_environments(&self, project: &str) -> Result<Vec<Environment>>;

    /// Última versión persistida del workflow.
    async fn find_workflow(&self, name: &str) -> Result<Option<Workflow>>;
}
