use async_trait::async_trait;

use crate::errors::Result;
use crate::model::Job;

use super::TaskDescriptor;

/// Contrato de ciclo de vida que todo tipo de job implementa.
///
/// El engine invoca cada operación en un punto bien definido de la vida del
/// job y nunca concurrentemente sobre la misma instancia (`&mut self`). Cada
/// operación decodifica el spec opaco del job, lo muta y lo vuelve a escribir
/// en el job; `job()` expone el resultado.
#[async_trait]
pub trait JobController: Send {
    /// Job actual (con el spec tal como quedó tras la última operación).
    fn job(&self) -> &Job;

    /// Job añadido al workflow: decodifica el spec tipado.
    async fn instantiate(&mut self) -> Result<()>;

    /// Job abierto para edición: recalcula opciones y selección por defecto.
    async fn set_preset(&mut self) -> Result<()>;

    /// El usuario cambió de entorno: limpia la selección.
    async fn clear_selection_field(&mut self) -> Result<()>;

    /// La UI pide opciones frescas: recalcula sólo las opciones.
    async fn set_options(&mut self) -> Result<()>;

    /// El contexto de entorno se invalidó: vacía las opciones.
    async fn clear_options(&mut self) -> Result<()>;

    /// Override de ejecución: reemplaza el spec completo por el de `args`.
    async fn merge_args(&mut self, args: &Job) -> Result<()>;

    /// Workflow re-guardado: incorpora los campos de plantilla del último
    /// spec persistido.
    async fn update_with_latest_setting(&mut self) -> Result<()>;

    /// Envío de ejecución: expande el spec final en tareas ejecutables.
    async fn to_jobs(&mut self, task_id: i64) -> Result<Vec<TaskDescriptor>>;
}
