//! Binario de demostración.
//!
//! Uso: `deployflow <fixture.json> <workflow> [task_id]`
//!
//! Carga el fixture en el store y la plataforma en memoria, recorre los jobs
//! de release del workflow e imprime spec final y tareas como JSON. El nivel
//! de log se controla con `RUST_LOG`.
use std::process::ExitCode;
use std::sync::Arc;

use deployflow::config::{init_dotenv, AppConfig};
use deployflow::errors::AppError;
use deployflow::fixture::Fixture;
use deployflow::preview::preview_workflow;
use deployflow::registry::ControllerRegistry;
use log::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_dotenv();
    // el subscriber también recibe los registros de `log`
    let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env())
                                     .with_target(true)
                                     .with_writer(std::io::stderr)
                                     .try_init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("deployflow: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    let mut args = std::env::args().skip(1);
    let usage = || AppError::Usage("deployflow <fixture.json> <workflow> [task_id]".into());
    let path = args.next().ok_or_else(usage)?;
    let workflow_name = args.next().ok_or_else(usage)?;
    let task_id = match args.next() {
        Some(raw) => raw.parse::<i64>().map_err(|e| AppError::Usage(format!("task_id {raw}: {e}")))?,
        None => 1,
    };

    let config = AppConfig::global()?;
    let (store, platform) = Fixture::load(&path)?.into_adapters();
    let registry = ControllerRegistry::new(Arc::new(store), Arc::new(platform), config)?;
    let previews = preview_workflow(&registry, &workflow_name, task_id).await?;
    println!("{}", serde_json::to_string_pretty(&previews)?);
    Ok(())
}
