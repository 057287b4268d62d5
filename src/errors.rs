//! Errores de la aplicación (binario y fachada). Los errores del ciclo de
//! vida de jobs viajan envueltos en `Job` sin perder su variante.
use deploy_core::JobError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Job(#[from] JobError),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Uso: {0}")]
    Usage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_errors_keep_their_message() {
        let err: AppError = JobError::NotFound("workflow wf".into()).into();
        assert_eq!(err.to_string(), "not found: workflow wf");
    }

    #[test]
    fn io_variant_from() {
        let err: AppError = std::io::Error::other("falló IO").into();
        assert_eq!(err.to_string(), "Error en IO: falló IO");
    }

    #[test]
    fn json_variant_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AppError = json_err.into();
        assert!(err.to_string().starts_with("Error JSON: "));
    }
}
