//! Taxonomía de errores del ciclo de vida de jobs.
//!
//! Todos los errores se devuelven al caller (el workflow engine) con contexto;
//! ninguno se reintenta internamente. La única exclusión silenciosa es la de
//! recursos sin tag de servicio, que no pasa por aquí.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::JobType;

/// Detalle de un fallo reportado por la plataforma externa (o por su
/// transporte). Los campos opcionales reflejan lo que el SDK haya devuelto.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlatformFailure {
    /// Operación que falló (`list_resources`, `describe_resource_config`, ...).
    pub operation: String,
    pub status_code: Option<i32>,
    pub code: Option<String>,
    pub error_code: Option<String>,
    pub message: String,
}

impl PlatformFailure {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self { operation: operation.into(),
               message: message.into(),
               ..Default::default() }
    }
}

impl fmt::Display for PlatformFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed", self.operation)?;
        if let Some(status) = self.status_code {
            write!(f, ", statusCode: {status}")?;
        }
        if let Some(code) = &self.code {
            write!(f, ", code: {code}")?;
        }
        if let Some(err_code) = &self.error_code {
            write!(f, ", errCode: {err_code}")?;
        }
        write!(f, ", message: {}", self.message)
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum JobError {
    /// Falta configuración utilizable (cuenta por defecto, entorno, límites).
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Respuesta no exitosa o fallo de transporte de la plataforma.
    #[error("external platform error: {0}")]
    ExternalPlatform(PlatformFailure),
    #[error("failed to decode job spec: {0}")]
    Decode(String),
    #[error("failed to encode job spec: {0}")]
    Encode(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Token de cancelación disparado o deadline agotado. Nunca se confunde
    /// con un error de plataforma.
    #[error("cancelled: {0}")]
    Cancelled(String),
    #[error("workflow store error: {0}")]
    Store(String),
    #[error("job type {0} is not handled by this controller registry")]
    UnsupportedJobType(JobType),
}

impl JobError {
    pub fn platform(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalPlatform(PlatformFailure::new(operation, message))
    }
}

pub type Result<T, E = JobError> = std::result::Result<T, E>;
