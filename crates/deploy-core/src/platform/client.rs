//! Contrato del cliente de plataforma. La autenticación y el transporte del
//! SDK viven fuera de este workspace; aquí sólo se fija la forma de las
//! llamadas que necesita el descubrimiento.
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::errors::{JobError, PlatformFailure, Result};
use crate::model::Account;

use super::types::{DescribeConfigResponse, ListResourcesRequest, ListResourcesResponse};

/// Fallo de transporte (conexión, timeout del SDK, respuesta ilegible).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub status_code: Option<i32>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(),
               status_code: None }
    }

    /// Convierte el fallo en `ExternalPlatform` anotando la operación.
    pub fn into_job_error(self, operation: &str) -> JobError {
        JobError::ExternalPlatform(PlatformFailure { operation: operation.to_string(),
                                                     status_code: self.status_code,
                                                     message: self.message,
                                                     ..Default::default() })
    }
}

/// Cliente ya acotado a (cuenta, región).
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Región a la que está ligado el cliente.
    fn region_id(&self) -> &str;

    async fn list_resources(&self, request: &ListResourcesRequest) -> std::result::Result<ListResourcesResponse, TransportError>;

    async fn describe_resource_config(&self, app_id: &str) -> std::result::Result<DescribeConfigResponse, TransportError>;
}

/// Fábrica de clientes por (cuenta, región).
#[async_trait]
pub trait PlatformConnector: Send + Sync {
    async fn connect(&self, account: &Account, region_id: &str) -> Result<Arc<dyn PlatformClient>>;
}
