//! Formas de request/response de la plataforma de aplicaciones elásticas.
//!
//! Reflejan el SDK: casi todo es opcional. Quien consume estas respuestas
//! debe convertir un `success` ausente o un `data` ausente en error explícito
//! (ver `ensure_success`), nunca asumir valores.
use serde::{Deserialize, Serialize};

use crate::errors::{JobError, PlatformFailure, Result};

/// Predicado de tag `key == value`. Un filtro es el AND de todos sus items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl TagFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(),
               value: value.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResourcesRequest {
    pub tags: Vec<TagFilter>,
    /// Página 1-based.
    pub page: u32,
    pub page_size: u32,
}

impl ListResourcesRequest {
    /// Encoding del filtro tal como lo espera la API (`[{"Key":..,"Value":..}]`).
    pub fn tags_json(&self) -> Result<String> {
        serde_json::to_string(&self.tags).map_err(|e| JobError::Encode(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceTag {
    pub key: Option<String>,
    pub value: Option<String>,
}

impl ResourceTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: Some(key.into()),
               value: Some(value.into()) }
    }
}

/// Aplicación tal como la lista la plataforma.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlatformResource {
    pub app_id: Option<String>,
    pub app_name: Option<String>,
    pub image_url: Option<String>,
    pub instances: Option<i32>,
    #[serde(default)]
    pub tags: Vec<ResourceTag>,
}

/// Campos comunes de estado de toda respuesta.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseStatus {
    pub status_code: Option<i32>,
    pub success: Option<bool>,
    pub code: Option<String>,
    pub error_code: Option<String>,
    pub message: Option<String>,
}

impl ResponseStatus {
    pub fn ok() -> Self {
        Self { status_code: Some(200),
               success: Some(true),
               code: Some("200".into()),
               ..Default::default() }
    }

    /// Convierte `success != Some(true)` en `ExternalPlatform`.
    pub fn ensure_success(&self, operation: &str) -> Result<()> {
        if self.success == Some(true) {
            return Ok(());
        }
        let message = match (&self.message, self.success) {
            (Some(m), _) => m.clone(),
            (None, None) => "response carries no success flag".to_string(),
            (None, Some(_)) => "request was not successful".to_string(),
        };
        Err(JobError::ExternalPlatform(PlatformFailure { operation: operation.to_string(),
                                                         status_code: self.status_code,
                                                         code: self.code.clone(),
                                                         error_code: self.error_code.clone(),
                                                         message }))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourcePage {
    #[serde(default)]
    pub applications: Vec<PlatformResource>,
    pub current_page: Option<u32>,
    pub page_size: Option<u32>,
    pub total_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListResourcesResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    pub data: Option<ResourcePage>,
}

impl ListResourcesResponse {
    /// Valida estado y presencia de `data`, devolviendo la página.
    pub fn into_page(self) -> Result<ResourcePage> {
        self.status.ensure_success("list_resources")?;
        self.data.ok_or_else(|| JobError::platform("list_resources", "response carries no data"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Variables de entorno codificadas (JSON string) tal como las devuelve
    /// la plataforma.
    pub envs: Option<String>,
    pub image_url: Option<String>,
    pub replicas: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DescribeConfigResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    pub data: Option<ResourceConfig>,
}

impl DescribeConfigResponse {
    pub fn into_config(self) -> Result<ResourceConfig> {
        self.status.ensure_success("describe_resource_config")?;
        self.data.ok_or_else(|| JobError::platform("describe_resource_config", "response carries no data"))
    }
}
