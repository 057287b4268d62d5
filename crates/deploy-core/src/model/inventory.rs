//! Registros del workflow store que alimentan el descubrimiento: cuenta de
//! plataforma por defecto y entornos registrados por proyecto.
use serde::{Deserialize, Serialize};

/// Cuenta de plataforma. Las credenciales son una referencia opaca que sólo
/// interpreta el `PlatformConnector`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub credential_ref: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Entorno de despliegue registrado para un proyecto, ligado a una región.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Environment {
    pub project: String,
    pub name: String,
    pub region_id: String,
}

/// Variable de entorno de una aplicación. El orden de la lista se conserva
/// tal como lo reporta la plataforma.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(),
               value: value.into() }
    }
}
