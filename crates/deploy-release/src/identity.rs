//! Resolución de identidad lógica a partir de los tags de un recurso.
//!
//! Un recurso sin tag de servicio es `Unidentified` y desaparece de toda la
//! salida posterior sin error: es un filtro, no un camino de fallo.
use deploy_core::constants::{ENV_TAG_KEY, PROJECT_TAG_KEY, SERVICE_MODULE_TAG_KEY, SERVICE_TAG_KEY};
use deploy_core::platform::ResourceTag;
use serde::{Deserialize, Serialize};

use crate::spec::ServiceIdentity;

/// Claves de tag que usa la reconciliación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagKeys {
    pub project: String,
    pub env: String,
    pub service: String,
    pub module: String,
}

impl Default for TagKeys {
    fn default() -> Self {
        Self { project: PROJECT_TAG_KEY.to_string(),
               env: ENV_TAG_KEY.to_string(),
               service: SERVICE_TAG_KEY.to_string(),
               module: SERVICE_MODULE_TAG_KEY.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Identified(ServiceIdentity),
    Unidentified,
}

/// Deriva (servicio, módulo) de los tags. Un tag sin clave se ignora y uno
/// sin valor cuenta como valor vacío; si una clave se repite gana la última.
pub fn resolve_identity(tags: &[ResourceTag], keys: &TagKeys) -> Identity {
    let mut service: Option<String> = None;
    let mut module = String::new();
    for tag in tags {
        let Some(key) = tag.key.as_deref() else { continue };
        let value = tag.value.clone().unwrap_or_default();
        if key == keys.service {
            service = Some(value);
        } else if key == keys.module {
            module = value;
        }
    }
    match service {
        Some(service_name) => Identity::Identified(ServiceIdentity { service_name,
                                                                    service_module: module }),
        None => Identity::Unidentified,
    }
}
