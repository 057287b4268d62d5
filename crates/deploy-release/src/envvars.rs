//! Decodificación de las variables de entorno que la plataforma devuelve
//! como JSON string (`[{"name": "K", "value": "V"}, ...]`).
use deploy_core::{EnvVar, JobError, Result};
use indexmap::IndexMap;
use log::error;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawEnv {
    name: Option<String>,
    value: Option<String>,
}

/// Decodifica la lista conservando el orden reportado. Nombres repetidos:
/// gana el último valor en la posición de la primera aparición.
pub fn decode_env_vars(raw: Option<&str>) -> Result<Vec<EnvVar>> {
    let text = match raw.map(str::trim) {
        None | Some("") => return Ok(Vec::new()),
        Some(text) => text,
    };
    let entries: Vec<RawEnv> = serde_json::from_str(text).map_err(|e| {
                                                               let err = JobError::platform("describe_resource_config",
                                                                                            format!("failed to decode env variables: {e}"));
                                                               error!("{err}");
                                                               err
                                                           })?;
    let mut vars: IndexMap<String, String> = IndexMap::new();
    for entry in entries {
        // entradas sin nombre no son direccionables
        let Some(name) = entry.name.filter(|n| !n.is_empty()) else { continue };
        vars.insert(name, entry.value.unwrap_or_default());
    }
    Ok(vars.into_iter().map(|(key, value)| EnvVar { key, value }).collect())
}
