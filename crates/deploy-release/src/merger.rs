//! Cálculo de la selección por defecto: cruza las identidades por defecto
//! del spec con los servicios descubiertos en el entorno objetivo.
//!
//! La única clave de cruce es la identidad lógica (servicio, módulo); el
//! `app_id` puede cambiar en la plataforma y nunca se usa para unir.
use std::collections::HashSet;

use deploy_core::{CancellationToken, Result};
use indexmap::IndexMap;
use log::debug;

use crate::discovery::Discoverer;
use crate::spec::{DeploySelection, EnvOption, ServiceIdentity, ServiceInfo};

/// Selección sobre un conjunto de opciones ya obtenido. Entorno vacío o
/// desconocido produce `[]`.
pub fn select_defaults(options: &[EnvOption], target_env: &str, defaults: &[ServiceIdentity]) -> Vec<DeploySelection> {
    if target_env.is_empty() {
        return Vec::new();
    }
    match options.iter().find(|option| option.env == target_env) {
        Some(option) => select_from_services(&option.services, defaults),
        None => {
            debug!("target env {target_env} not among discovered options; no defaults");
            Vec::new()
        }
    }
}

/// Servicios cuya identidad está entre `defaults`. Si la plataforma repite
/// una identidad, gana la última aparición y ocupa su posición.
pub fn select_from_services(services: &[ServiceInfo], defaults: &[ServiceIdentity]) -> Vec<DeploySelection> {
    let wanted: HashSet<&ServiceIdentity> = defaults.iter().collect();
    let mut selected: IndexMap<ServiceIdentity, DeploySelection> = IndexMap::new();
    for info in services {
        let id = info.identity();
        if !wanted.contains(&id) {
            continue;
        }
        selected.shift_remove(&id);
        selected.insert(id, DeploySelection::from(info));
    }
    selected.into_values().collect()
}

/// Descubre sólo `target_env` y calcula la selección por defecto.
pub async fn compute_defaults(discoverer: &Discoverer, project: &str, target_env: &str, defaults: &[ServiceIdentity],
                              cancel: &CancellationToken)
                              -> Result<Vec<DeploySelection>> {
    if target_env.is_empty() {
        return Ok(Vec::new());
    }
    let option = discoverer.discover_env(project, target_env, cancel).await?;
    Ok(option.map(|option| select_from_services(&option.services, defaults)).unwrap_or_default())
}
