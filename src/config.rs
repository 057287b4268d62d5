//! Configuración central de la aplicación.
//!
//! Carga variables de entorno (.env una sola vez) y arma la `AppConfig`
//! inmutable. Todas las variables son opcionales; un valor presente pero
//! inválido es un error de configuración, nunca un pánico.
//!
//! | Variable | Default |
//! |---|---|
//! | `DEPLOYFLOW_PAGE_SIZE` | 100 |
//! | `DEPLOYFLOW_MAX_RESOURCES` | 10000 |
//! | `DEPLOYFLOW_CONCURRENCY` | 8 |
//! | `DEPLOYFLOW_CALL_TIMEOUT_SECS` | sin deadline |
//! | `DEPLOYFLOW_TAG_PROJECT` / `_ENV` / `_SERVICE` / `_MODULE` | `zadig-*` |
use std::env;
use std::str::FromStr;
use std::time::Duration;

use deploy_core::{JobError, Result};
use deploy_release::DiscoveryConfig;
use dotenvy::dotenv;
use once_cell::sync::Lazy;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Instancia global perezosa, evaluada una sola vez.
static CONFIG: Lazy<Result<AppConfig>> = Lazy::new(AppConfig::from_env);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub discovery: DiscoveryConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
        where F: Fn(&str) -> Option<String>
    {
        let mut discovery = DiscoveryConfig::default();
        if let Some(v) = parse_var(&lookup, "DEPLOYFLOW_PAGE_SIZE")? {
            discovery.page_size = v;
        }
        if let Some(v) = parse_var(&lookup, "DEPLOYFLOW_MAX_RESOURCES")? {
            discovery.max_resources = v;
        }
        if let Some(v) = parse_var(&lookup, "DEPLOYFLOW_CONCURRENCY")? {
            discovery.concurrency = v;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "DEPLOYFLOW_CALL_TIMEOUT_SECS")? {
            discovery.call_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        let keys = &mut discovery.tag_keys;
        for (var, slot) in [("DEPLOYFLOW_TAG_PROJECT", &mut keys.project),
                            ("DEPLOYFLOW_TAG_ENV", &mut keys.env),
                            ("DEPLOYFLOW_TAG_SERVICE", &mut keys.service),
                            ("DEPLOYFLOW_TAG_MODULE", &mut keys.module)]
        {
            if let Some(value) = lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
                *slot = value;
            }
        }
        discovery.validate()?;
        Ok(Self { discovery })
    }

    /// Configuración global (cargada una vez desde el entorno).
    pub fn global() -> Result<&'static AppConfig> {
        CONFIG.as_ref().map_err(Clone::clone)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
    where T: FromStr,
          T::Err: std::fmt::Display,
          F: Fn(&str) -> Option<String>
{
    match lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>()
                        .map(Some)
                        .map_err(|e| JobError::Configuration(format!("{key}={raw}: {e}"))),
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
