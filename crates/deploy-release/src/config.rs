//! Parámetros del descubrimiento de inventario.
//!
//! Se pasan explícitamente al `Discoverer` al construirlo; el crate raíz los
//! arma desde variables de entorno.
use std::time::Duration;

use deploy_core::constants::{DEFAULT_CONCURRENCY, DEFAULT_MAX_RESOURCES, DEFAULT_PAGE_SIZE};
use deploy_core::{JobError, Result};

use crate::identity::TagKeys;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    pub tag_keys: TagKeys,
    pub page_size: u32,
    /// Tope de recursos por entorno; superarlo es error, no truncado.
    pub max_resources: u32,
    /// Llamadas `describe` simultáneas por entorno.
    pub concurrency: usize,
    /// Deadline por llamada externa.
    pub call_timeout: Option<Duration>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self { tag_keys: TagKeys::default(),
               page_size: DEFAULT_PAGE_SIZE,
               max_resources: DEFAULT_MAX_RESOURCES,
               concurrency: DEFAULT_CONCURRENCY,
               call_timeout: None }
    }
}

impl DiscoveryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(JobError::Configuration("page_size must be at least 1".into()));
        }
        if self.concurrency == 0 {
            return Err(JobError::Configuration("concurrency must be at least 1".into()));
        }
        if self.max_resources < self.page_size {
            return Err(JobError::Configuration(format!("max_resources ({}) must not be below page_size ({})",
                                                       self.max_resources, self.page_size)));
        }
        let keys = &self.tag_keys;
        if [&keys.project, &keys.env, &keys.service, &keys.module].iter().any(|k| k.trim().is_empty()) {
            return Err(JobError::Configuration("tag keys must not be empty".into()));
        }
        if keys.service == keys.module {
            return Err(JobError::Configuration(format!("service and module tag keys must differ (both '{}')", keys.service)));
        }
        Ok(())
    }
}
