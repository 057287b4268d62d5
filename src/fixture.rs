//! Fixture JSON con el estado de un store y una plataforma: alimenta el
//! binario de demostración y los tests de punta a punta.
use std::collections::BTreeMap;
use std::path::Path;

use deploy_adapters::{InMemoryPlatform, InMemoryWorkflowStore, PlatformApp};
use deploy_core::{Account, Environment, Workflow};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub accounts: Vec<Account>,
    pub environments: Vec<Environment>,
    pub workflows: Vec<Workflow>,
    /// región -> aplicaciones, en orden de la plataforma
    pub inventory: BTreeMap<String, Vec<PlatformApp>>,
}

impl Fixture {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn into_adapters(self) -> (InMemoryWorkflowStore, InMemoryPlatform) {
        let store = InMemoryWorkflowStore::new();
        for account in self.accounts {
            store.put_account(account);
        }
        for env in self.environments {
            store.put_environment(env);
        }
        for workflow in self.workflows {
            store.put_workflow(workflow);
        }
        let platform = InMemoryPlatform::new();
        for (region, apps) in self.inventory {
            for app in apps {
                platform.put_app(&region, app);
            }
        }
        (store, platform)
    }
}
