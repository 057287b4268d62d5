//! Workflow store en memoria.
use std::sync::RwLock;

use async_trait::async_trait;
use dashmap::DashMap;
use deploy_core::{Account, Environment, JobError, Result, Workflow, WorkflowStore};

#[derive(Default)]
pub struct InMemoryWorkflowStore {
    accounts: RwLock<Vec<Account>>,
    /// proyecto -> entornos en orden de registro
    environments: DashMap<String, Vec<Environment>>,
    workflows: DashMap<String, Workflow>,
    /// operación -> error a devolver en la próxima y siguientes llamadas
    failures: DashMap<String, JobError>,
    calls: DashMap<String, usize>,
}

impl InMemoryWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, account: Account) -> Self {
        self.put_account(account);
        self
    }

    pub fn with_environment(self, env: Environment) -> Self {
        self.put_environment(env);
        self
    }

    pub fn with_workflow(self, workflow: Workflow) -> Self {
        self.put_workflow(workflow);
        self
    }

    pub fn put_account(&self, account: Account) {
        if let Ok(mut accounts) = self.accounts.write() {
            accounts.retain(|a| a.id != account.id);
            accounts.push(account);
        }
    }

    /// Registra (o reemplaza en su posición) un entorno del proyecto.
    pub fn put_environment(&self, env: Environment) {
        let mut envs = self.environments.entry(env.project.clone()).or_default();
        match envs.iter_mut().find(|e| e.name == env.name) {
            Some(slot) => *slot = env,
            None => envs.push(env),
        }
    }

    pub fn put_workflow(&self, workflow: Workflow) {
        self.workflows.insert(workflow.name.clone(), workflow);
    }

    pub fn remove_workflow(&self, name: &str) -> Option<Workflow> {
        self.workflows.remove(name).map(|(_, wf)| wf)
    }

    pub fn fail_on(&self, operation: &str, error: JobError) {
        self.failures.insert(operation.to_string(), error);
    }

    pub fn clear_failures(&self) {
        self.failures.clear();
    }

    /// Llamadas recibidas por operación.
    pub fn calls(&self, operation: &str) -> usize {
        self.calls.get(operation).map(|c| *c).unwrap_or(0)
    }

    fn enter(&self, operation: &str) -> Result<()> {
        *self.calls.entry(operation.to_string()).or_insert(0) += 1;
        match self.failures.get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl WorkflowStore for InMemoryWorkflowStore {
    async fn find_default_account(&self, _project: &str) -> Result<Option<Account>> {
        self.enter("find_default_account")?;
        let accounts = self.accounts.read().map_err(|e| JobError::Store(e.to_string()))?;
        Ok(accounts.iter().find(|a| a.is_default).cloned())
    }

    async fn list_environments(&self, project: &str) -> Result<Vec<Environment>> {
        self.enter("list_environments")?;
        Ok(self.environments.get(project).map(|envs| envs.clone()).unwrap_or_default())
    }

    async fn find_workflow(&self, name: &str) -> Result<Option<Workflow>> {
        self.enter("find_workflow")?;
        Ok(self.workflows.get(name).map(|wf| wf.clone()))
    }
}
