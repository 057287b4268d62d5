//! Descubrimiento de inventario: entornos registrados del proyecto y, por
//! cada uno, las aplicaciones etiquetadas en la plataforma.
//!
//! Flujo por entorno:
//! 1. cliente acotado a (cuenta por defecto, región del entorno)
//! 2. `list_resources` paginado con filtro (proyecto AND entorno)
//! 3. resolución de identidad; los recursos sin tag de servicio se descartan
//! 4. `describe_resource_config` por recurso, con concurrencia acotada y
//!    orden de salida igual al orden de la plataforma
//!
//! Cualquier fallo aborta la llamada completa: no hay resultados parciales.
use std::sync::Arc;

use deploy_core::platform::{ListResourcesRequest, PlatformResource, TagFilter};
use deploy_core::{Account, CallGuard, CancellationToken, Environment, JobError, PlatformClient, PlatformConnector, Result,
                  WorkflowStore};
use futures::stream::{self, StreamExt, TryStreamExt};
use indexmap::IndexMap;
use log::{debug, error, info, warn};

use crate::config::DiscoveryConfig;
use crate::envvars::decode_env_vars;
use crate::identity::{resolve_identity, Identity};
use crate::spec::{EnvOption, ServiceIdentity, ServiceInfo};

pub struct Discoverer {
    store: Arc<dyn WorkflowStore>,
    connector: Arc<dyn PlatformConnector>,
    config: DiscoveryConfig,
}

impl Discoverer {
    pub fn new(store: Arc<dyn WorkflowStore>, connector: Arc<dyn PlatformConnector>, config: DiscoveryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store,
                  connector,
                  config })
    }

    pub fn store(&self) -> &Arc<dyn WorkflowStore> {
        &self.store
    }

    pub(crate) fn guard(&self, cancel: &CancellationToken) -> CallGuard {
        CallGuard::new(cancel.clone()).with_deadline(self.config.call_timeout)
    }

    /// Opciones de todos los entornos del proyecto, en orden de registro.
    pub async fn discover(&self, project: &str, cancel: &CancellationToken) -> Result<Vec<EnvOption>> {
        self.discover_filtered(project, None, cancel).await
    }

    /// Opciones de un único entorno; `None` si no está registrado. Los demás
    /// entornos no se consultan.
    pub async fn discover_env(&self, project: &str, env_name: &str, cancel: &CancellationToken) -> Result<Option<EnvOption>> {
        Ok(self.discover_filtered(project, Some(env_name), cancel).await?.into_iter().next())
    }

    async fn discover_filtered(&self, project: &str, only_env: Option<&str>, cancel: &CancellationToken) -> Result<Vec<EnvOption>> {
        let guard = self.guard(cancel);
        let account = guard.run("find_default_account", self.store.find_default_account(project))
                           .await?
                           .ok_or_else(|| JobError::Configuration(format!("no default platform account registered for project {project}")))
                           .inspect_err(|e| error!("discovery for project {project}: {e}"))?;

        let environments = guard.run("list_environments", self.list_environments(project))
                                .await
                                .inspect_err(|e| error!("discovery for project {project}: {e}"))?;

        let mut options = Vec::new();
        for env in environments.iter().filter(|env| only_env.map_or(true, |name| env.name == name)) {
            let option = self.discover_in(project, &account, env, &guard)
                             .await
                             .inspect_err(|e| error!("discovery for project {project}, env {}: {e}", env.name))?;
            options.push(option);
        }
        info!("discovered {} environment(s) for project {project}", options.len());
        Ok(options)
    }

    /// El listado de entornos es parte del descubrimiento: su fallo se
    /// reporta como fallo externo (la cancelación se conserva).
    async fn list_environments(&self, project: &str) -> Result<Vec<Environment>> {
        self.store.list_environments(project).await.map_err(|e| match e {
                                                       JobError::Cancelled(_) => e,
                                                       other => JobError::platform("list_environments", other.to_string()),
                                                   })
    }

    async fn discover_in(&self, project: &str, account: &Account, env: &Environment, guard: &CallGuard) -> Result<EnvOption> {
        let client = guard.run("connect", self.connector.connect(account, &env.region_id)).await?;
        let client = client.as_ref();
        let resources = self.list_all(client, project, env, guard).await?;

        let keys = &self.config.tag_keys;
        let identified: Vec<(ServiceIdentity, PlatformResource)> =
            resources.into_iter()
                     .filter_map(|resource| match resolve_identity(&resource.tags, keys) {
                         Identity::Identified(id) => Some((id, resource)),
                         Identity::Unidentified => {
                             debug!("env {}: skipping resource {:?} without service tag", env.name, resource.app_name);
                             None
                         }
                     })
                     .collect();

        let calls: Vec<_> = identified.into_iter()
                                      .map(|(id, resource)| self.describe(client, id, resource, guard))
                                      .collect();
        let infos: Vec<ServiceInfo> = stream::iter(calls).buffered(self.config.concurrency).try_collect().await?;

        // última aparición gana y toma su posición
        let mut by_identity: IndexMap<ServiceIdentity, ServiceInfo> = IndexMap::with_capacity(infos.len());
        for info in infos {
            let id = info.identity();
            if let Some(previous) = by_identity.shift_remove(&id) {
                warn!("env {}: duplicate identity {}/{} (app {} replaced by app {})",
                      env.name, id.service_name, id.service_module, previous.app_id, info.app_id);
            }
            by_identity.insert(id, info);
        }
        debug!("env {} (region {}): {} service(s) resolved", env.name, client.region_id(), by_identity.len());
        Ok(EnvOption { env: env.name.clone(),
                       services: by_identity.into_values().collect() })
    }

    /// Recorre todas las páginas hasta una página corta o el total reportado.
    async fn list_all(&self, client: &dyn PlatformClient, project: &str, env: &Environment, guard: &CallGuard) -> Result<Vec<PlatformResource>> {
        let keys = &self.config.tag_keys;
        let page_size = self.config.page_size;
        let cap = self.config.max_resources;
        let tags = vec![TagFilter::new(keys.project.clone(), project), TagFilter::new(keys.env.clone(), env.name.clone())];
        let over_cap = || {
            JobError::Configuration(format!("environment {} holds more than {cap} resources (max_resources)", env.name))
        };

        let mut collected: Vec<PlatformResource> = Vec::new();
        let mut page = 1u32;
        loop {
            let request = ListResourcesRequest { tags: tags.clone(),
                                                 page,
                                                 page_size };
            let response = guard.run("list_resources", async {
                                    client.list_resources(&request).await.map_err(|e| e.into_job_error("list_resources"))
                                })
                                .await?;
            let data = response.into_page()?;
            if data.total_size.is_some_and(|total| total > cap) {
                return Err(over_cap());
            }
            let fetched = data.applications.len();
            collected.extend(data.applications);
            if collected.len() > cap as usize {
                return Err(over_cap());
            }
            debug!("env {}: page {page} returned {fetched} resource(s)", env.name);
            let total_reached = data.total_size.is_some_and(|total| collected.len() >= total as usize);
            if fetched < page_size as usize || total_reached {
                break;
            }
            page += 1;
        }
        Ok(collected)
    }

    async fn describe(&self, client: &dyn PlatformClient, id: ServiceIdentity, resource: PlatformResource, guard: &CallGuard) -> Result<ServiceInfo> {
        let app_id = resource.app_id
                             .filter(|app_id| !app_id.is_empty())
                             .ok_or_else(|| {
                                 JobError::platform("describe_resource_config",
                                                    format!("resource of service {}/{} carries no app id", id.service_name, id.service_module))
                             })?;
        let config = guard.run("describe_resource_config", async {
                              client.describe_resource_config(&app_id)
                                    .await
                                    .map_err(|e| e.into_job_error("describe_resource_config"))
                          })
                          .await?
                          .into_config()?;
        let envs = decode_env_vars(config.envs.as_deref())?;
        Ok(ServiceInfo { app_id,
                         app_name: resource.app_name.unwrap_or_default(),
                         image: config.image_url.or(resource.image_url).unwrap_or_default(),
                         instances: config.replicas.or(resource.instances).unwrap_or_default(),
                         envs,
                         service_name: id.service_name,
                         service_module: id.service_module })
    }
}
