//! Plataforma de aplicaciones en memoria.
//!
//! El inventario se indexa por región; el conector entrega clientes
//! acotados a (cuenta, región) que comparten el mismo estado, de modo que un
//! test puede re-etiquetar o borrar aplicaciones entre dos refrescos.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use deploy_core::platform::{DescribeConfigResponse, ListResourcesRequest, ListResourcesResponse, PlatformResource, ResourceConfig,
                            ResourcePage, ResourceTag, ResponseStatus, TagFilter};
use deploy_core::{Account, EnvVar, JobError, PlatformClient, PlatformConnector, Result, TransportError};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Aplicación registrada en la plataforma.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformApp {
    pub app_id: String,
    pub app_name: String,
    pub image: String,
    pub replicas: i32,
    pub tags: Vec<ResourceTag>,
    pub envs: Vec<EnvVar>,
    /// Payload de variables tal cual; si está presente reemplaza a `envs`.
    pub raw_envs: Option<String>,
}

impl PlatformApp {
    pub fn new(app_id: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self { app_id: app_id.into(),
               app_name: app_name.into(),
               ..Default::default() }
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(ResourceTag::new(key, value));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push(EnvVar::new(key, value));
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    fn matches(&self, key: &str, value: &str) -> bool {
        self.tags.iter().any(|t| t.key.as_deref() == Some(key) && t.value.as_deref() == Some(value))
    }

    fn encoded_envs(&self) -> String {
        match &self.raw_envs {
            Some(raw) => raw.clone(),
            None => {
                let entries: Vec<_> = self.envs.iter().map(|e| json!({"name": e.key, "value": e.value})).collect();
                serde_json::Value::Array(entries).to_string()
            }
        }
    }

    fn listed(&self) -> PlatformResource {
        PlatformResource { app_id: Some(self.app_id.clone()).filter(|id| !id.is_empty()),
                           app_name: Some(self.app_name.clone()),
                           image_url: Some(self.image.clone()),
                           instances: Some(self.replicas),
                           tags: self.tags.clone() }
    }
}

#[derive(Default)]
struct PlatformState {
    /// región -> aplicaciones en orden de la plataforma
    inventory: DashMap<String, Vec<PlatformApp>>,
    /// app_id -> respuesta no exitosa a devolver en `describe`
    describe_failures: DashMap<String, ResponseStatus>,
    /// operación -> fallo de transporte
    transport_failures: DashMap<String, TransportError>,
    /// región -> fallo al conectar
    connect_failures: DashMap<String, JobError>,
    latency: RwLock<Option<Duration>>,
    report_total: RwLock<bool>,
    list_calls: AtomicUsize,
    describe_calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    connections: RwLock<Vec<(String, String)>>,
}

/// Conector y estado compartido de la plataforma en memoria.
#[derive(Clone)]
pub struct InMemoryPlatform {
    state: Arc<PlatformState>,
}

impl Default for InMemoryPlatform {
    fn default() -> Self {
        let state = PlatformState::default();
        if let Ok(mut report) = state.report_total.write() {
            *report = true;
        }
        Self { state: Arc::new(state) }
    }
}

impl InMemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta una aplicación en la región o la reemplaza en su posición.
    pub fn put_app(&self, region_id: &str, app: PlatformApp) {
        let mut apps = self.state.inventory.entry(region_id.to_string()).or_default();
        match apps.iter_mut().find(|a| !app.app_id.is_empty() && a.app_id == app.app_id) {
            Some(slot) => *slot = app,
            None => apps.push(app),
        }
    }

    pub fn with_app(self, region_id: &str, app: PlatformApp) -> Self {
        self.put_app(region_id, app);
        self
    }

    pub fn remove_app(&self, region_id: &str, app_id: &str) {
        if let Some(mut apps) = self.state.inventory.get_mut(region_id) {
            apps.retain(|a| a.app_id != app_id);
        }
    }

    pub fn fail_describe(&self, app_id: &str, status: ResponseStatus) {
        self.state.describe_failures.insert(app_id.to_string(), status);
    }

    /// `operation`: `list_resources` o `describe_resource_config`.
    pub fn fail_transport(&self, operation: &str, error: TransportError) {
        self.state.transport_failures.insert(operation.to_string(), error);
    }

    pub fn fail_connect(&self, region_id: &str, error: JobError) {
        self.state.connect_failures.insert(region_id.to_string(), error);
    }

    pub fn clear_failures(&self) {
        self.state.describe_failures.clear();
        self.state.transport_failures.clear();
        self.state.connect_failures.clear();
    }

    /// Latencia artificial antes de cada respuesta.
    pub fn set_latency(&self, latency: Option<Duration>) {
        if let Ok(mut slot) = self.state.latency.write() {
            *slot = latency;
        }
    }

    /// Si es `false`, las páginas no informan `total_size`.
    pub fn set_report_total(&self, report: bool) {
        if let Ok(mut slot) = self.state.report_total.write() {
            *slot = report;
        }
    }

    pub fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    pub fn describe_calls(&self) -> usize {
        self.state.describe_calls.load(Ordering::SeqCst)
    }

    /// Máximo de `describe` simultáneos observado.
    pub fn peak_in_flight(&self) -> usize {
        self.state.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Pares (cuenta, región) para los que se abrió un cliente.
    pub fn connections(&self) -> Vec<(String, String)> {
        self.state.connections.read().map(|c| c.clone()).unwrap_or_default()
    }
}

impl PlatformState {
    async fn delay(&self) {
        let latency = self.latency.read().ok().and_then(|l| *l);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn transport_failure(&self, operation: &str) -> std::result::Result<(), TransportError> {
        match self.transport_failures.get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

struct InMemoryClient {
    state: Arc<PlatformState>,
    region_id: String,
}

#[async_trait]
impl PlatformClient for InMemoryClient {
    fn region_id(&self) -> &str {
        &self.region_id
    }

    async fn list_resources(&self, request: &ListResourcesRequest) -> std::result::Result<ListResourcesResponse, TransportError> {
        self.state.list_calls.fetch_add(1, Ordering::SeqCst);
        self.state.delay().await;
        self.state.transport_failure("list_resources")?;

        // el filtro viaja codificado, igual que en la API real
        let filter: Vec<TagFilter> = request.tags_json()
                                            .and_then(|raw| serde_json::from_str(&raw).map_err(|e| JobError::Decode(e.to_string())))
                                            .map_err(|e| TransportError::new(format!("malformed tag filter: {e}")))?;
        let matching: Vec<PlatformResource> = self.state
                                                  .inventory
                                                  .get(&self.region_id)
                                                  .map(|apps| {
                                                      apps.iter()
                                                          .filter(|app| filter.iter().all(|f| app.matches(&f.key, &f.value)))
                                                          .map(PlatformApp::listed)
                                                          .collect()
                                                  })
                                                  .unwrap_or_default();
        let total = matching.len() as u32;
        let size = request.page_size.max(1) as usize;
        let start = (request.page.max(1) as usize - 1) * size;
        let applications: Vec<PlatformResource> = matching.into_iter().skip(start).take(size).collect();
        debug!("in-memory platform: region {} page {} -> {} app(s)", self.region_id, request.page, applications.len());

        let report_total = self.state.report_total.read().map(|r| *r).unwrap_or(true);
        Ok(ListResourcesResponse { status: ResponseStatus::ok(),
                                   data: Some(ResourcePage { applications,
                                                             current_page: Some(request.page),
                                                             page_size: Some(request.page_size),
                                                             total_size: report_total.then_some(total) }) })
    }

    async fn describe_resource_config(&self, app_id: &str) -> std::result::Result<DescribeConfigResponse, TransportError> {
        self.state.describe_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        self.state.delay().await;
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.state.transport_failure("describe_resource_config")?;

        if let Some(status) = self.state.describe_failures.get(app_id) {
            return Ok(DescribeConfigResponse { status: status.clone(),
                                               data: None });
        }
        let app = self.state
                      .inventory
                      .get(&self.region_id)
                      .and_then(|apps| apps.iter().find(|a| a.app_id == app_id).cloned());
        Ok(match app {
            Some(app) => DescribeConfigResponse { status: ResponseStatus::ok(),
                                                  data: Some(ResourceConfig { envs: Some(app.encoded_envs()),
                                                                              image_url: Some(app.image.clone()),
                                                                              replicas: Some(app.replicas) }) },
            None => DescribeConfigResponse { status: ResponseStatus { status_code: Some(404),
                                                                      success: Some(false),
                                                                      code: Some("NotFound".into()),
                                                                      error_code: Some("Application.NotFound".into()),
                                                                      message: Some(format!("application {app_id} does not exist")) },
                                             data: None },
        })
    }
}

#[async_trait]
impl PlatformConnector for InMemoryPlatform {
    async fn connect(&self, account: &Account, region_id: &str) -> Result<Arc<dyn PlatformClient>> {
        if let Some(err) = self.state.connect_failures.get(region_id) {
            return Err(err.clone());
        }
        if let Ok(mut connections) = self.state.connections.write() {
            connections.push((account.id.clone(), region_id.to_string()));
        }
        Ok(Arc::new(InMemoryClient { state: Arc::clone(&self.state),
                                     region_id: region_id.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: u32, page_size: u32) -> ListResourcesRequest {
        ListResourcesRequest { tags: vec![TagFilter::new("zadig-project", "P")],
                               page,
                               page_size }
    }

    async fn client(platform: &InMemoryPlatform) -> Arc<dyn PlatformClient> {
        platform.connect(&Account::default(), "R").await.unwrap()
    }

    #[tokio::test]
    async fn lists_matching_apps_by_page() {
        let platform = InMemoryPlatform::new();
        for i in 0..5 {
            platform.put_app("R", PlatformApp::new(format!("app-{i}"), format!("n{i}")).tag("zadig-project", "P"));
        }
        platform.put_app("R", PlatformApp::new("other", "other").tag("zadig-project", "Q"));
        let client = client(&platform).await;

        let page = client.list_resources(&request(2, 2)).await.unwrap().into_page().unwrap();
        let ids: Vec<_> = page.applications.iter().filter_map(|a| a.app_id.clone()).collect();
        assert_eq!(ids, vec!["app-2", "app-3"]);
        assert_eq!(page.total_size, Some(5));

        let last = client.list_resources(&request(3, 2)).await.unwrap().into_page().unwrap();
        assert_eq!(last.applications.len(), 1);
        assert_eq!(platform.list_calls(), 2);
    }

    #[tokio::test]
    async fn encoded_filter_requires_every_tag() {
        let platform = InMemoryPlatform::new().with_app("R", PlatformApp::new("dev", "dev").tag("zadig-project", "P").tag("zadig-env", "dev"))
                                              .with_app("R", PlatformApp::new("prod", "prod").tag("zadig-project", "P").tag("zadig-env", "prod"));
        let client = client(&platform).await;
        let req = ListResourcesRequest { tags: vec![TagFilter::new("zadig-project", "P"), TagFilter::new("zadig-env", "prod")],
                                         page: 1,
                                         page_size: 10 };
        let page = client.list_resources(&req).await.unwrap().into_page().unwrap();
        let ids: Vec<_> = page.applications.iter().filter_map(|a| a.app_id.clone()).collect();
        assert_eq!(ids, vec!["prod"]);
    }

    #[tokio::test]
    async fn describe_encodes_envs_and_reports_missing_app() {
        let platform = InMemoryPlatform::new().with_app("R", PlatformApp::new("1", "App1").env("K", "V").image("img:1"));
        let client = client(&platform).await;
        let config = client.describe_resource_config("1").await.unwrap().into_config().unwrap();
        assert_eq!(config.envs.as_deref(), Some(r#"[{"name":"K","value":"V"}]"#));
        assert_eq!(config.image_url.as_deref(), Some("img:1"));

        let err = client.describe_resource_config("nope").await.unwrap().into_config().unwrap_err();
        assert!(matches!(err, JobError::ExternalPlatform(ref f) if f.status_code == Some(404)));
    }

    #[tokio::test]
    async fn transport_failure_injection() {
        let platform = InMemoryPlatform::new();
        platform.fail_transport("list_resources", TransportError::new("connection reset"));
        let client = client(&platform).await;
        assert_eq!(client.list_resources(&request(1, 10)).await.unwrap_err().message, "connection reset");
        platform.clear_failures();
        assert!(client.list_resources(&request(1, 10)).await.is_ok());
    }
}
