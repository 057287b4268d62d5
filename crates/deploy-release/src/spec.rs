//! Spec tipado del job de release sobre la plataforma.
//!
//! Distinción clave entre campos:
//! - De plantilla (los fija quien diseña el workflow): `source`,
//!   `default_services`, `job_name`, `origin_job_name`.
//! - Del usuario (persistidos, nunca pisados por un refresh): `env_config`,
//!   `services`.
//! - Derivados (recalculados en cada refresh, nunca fusionados): `env_options`.
use deploy_core::{EnvVar, JobSpecCodec, JobType};
use serde::{Deserialize, Serialize};

/// Origen de la lista de servicios a desplegar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ServiceSource {
    /// Servicios elegidos literalmente en el spec.
    #[default]
    #[serde(rename = "literal", alias = "runtime")]
    Literal,
    /// Servicios heredados de la salida de un job upstream.
    #[serde(rename = "fromjob")]
    FromUpstreamJob,
}

/// Identidad lógica (servicio, módulo) de una unidad desplegable. Es la única
/// clave estable entre refrescos; `app_id` puede cambiar en la plataforma.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceIdentity {
    pub service_name: String,
    #[serde(default)]
    pub service_module: String,
}

impl ServiceIdentity {
    pub fn new(service_name: impl Into<String>, service_module: impl Into<String>) -> Self {
        Self { service_name: service_name.into(),
               service_module: service_module.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvConfig {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceConfig {
    pub source: ServiceSource,
    pub default_services: Vec<ServiceIdentity>,
    pub services: Vec<DeploySelection>,
    pub job_name: String,
    pub origin_job_name: String,
}

/// Aplicación descubierta en un entorno, con su configuración de runtime.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceInfo {
    pub app_id: String,
    pub app_name: String,
    pub image: String,
    pub instances: i32,
    pub envs: Vec<EnvVar>,
    pub service_name: String,
    pub service_module: String,
}

impl ServiceInfo {
    pub fn identity(&self) -> ServiceIdentity {
        ServiceIdentity::new(self.service_name.clone(), self.service_module.clone())
    }
}

/// Servicio seleccionado para desplegar. Snapshot válido sólo respecto al
/// refresh que lo produjo.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploySelection {
    pub app_id: String,
    pub app_name: String,
    pub image: String,
    pub envs: Vec<EnvVar>,
    pub service_name: String,
    pub service_module: String,
}

impl DeploySelection {
    pub fn identity(&self) -> ServiceIdentity {
        ServiceIdentity::new(self.service_name.clone(), self.service_module.clone())
    }
}

impl From<&ServiceInfo> for DeploySelection {
    fn from(info: &ServiceInfo) -> Self {
        Self { app_id: info.app_id.clone(),
               app_name: info.app_name.clone(),
               image: info.image.clone(),
               envs: info.envs.clone(),
               service_name: info.service_name.clone(),
               service_module: info.service_module.clone() }
    }
}

/// Opciones de un entorno para la UI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvOption {
    pub env: String,
    pub services: Vec<ServiceInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReleaseJobSpec {
    pub env_config: EnvConfig,
    pub service_config: ServiceConfig,
    pub env_options: Vec<EnvOption>,
}

impl JobSpecCodec for ReleaseJobSpec {
    const JOB_TYPE: JobType = JobType::PlatformRelease;
}

impl ReleaseJobSpec {
    /// Vacía la selección del usuario (entorno + servicios).
    pub fn clear_selection(&mut self) {
        self.env_config.name.clear();
        self.service_config.services = Vec::new();
    }

    /// Resuelve la indirección de job upstream: si el origen es un job
    /// upstream y hay `origin_job_name`, éste pasa a ser el `job_name`.
    pub fn resolve_upstream(&mut self) {
        if self.service_config.source == ServiceSource::FromUpstreamJob && !self.service_config.origin_job_name.is_empty() {
            self.service_config.job_name = self.service_config.origin_job_name.clone();
        }
    }

    /// Job upstream efectivo, si el origen lo requiere.
    pub fn upstream_job(&self) -> Option<&str> {
        match self.service_config.source {
            ServiceSource::FromUpstreamJob if !self.service_config.job_name.is_empty() => Some(&self.service_config.job_name),
            _ => None,
        }
    }

    /// Incorpora los campos de plantilla de `latest` conservando la
    /// selección del usuario. Las opciones derivadas se descartan.
    pub fn absorb_template(&mut self, latest: &ReleaseJobSpec) {
        self.service_config.source = latest.service_config.source;
        self.service_config.default_services = latest.service_config.default_services.clone();
        self.service_config.job_name = latest.service_config.job_name.clone();
        self.service_config.origin_job_name = latest.service_config.origin_job_name.clone();
        self.env_options = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_wire_names() {
        let raw = json!({
            "envConfig": {"name": "dev"},
            "serviceConfig": {
                "source": "fromjob",
                "defaultServices": [{"serviceName": "svcA", "serviceModule": "m1"}, {"serviceName": "svcB"}],
                "services": [{"appId": "1", "serviceName": "svcA", "serviceModule": "m1", "envs": [{"key": "K", "value": "V"}]}],
                "jobName": "build",
                "originJobName": "build-origin"
            }
        });
        let spec = ReleaseJobSpec::decode(&raw).unwrap();
        assert_eq!(spec.env_config.name, "dev");
        assert_eq!(spec.service_config.source, ServiceSource::FromUpstreamJob);
        assert_eq!(spec.service_config.default_services[1], ServiceIdentity::new("svcB", ""));
        assert_eq!(spec.service_config.services[0].envs, vec![EnvVar::new("K", "V")]);
        assert!(spec.env_options.is_empty());
    }

    #[test]
    fn encode_uses_camel_case() {
        let mut spec = ReleaseJobSpec::default();
        spec.env_config.name = "prod".into();
        let v = spec.encode().unwrap();
        assert_eq!(v["envConfig"]["name"], json!("prod"));
        assert_eq!(v["serviceConfig"]["source"], json!("literal"));
        assert_eq!(v["envOptions"], json!([]));
    }

    #[test]
    fn resolve_upstream_only_for_upstream_source() {
        let mut spec = ReleaseJobSpec::default();
        spec.service_config.job_name = "a".into();
        spec.service_config.origin_job_name = "b".into();
        spec.resolve_upstream();
        assert_eq!(spec.service_config.job_name, "a");
        assert_eq!(spec.upstream_job(), None);

        spec.service_config.source = ServiceSource::FromUpstreamJob;
        spec.resolve_upstream();
        assert_eq!(spec.service_config.job_name, "b");
        assert_eq!(spec.upstream_job(), Some("b"));
    }

    #[test]
    fn resolve_upstream_keeps_job_name_without_origin() {
        let mut spec = ReleaseJobSpec::default();
        spec.service_config.source = ServiceSource::FromUpstreamJob;
        spec.service_config.job_name = "a".into();
        spec.resolve_upstream();
        assert_eq!(spec.service_config.job_name, "a");
    }

    #[test]
    fn absorb_template_keeps_user_selection() {
        let mut working = ReleaseJobSpec::default();
        working.env_config.name = "dev".into();
        working.service_config.services = vec![DeploySelection { app_id: "1".into(),
                                                                 service_name: "svcA".into(),
                                                                 ..Default::default() }];
        working.env_options = vec![EnvOption { env: "dev".into(),
                                               services: vec![] }];

        let mut latest = ReleaseJobSpec::default();
        latest.env_config.name = "prod".into();
        latest.service_config.default_services = vec![ServiceIdentity::new("svcB", "")];
        latest.service_config.source = ServiceSource::FromUpstreamJob;
        latest.service_config.job_name = "build".into();

        working.absorb_template(&latest);
        assert_eq!(working.env_config.name, "dev");
        assert_eq!(working.service_config.services.len(), 1);
        assert_eq!(working.service_config.default_services, vec![ServiceIdentity::new("svcB", "")]);
        assert_eq!(working.service_config.source, ServiceSource::FromUpstreamJob);
        assert_eq!(working.service_config.job_name, "build");
        assert!(working.env_options.is_empty());
    }
}
