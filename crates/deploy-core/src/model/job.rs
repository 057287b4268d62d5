//! Documento de workflow tal como lo persiste el engine: stages ordenados con
//! jobs, y cada job con su `spec` opaco.
//!
//! El `spec` es una unión etiquetada por `job_type`: sólo el controller del
//! tipo correspondiente lo decodifica a su struct concreto.
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tipos de job conocidos por el engine. Este fragmento sólo implementa
/// `PlatformRelease`; el resto se listan para que la búsqueda por
/// (nombre, tipo) sea exacta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    Build,
    Deploy,
    Approval,
    Freestyle,
    PlatformRelease,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Build => "build",
            JobType::Deploy => "deploy",
            JobType::Approval => "approval",
            JobType::Freestyle => "freestyle",
            JobType::PlatformRelease => "platform-release",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    #[serde(default)]
    pub spec: Value,
}

impl Job {
    pub fn new(name: impl Into<String>, job_type: JobType, spec: Value) -> Self {
        Self { name: name.into(),
               job_type,
               spec }
    }

    /// Misma identidad lógica dentro de un workflow: nombre + tipo.
    pub fn same_identity(&self, other: &Job) -> bool {
        self.name == other.name && self.job_type == other.job_type
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    pub project: String,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl Workflow {
    /// Busca el primer job con el mismo nombre y tipo recorriendo todos los
    /// stages en orden. No se detiene tras el primer stage sin coincidencia.
    pub fn find_job(&self, name: &str, job_type: JobType) -> Option<&Job> {
        self.stages
            .iter()
            .flat_map(|stage| stage.jobs.iter())
            .find(|job| job.name == name && job.job_type == job_type)
    }

    /// Itera todos los jobs del workflow en orden stage → job.
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.stages.iter().flat_map(|s| s.jobs.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn workflow() -> Workflow {
        Workflow { name: "wf".into(),
                   project: "p".into(),
                   stages: vec![Stage { name: "build".into(),
                                        jobs: vec![Job::new("release", JobType::Build, json!({}))] },
                                Stage { name: "deploy".into(),
                                        jobs: vec![Job::new("approve", JobType::Approval, json!({})),
                                                   Job::new("release", JobType::PlatformRelease, json!({"a": 1}))] }] }
    }

    #[test]
    fn find_job_scans_later_stages() {
        let wf = workflow();
        let job = wf.find_job("release", JobType::PlatformRelease).expect("job in second stage");
        assert_eq!(job.spec, json!({"a": 1}));
    }

    #[test]
    fn find_job_requires_name_and_type() {
        let wf = workflow();
        assert!(wf.find_job("approve", JobType::PlatformRelease).is_none());
        assert!(wf.find_job("missing", JobType::Build).is_none());
    }

    #[test]
    fn job_type_wire_name() {
        let job = Job::new("r", JobType::PlatformRelease, json!(null));
        let v = serde_json::to_value(&job).unwrap();
        assert_eq!(v["type"], json!("platform-release"));
        assert_eq!(JobType::PlatformRelease.to_string(), "platform-release");
    }
}
