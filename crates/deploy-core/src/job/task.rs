//! Descriptor de tarea: la unidad que el task runner ejecuta.
//!
//! Cada descriptor es autocontenido: lleva imagen, identidad de la app,
//! variables y región, de modo que el runner no necesita estado externo
//! compartido. El `fingerprint` resume los campos relevantes para la
//! ejecución (no incluye `task_id`), lo que permite detectar envíos
//! idénticos entre ejecuciones.
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::constants::TASK_SCHEMA_VERSION;
use crate::hashing::hash_value;
use crate::model::{EnvVar, JobType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub task_id: i64,
    pub job_name: String,
    pub job_type: JobType,
    /// Clave estable dentro del run: `job/servicio[/módulo]`.
    pub key: String,
    pub env: String,
    pub region_id: String,
    pub app_id: String,
    pub app_name: String,
    pub service_name: String,
    pub service_module: String,
    pub image: String,
    pub envs: Vec<EnvVar>,
    /// Job upstream del que proviene la selección, ya resuelto.
    pub upstream_job: Option<String>,
    pub fingerprint: String,
}

impl TaskDescriptor {
    pub fn task_key(job_name: &str, service_name: &str, service_module: &str) -> String {
        if service_module.is_empty() {
            format!("{job_name}/{service_name}")
        } else {
            format!("{job_name}/{service_name}/{service_module}")
        }
    }

    pub fn compute_fingerprint(&self) -> String {
        let input = json!({
            "schema_version": TASK_SCHEMA_VERSION,
            "job_type": self.job_type,
            "key": self.key,
            "env": self.env,
            "region_id": self.region_id,
            "app_id": self.app_id,
            "image": self.image,
            "envs": self.envs,
            "upstream_job": self.upstream_job,
        });
        hash_value(&input)
    }

    /// Fija el fingerprint a partir del contenido actual.
    pub fn sealed(mut self) -> Self {
        self.fingerprint = self.compute_fingerprint();
        self
    }
}
