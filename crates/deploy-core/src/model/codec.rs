//! Frontera de decodificación: el `spec` de un job viaja como JSON opaco y
//! cada tipo de job lo decodifica a su struct concreto.
//!
//! Sigue la misma idea que los artifacts tipados: el payload neutro se valida
//! contra el tipo esperado (`JOB_TYPE`) antes de deserializar, y la validación
//! semántica ligera queda a cargo del tipo concreto.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::{JobError, Result};
use crate::model::{Job, JobType};

pub trait JobSpecCodec: Sized + Serialize + DeserializeOwned {
    /// Tipo de job al que pertenece este spec.
    const JOB_TYPE: JobType;

    /// Validación semántica ligera (sin efectos secundarios). Opcional.
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }

    /// Decodifica un payload opaco. `null` equivale a un spec vacío: un job
    /// recién creado desde la UI todavía no tiene campos.
    fn decode(raw: &Value) -> Result<Self> {
        let decoded: Self = match raw {
            Value::Null => serde_json::from_value(Value::Object(Default::default())),
            other => Self::deserialize(other),
        }.map_err(|e| JobError::Decode(e.to_string()))?;
        decoded.validate().map_err(JobError::Decode)?;
        Ok(decoded)
    }

    /// Decodifica el spec de un job verificando que el tipo coincida.
    fn decode_job(job: &Job) -> Result<Self> {
        if job.job_type != Self::JOB_TYPE {
            return Err(JobError::Decode(format!("job {} has type {}, expected {}", job.name, job.job_type, Self::JOB_TYPE)));
        }
        Self::decode(&job.spec)
    }

    fn encode(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| JobError::Encode(e.to_string()))
    }
}
