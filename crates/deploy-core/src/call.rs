//! Guarda de llamadas externas: cada llamada al store o a la plataforma se
//! compite contra un token de cancelación y, opcionalmente, un deadline.
//!
//! Cancelación y deadline producen `JobError::Cancelled`, nunca
//! `ExternalPlatform`: el engine distingue "el usuario abortó" de "la
//! plataforma falló".
use std::future::Future;
use std::time::Duration;

use log::warn;
use tokio_util::sync::CancellationToken;

use crate::errors::{JobError, Result};

#[derive(Debug, Clone, Default)]
pub struct CallGuard {
    cancel: CancellationToken,
    deadline: Option<Duration>,
}

impl CallGuard {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel,
               deadline: None }
    }

    /// Deadline por llamada individual (no por operación completa).
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Falla inmediatamente si el token ya fue disparado.
    pub fn check(&self, operation: &str) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(JobError::Cancelled(format!("{operation} cancelled before start")));
        }
        Ok(())
    }

    /// Ejecuta `fut` respetando cancelación y deadline.
    pub async fn run<T, F>(&self, operation: &str, fut: F) -> Result<T>
        where F: Future<Output = Result<T>>
    {
        self.check(operation)?;
        let bounded = async {
            match self.deadline {
                Some(limit) => match tokio::time::timeout(limit, fut).await {
                    Ok(res) => res,
                    Err(_) => {
                        warn!("{operation} exceeded deadline of {}ms", limit.as_millis());
                        Err(JobError::Cancelled(format!("{operation} exceeded deadline of {}ms", limit.as_millis())))
                    }
                },
                None => fut.await,
            }
        };
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                warn!("{operation} cancelled in flight");
                Err(JobError::Cancelled(format!("{operation} cancelled")))
            }
            res = bounded => res,
        }
    }
}
