//! deploy-adapters: implementaciones en memoria de las fronteras externas.
//!
//! - `InMemoryWorkflowStore`: cuentas, entornos y workflows persistidos.
//! - `InMemoryPlatform`: inventario de aplicaciones por región, con
//!   paginación real, contadores de llamadas e inyección de fallos y
//!   latencia.
//!
//! Se usan en los tests de integración y en el binario de demostración; el
//! estado puede mutarse entre llamadas para simular una plataforma que
//! cambia bajo los pies del engine.

pub mod platform;
pub mod store;

pub use platform::{InMemoryPlatform, PlatformApp};
pub use store::InMemoryWorkflowStore;
