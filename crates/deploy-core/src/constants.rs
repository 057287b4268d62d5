//! Constantes del ciclo de vida de jobs y del descubrimiento de inventario.
//!
//! Las claves de tags son las que la plataforma ve en cada aplicación
//! gestionada; cambiarlas deja fuera de la reconciliación a todas las
//! aplicaciones ya etiquetadas. Los valores por defecto se pueden
//! sobreescribir vía `DiscoveryConfig` (ver crate raíz, `config`).

/// Tag que identifica el proyecto dueño del recurso.
pub const PROJECT_TAG_KEY: &str = "zadig-project";
/// Tag que identifica el entorno del proyecto.
pub const ENV_TAG_KEY: &str = "zadig-env";
/// Tag de identidad de servicio. Sin él, el recurso no existe para el engine.
pub const SERVICE_TAG_KEY: &str = "zadig-service";
/// Tag de módulo de servicio (opcional).
pub const SERVICE_MODULE_TAG_KEY: &str = "zadig-service-module";

/// Tamaño de página por defecto al listar recursos.
pub const DEFAULT_PAGE_SIZE: u32 = 100;
/// Tope explícito de recursos por entorno. Coincide con el tamaño de página
/// fijo que se usaba antes de paginar de verdad.
pub const DEFAULT_MAX_RESOURCES: u32 = 10_000;
/// Llamadas `describe` concurrentes por entorno.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Versión del esquema de `TaskDescriptor`. Forma parte del fingerprint: un
/// cambio invalida deterministamente los fingerprints previos.
pub const TASK_SCHEMA_VERSION: &str = "T1";
