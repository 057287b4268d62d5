//! Hashing de contenido para fingerprints: blake3 sobre JSON canónico, en
//! hex. Cambiar de algoritmo invalida todos los fingerprints emitidos.

pub mod canonical_json;

use serde_json::Value;

pub use canonical_json::to_canonical_json;

pub fn hash_str(input: &str) -> String {
    blake3::hash(input.as_bytes()).to_hex().to_string()
}

/// Hash del JSON canónico de `value`: independiente del orden de claves.
pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}
