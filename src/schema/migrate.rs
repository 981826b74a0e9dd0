//! Chained per-version migrations applied to persisted documents before validation.
//!
//! A step registered for version `n` receives a document declaring `version: n` and must
//! return one declaring `version: n + 1`. Steps run in sequence until the document reaches
//! [`CURRENT_VERSION`](super::CURRENT_VERSION).

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::error::MigrationError;
use super::CURRENT_VERSION;

pub type MigrationStep = Box<dyn Fn(Value) -> Result<Value, MigrationError> + Send + Sync>;

#[derive(Default)]
pub struct Migrator {
    steps: BTreeMap<u32, MigrationStep>,
}

impl fmt::Debug for Migrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migrator")
            .field("from_versions", &self.steps.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Migrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step<F>(mut self, from: u32, step: F) -> Self
    where
        F: Fn(Value) -> Result<Value, MigrationError> + Send + Sync + 'static,
    {
        self.steps.insert(from, Box::new(step));
        self
    }

    pub fn migrate(&self, mut document: Value) -> Result<Value, MigrationError> {
        loop {
            let version = document_version(&document)?;
            if version == CURRENT_VERSION {
                return Ok(document);
            }
            if version > CURRENT_VERSION {
                return Err(MigrationError::FromFuture {
                    found: version,
                    supported: CURRENT_VERSION,
                });
            }

            let step = self
                .steps
                .get(&version)
                .ok_or(MigrationError::MissingStep { from: version })?;
            document = step(document)?;

            if document_version(&document)? <= version {
                return Err(MigrationError::Stalled { from: version });
            }
            tracing::info!(from = version, "migrated workspace document");
        }
    }
}

pub fn document_version(document: &Value) -> Result<u32, MigrationError> {
    document
        .get("version")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or(MigrationError::MissingVersion)
}

#[cfg(test)]
#[path = "../../tests/unit/schema/migrate.rs"]
mod tests;
