use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bevy::prelude::*;
use serde::de::DeserializeOwned;

use crate::cell::CellState;
use crate::query::LayoutQuery;
use crate::rng::CellRng;

use super::builtin::{EdgeMargin, MaxInstances, RandomChance};

/// Check run against a candidate before it may be placed.
///
/// `cell` is the candidate state, and `layout` already shows it at the
/// cell's position. `rng` is a fresh stream from the cell's unique seed.
pub trait SpawnValidator: fmt::Debug + Send + Sync {
    fn kind(&self) -> &str;

    fn is_valid_spawn(&self, layout: &dyn LayoutQuery, cell: &CellState, rng: &mut CellRng) -> bool;
}

/// Why a registry could not build a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorBuildError {
    UnknownKind,
    InvalidParams(String),
}

/// Builds a validator from the parameters of a catalog entry (every field
/// except `kind`).
pub type ValidatorFactory =
    Box<dyn Fn(&serde_json::Value) -> Result<Arc<dyn SpawnValidator>, ValidatorBuildError> + Send + Sync>;

/// Validator kinds known to catalog loading. Starts with the built-in kinds;
/// games register their own before loading catalogs that use them.
#[derive(Resource)]
pub struct ValidatorRegistry {
    factories: HashMap<String, ValidatorFactory>,
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_params::<RandomChance>(RandomChance::KIND);
        registry.register_params::<EdgeMargin>(EdgeMargin::KIND);
        registry.register_params::<MaxInstances>(MaxInstances::KIND);
        registry
    }
}

impl ValidatorRegistry {
    /// Registry with no kinds, not even the built-ins.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory for `kind`, replacing any previous one.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&serde_json::Value) -> Result<Arc<dyn SpawnValidator>, ValidatorBuildError>
            + Send
            + Sync
            + 'static,
    {
        let kind = kind.into();
        if self.factories.insert(kind.clone(), Box::new(factory)).is_some() {
            warn!("ValidatorRegistry: replacing factory for '{}'", kind);
        }
    }

    /// Register a validator type whose parameters deserialize straight into it.
    pub fn register_params<V>(&mut self, kind: impl Into<String>)
    where
        V: SpawnValidator + DeserializeOwned + 'static,
    {
        self.register(kind, |params: &serde_json::Value| {
            serde_json::from_value::<V>(params.clone())
                .map(|v| Arc::new(v) as Arc<dyn SpawnValidator>)
                .map_err(|e| ValidatorBuildError::InvalidParams(e.to_string()))
        });
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn build(
        &self,
        kind: &str,
        params: &serde_json::Value,
    ) -> Result<Arc<dyn SpawnValidator>, ValidatorBuildError> {
        let factory = self
            .factories
            .get(kind)
            .ok_or(ValidatorBuildError::UnknownKind)?;
        factory(params)
    }
}
