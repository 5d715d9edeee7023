use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::sides::CellSides;
use crate::validators::SpawnValidator;

/// Symbolic name of a catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ContentId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to loadable sub-level content. A blank path means the entry was
/// left unset in the catalog and loads nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetPath(String);

impl AssetPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for AssetPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One authored catalog row: the unrotated connection and blocking patterns,
/// the asset choices, and the checks run before the row may be placed.
#[derive(Debug, Clone, Default)]
pub struct ContentDefinition {
    pub has_connections: CellSides,
    pub disable_neighbour_sides: CellSides,
    pub assets: Vec<AssetPath>,
    pub validators: Vec<Arc<dyn SpawnValidator>>,
}

impl ContentDefinition {
    pub fn new(has_connections: CellSides) -> Self {
        Self {
            has_connections,
            ..Default::default()
        }
    }

    pub fn disabling(mut self, sides: CellSides) -> Self {
        self.disable_neighbour_sides = sides;
        self
    }

    pub fn with_assets<I, A>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<AssetPath>,
    {
        self.assets = assets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_validator(mut self, validator: impl SpawnValidator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }
}
