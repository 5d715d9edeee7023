use std::collections::HashMap;
use std::fmt;

use bevy::prelude::*;
use serde::Deserialize;

use crate::sides::CellSides;
use crate::validators::{ValidatorBuildError, ValidatorRegistry};

use super::types::{AssetPath, ContentDefinition, ContentId};

/// Errors raised while building a catalog from authored JSON.
#[derive(Debug)]
pub enum CatalogError {
    /// The document is not valid catalog JSON.
    Parse(serde_json::Error),
    /// Two rows share a name.
    DuplicateRow(ContentId),
    /// A validator entry has no `kind` field.
    MissingValidatorKind { row: ContentId },
    /// A validator `kind` has no registered factory.
    UnknownValidator { row: ContentId, kind: String },
    /// A registered factory rejected the entry's parameters.
    InvalidValidator {
        row: ContentId,
        kind: String,
        message: String,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Parse(e) => write!(f, "Catalog parse error: {e}"),
            CatalogError::DuplicateRow(row) => write!(f, "Duplicate catalog row '{row}'"),
            CatalogError::MissingValidatorKind { row } => {
                write!(f, "Row '{row}': validator entry is missing 'kind'")
            }
            CatalogError::UnknownValidator { row, kind } => {
                write!(f, "Row '{row}': unknown validator kind '{kind}'")
            }
            CatalogError::InvalidValidator { row, kind, message } => {
                write!(f, "Row '{row}': invalid '{kind}' validator: {message}")
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e)
    }
}

#[derive(Deserialize)]
struct RawRow {
    name: ContentId,
    #[serde(default)]
    has_connections: CellSides,
    #[serde(default)]
    disable_neighbour_sides: CellSides,
    #[serde(default)]
    assets: Vec<AssetPath>,
    #[serde(default)]
    validators: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Authored table of cell content, addressed by `ContentId`.
///
/// Rows keep their authoring order; `valid_candidates` and the demo walk
/// them in that order.
#[derive(Resource, Debug, Clone, Default)]
pub struct ContentCatalog {
    name: String,
    rows: Vec<(ContentId, ContentDefinition)>,
    index: HashMap<ContentId, usize>,
}

impl ContentCatalog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse a JSON array of rows, resolving validator entries through
    /// `registry`.
    pub fn from_json(
        name: impl Into<String>,
        json: &str,
        registry: &ValidatorRegistry,
    ) -> Result<Self, CatalogError> {
        let raw_rows: Vec<RawRow> = serde_json::from_str(json)?;
        let mut catalog = Self::new(name);

        for raw in raw_rows {
            let mut definition = ContentDefinition::new(raw.has_connections)
                .disabling(raw.disable_neighbour_sides);
            definition.assets = raw.assets;

            for mut entry in raw.validators {
                let kind = match entry.remove("kind") {
                    Some(serde_json::Value::String(kind)) => kind,
                    _ => {
                        return Err(CatalogError::MissingValidatorKind {
                            row: raw.name.clone(),
                        })
                    }
                };
                let params = serde_json::Value::Object(entry);
                let validator = registry.build(&kind, &params).map_err(|e| match e {
                    ValidatorBuildError::UnknownKind => CatalogError::UnknownValidator {
                        row: raw.name.clone(),
                        kind: kind.clone(),
                    },
                    ValidatorBuildError::InvalidParams(message) => CatalogError::InvalidValidator {
                        row: raw.name.clone(),
                        kind: kind.clone(),
                        message,
                    },
                })?;
                definition.validators.push(validator);
            }

            catalog.try_insert(raw.name, definition)?;
        }

        info!(
            "Content catalog '{}' loaded with {} rows",
            catalog.name,
            catalog.len()
        );
        Ok(catalog)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a row, replacing an existing row of the same name in place.
    pub fn insert(&mut self, id: impl Into<ContentId>, definition: ContentDefinition) {
        let id = id.into();
        match self.index.get(&id) {
            Some(&i) => self.rows[i].1 = definition,
            None => {
                self.index.insert(id.clone(), self.rows.len());
                self.rows.push((id, definition));
            }
        }
    }

    fn try_insert(&mut self, id: ContentId, definition: ContentDefinition) -> Result<(), CatalogError> {
        if self.index.contains_key(&id) {
            return Err(CatalogError::DuplicateRow(id));
        }
        self.insert(id, definition);
        Ok(())
    }

    pub fn with_row(mut self, id: impl Into<ContentId>, definition: ContentDefinition) -> Self {
        self.insert(id, definition);
        self
    }

    pub fn lookup(&self, id: &ContentId) -> Option<&ContentDefinition> {
        self.index.get(id).map(|&i| &self.rows[i].1)
    }

    pub fn contains(&self, id: &ContentId) -> bool {
        self.index.contains_key(id)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&ContentId, &ContentDefinition)> {
        self.rows.iter().map(|(id, def)| (id, def))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
