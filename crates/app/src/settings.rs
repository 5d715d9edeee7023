//! Demo settings read from the environment.
//!
//! * `LAYOUTGEN_CATALOG` – path to a catalog JSON file. The bundled demo
//!   catalog is used when unset.
//! * `LAYOUTGEN_SEED` – layout seed (u32), default 0.
//! * `LAYOUTGEN_SAVE` – when set, the finished layout is saved there.

use std::fmt;
use std::path::PathBuf;

use layout::catalog::CatalogError;
use layout::validators::ValidatorRegistry;
use layout::ContentCatalog;

pub const CATALOG_VAR: &str = "LAYOUTGEN_CATALOG";
pub const SEED_VAR: &str = "LAYOUTGEN_SEED";
pub const SAVE_VAR: &str = "LAYOUTGEN_SAVE";

pub const DEMO_CATALOG_NAME: &str = "Demo";
pub const DEMO_CATALOG_JSON: &str = include_str!("../assets/demo_catalog.json");

#[derive(Debug)]
pub enum SettingsError {
    InvalidSeed(String),
    ReadCatalog {
        path: PathBuf,
        source: std::io::Error,
    },
    Catalog(CatalogError),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::InvalidSeed(raw) => {
                write!(f, "{SEED_VAR} must be an unsigned 32-bit integer, got '{raw}'")
            }
            SettingsError::ReadCatalog { path, source } => {
                write!(f, "could not read catalog {}: {source}", path.display())
            }
            SettingsError::Catalog(e) => write!(f, "invalid catalog: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::ReadCatalog { source, .. } => Some(source),
            SettingsError::Catalog(e) => Some(e),
            SettingsError::InvalidSeed(_) => None,
        }
    }
}

impl From<CatalogError> for SettingsError {
    fn from(e: CatalogError) -> Self {
        SettingsError::Catalog(e)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoSettings {
    pub catalog_path: Option<PathBuf>,
    pub seed: u32,
    pub save_path: Option<PathBuf>,
}

impl DemoSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Empty values count as unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let seed = match var(SEED_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| SettingsError::InvalidSeed(raw.clone()))?,
            None => 0,
        };
        Ok(Self {
            catalog_path: var(CATALOG_VAR).map(PathBuf::from),
            seed,
            save_path: var(SAVE_VAR).map(PathBuf::from),
        })
    }

    /// The catalog file named by the settings, or the bundled demo catalog.
    pub fn load_catalog(&self, registry: &ValidatorRegistry) -> Result<ContentCatalog, SettingsError> {
        match &self.catalog_path {
            Some(path) => {
                let json =
                    std::fs::read_to_string(path).map_err(|source| SettingsError::ReadCatalog {
                        path: path.clone(),
                        source,
                    })?;
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| DEMO_CATALOG_NAME.to_string());
                Ok(ContentCatalog::from_json(name, &json, registry)?)
            }
            None => Ok(ContentCatalog::from_json(
                DEMO_CATALOG_NAME,
                DEMO_CATALOG_JSON,
                registry,
            )?),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<DemoSettings, SettingsError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DemoSettings::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(settings(&[]).unwrap(), DemoSettings::default());
    }

    #[test]
    fn test_reads_all_vars() {
        let s = settings(&[
            (CATALOG_VAR, "catalogs/caves.json"),
            (SEED_VAR, " 42 "),
            (SAVE_VAR, "out/run.lyts"),
        ])
        .unwrap();
        assert_eq!(s.catalog_path, Some(PathBuf::from("catalogs/caves.json")));
        assert_eq!(s.seed, 42);
        assert_eq!(s.save_path, Some(PathBuf::from("out/run.lyts")));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let s = settings(&[(CATALOG_VAR, ""), (SEED_VAR, "  ")]).unwrap();
        assert_eq!(s, DemoSettings::default());
    }

    #[test]
    fn test_bad_seed() {
        let err = settings(&[(SEED_VAR, "-3")]).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidSeed(ref raw) if raw == "-3"));
        assert!(err.to_string().contains(SEED_VAR));
    }

    #[test]
    fn test_bundled_catalog_parses() {
        let catalog = DemoSettings::default()
            .load_catalog(&ValidatorRegistry::default())
            .unwrap();
        assert_eq!(catalog.name(), DEMO_CATALOG_NAME);
        assert_eq!(catalog.len(), 7);
    }

    #[test]
    fn test_missing_catalog_file() {
        let s = DemoSettings {
            catalog_path: Some(std::env::temp_dir().join("layoutgen_no_such_catalog.json")),
            ..Default::default()
        };
        let err = s.load_catalog(&ValidatorRegistry::default()).unwrap_err();
        assert!(matches!(err, SettingsError::ReadCatalog { .. }));
    }

    #[test]
    fn test_catalog_file_named_after_stem() {
        let path = std::env::temp_dir().join("layoutgen_caves.json");
        std::fs::write(&path, r#"[{"name": "Cave"}]"#).unwrap();
        let s = DemoSettings {
            catalog_path: Some(path.clone()),
            ..Default::default()
        };
        let catalog = s.load_catalog(&ValidatorRegistry::default()).unwrap();
        assert_eq!(catalog.name(), "layoutgen_caves");
        let _ = std::fs::remove_file(&path);
    }
}
