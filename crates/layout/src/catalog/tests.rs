use super::*;
use crate::sides::{CellSides, Side};
use crate::validators::ValidatorRegistry;

const DUNGEON: &str = r#"[
    {
        "name": "Hall",
        "has_connections": { "px": true, "nx": true },
        "assets": ["dungeon/hall_a", "dungeon/hall_b"]
    },
    {
        "name": "Vault",
        "has_connections": { "ny": true },
        "disable_neighbour_sides": { "px": true, "nx": true },
        "assets": ["dungeon/vault"],
        "validators": [
            { "kind": "edge_margin", "margin": 1 },
            { "kind": "max_instances", "max": 1 }
        ]
    },
    { "name": "Rubble" }
]"#;

fn load(json: &str) -> Result<ContentCatalog, CatalogError> {
    ContentCatalog::from_json("Dungeon", json, &ValidatorRegistry::default())
}

#[test]
fn test_from_json_reads_rows_in_order() {
    let catalog = load(DUNGEON).unwrap();
    assert_eq!(catalog.name(), "Dungeon");
    assert_eq!(catalog.len(), 3);
    let names: Vec<&str> = catalog.rows().map(|(id, _)| id.as_str()).collect();
    assert_eq!(names, ["Hall", "Vault", "Rubble"]);
}

#[test]
fn test_from_json_patterns_and_assets() {
    let catalog = load(DUNGEON).unwrap();

    let hall = catalog.lookup(&ContentId::from("Hall")).unwrap();
    assert_eq!(hall.has_connections, CellSides::new(true, false, true, false));
    assert!(hall.disable_neighbour_sides.is_empty());
    assert_eq!(hall.assets.len(), 2);
    assert_eq!(hall.assets[1].as_str(), "dungeon/hall_b");

    let vault = catalog.lookup(&ContentId::from("Vault")).unwrap();
    assert!(vault.has_connections.get(Side::NegY));
    assert_eq!(vault.disable_neighbour_sides.count(), 2);
    let kinds: Vec<&str> = vault.validators.iter().map(|v| v.kind()).collect();
    assert_eq!(kinds, ["edge_margin", "max_instances"]);
}

#[test]
fn test_row_with_only_a_name_is_closed() {
    let catalog = load(DUNGEON).unwrap();
    let rubble = catalog.lookup(&ContentId::from("Rubble")).unwrap();
    assert!(rubble.has_connections.is_empty());
    assert!(rubble.assets.is_empty());
    assert!(rubble.validators.is_empty());
}

#[test]
fn test_lookup_missing_row() {
    let catalog = load(DUNGEON).unwrap();
    assert!(catalog.lookup(&ContentId::from("Throne")).is_none());
    assert!(!catalog.contains(&ContentId::from("Throne")));
}

#[test]
fn test_duplicate_row_rejected() {
    let err = load(r#"[{"name": "Hall"}, {"name": "Hall"}]"#).unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateRow(ref id) if id.as_str() == "Hall"));
}

#[test]
fn test_unknown_validator_kind() {
    let err = load(r#"[{"name": "Hall", "validators": [{"kind": "moon_phase"}]}]"#).unwrap_err();
    match err {
        CatalogError::UnknownValidator { row, kind } => {
            assert_eq!(row.as_str(), "Hall");
            assert_eq!(kind, "moon_phase");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_validator_without_kind() {
    let err = load(r#"[{"name": "Hall", "validators": [{"margin": 1}]}]"#).unwrap_err();
    assert!(matches!(err, CatalogError::MissingValidatorKind { .. }));
}

#[test]
fn test_invalid_validator_params() {
    let err = load(r#"[{"name": "Hall", "validators": [{"kind": "edge_margin"}]}]"#).unwrap_err();
    assert!(matches!(err, CatalogError::InvalidValidator { ref kind, .. } if kind == "edge_margin"));
    assert!(err.to_string().contains("Hall"));
}

#[test]
fn test_parse_error_has_source() {
    use std::error::Error;
    let err = load("{ not json").unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)));
    assert!(err.source().is_some());
}

#[test]
fn test_insert_replaces_in_place() {
    let mut catalog = ContentCatalog::new("Manual")
        .with_row("A", ContentDefinition::new(CellSides::NONE))
        .with_row("B", ContentDefinition::new(CellSides::NONE));
    catalog.insert("A", ContentDefinition::new(CellSides::ALL));

    assert_eq!(catalog.len(), 2);
    let (first, def) = catalog.rows().next().unwrap();
    assert_eq!(first.as_str(), "A");
    assert_eq!(def.has_connections, CellSides::ALL);
}

#[test]
fn test_blank_asset_path() {
    assert!(AssetPath::from("").is_blank());
    assert!(AssetPath::from("   ").is_blank());
    assert!(!AssetPath::from("cells/a").is_blank());
}
