//! Loads the catalog tables from a directory of JSON files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::info;

use super::{Archetype, Catalog, Pack, PackGroup, SolarCityYield, Tier};
use crate::error::CatalogError;

pub const ARCHETYPES_FILE: &str = "archetypes.json";
pub const TIERS_FILE: &str = "tiers.json";
pub const SOLAR_FILE: &str = "solar_generation.json";

type Records = Vec<(String, Map<String, Value>)>;

impl Catalog {
    /// Reads every catalog table from `dir`.
    ///
    /// Expects `archetypes.json`, `tiers.json`, `solar_generation.json` and one
    /// `packs-<GROUP>.json` per pack group, each a JSON object keyed by id.
    ///
    /// # Errors
    ///
    /// Fails on the first file that is missing, unreadable, not valid JSON, or
    /// not an object of objects.
    pub fn from_dir(dir: &Path) -> Result<Self, CatalogError> {
        let archetypes = read_records(&dir.join(ARCHETYPES_FILE))?
            .into_iter()
            .map(|(id, record)| Archetype::from_record(id, record));

        let mut packs = Vec::new();
        for group in PackGroup::ALL {
            let records = read_records(&dir.join(group.file_name()))?;
            packs.extend(
                records
                    .into_iter()
                    .map(|(key, record)| Pack::from_record(group, key, record)),
            );
        }

        let tiers = read_records(&dir.join(TIERS_FILE))?
            .into_iter()
            .map(|(id, record)| Tier::from_record(id, record));

        let solar = read_records(&dir.join(SOLAR_FILE))?
            .into_iter()
            .map(|(city, record)| SolarCityYield::from_record(city, record));

        let catalog = Catalog::new(archetypes, packs, tiers, solar);
        info!(
            dir = %dir.display(),
            archetypes = catalog.archetypes.len(),
            packs = catalog.packs.len(),
            tiers = catalog.tiers.len(),
            cities = catalog.solar.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}

fn read_records(path: &Path) -> Result<Records, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => CatalogError::Missing {
            path: path.to_path_buf(),
        },
        _ => CatalogError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    parse_records(&content, path)
}

fn parse_records(content: &str, path: &Path) -> Result<Records, CatalogError> {
    let root: Value = serde_json::from_str(content).map_err(|source| CatalogError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Object(entries) = root else {
        return Err(CatalogError::NotAnObject {
            path: path.to_path_buf(),
        });
    };

    entries
        .into_iter()
        .map(|(id, value)| match value {
            Value::Object(record) => Ok((id, record)),
            _ => Err(CatalogError::BadRecord {
                path: PathBuf::from(path),
                id,
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use tempfile::{TempDir, tempdir};

    use super::*;

    /// Copies the shipped datasets into a fresh scratch directory.
    fn scratch_copy() -> TempDir {
        let dir = tempdir().expect("create scratch dir");
        for entry in fs::read_dir("datasets").expect("datasets dir") {
            let entry = entry.expect("dir entry");
            fs::copy(entry.path(), dir.path().join(entry.file_name())).expect("copy dataset");
        }
        dir
    }

    #[test]
    fn loads_shipped_datasets() {
        let catalog = Catalog::from_dir(Path::new("datasets")).expect("datasets should load");
        assert!(catalog.archetype("apartment_small").is_some());
        assert!(catalog.pack(PackGroup::Ac1p, "lighting_basic").is_some());
        assert!(catalog.tier("tier_2_comfort").is_some());
        assert!(catalog.solar_city("Istanbul").is_some());
        for group in PackGroup::ALL {
            assert!(!catalog.packs().table(group).is_empty(), "{group} table empty");
        }
    }

    #[test]
    fn tiers_are_ordered_by_id() {
        let catalog = Catalog::from_dir(Path::new("datasets")).expect("datasets should load");
        let ids: Vec<&str> = catalog.tiers().iter().map(|t| t.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn missing_file_fails_fast() {
        let dir = scratch_copy();
        fs::remove_file(dir.path().join("packs-DC24V.json")).expect("remove file");
        let err = Catalog::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Missing { ref path } if path.ends_with("packs-DC24V.json")));
    }

    #[test]
    fn malformed_json_fails_fast() {
        let dir = scratch_copy();
        fs::write(dir.path().join(TIERS_FILE), "{ not json").expect("write file");
        let err = Catalog::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }));
    }

    #[test]
    fn root_must_be_object() {
        let err = parse_records("[1, 2]", Path::new("x.json")).unwrap_err();
        assert!(matches!(err, CatalogError::NotAnObject { .. }));
    }

    #[test]
    fn records_must_be_objects() {
        let err = parse_records(r#"{"ok": {}, "bad": 3}"#, Path::new("x.json")).unwrap_err();
        assert!(matches!(err, CatalogError::BadRecord { ref id, .. } if id == "bad"));
    }
}
