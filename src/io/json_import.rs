//! Location configuration and mutual-exclusion pair import, both plain JSON.

use std::path::Path;

use serde::Deserialize;

use crate::domain::Location;
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct LocationsConfig {
    locations: Vec<Location>,
}

/// Loads the ordered location list from a `locations.json`-shaped file. The
/// returned order is authoritative for `Pref_Loc_<n>` column indexing.
pub fn import_locations_json(path: &Path) -> Result<Vec<Location>> {
    let text = std::fs::read_to_string(path)?;
    let config: LocationsConfig = serde_json::from_str(&text)?;
    Ok(config.locations)
}

/// Loads mutual-exclusion name pairs. Malformed entries (missing or
/// single-element pairs) are dropped rather than rejected, matching the
/// tolerant behavior of the file this import replaces; unknown names are
/// resolved (and dropped) later, once the person list is known.
pub fn import_exclusions_json(path: &Path) -> Result<Vec<(String, String)>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)?;
    let raw: Vec<Vec<String>> = serde_json::from_str(&text)?;
    Ok(raw
        .into_iter()
        .filter(|pair| pair.len() >= 2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_locations_config() {
        let json = r#"{"locations": [{"name": "Utrecht", "allow_peer": true}, {"name": "Solo", "allow_peer": false}]}"#;
        let tmp = write_temp(json);
        let locations = import_locations_json(tmp.path()).unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].name, "Utrecht");
        assert!(!locations[1].allow_peer);
    }

    #[test]
    fn drops_malformed_exclusion_pairs() {
        let json = r#"[["Amy", "Beth"], ["Carl"], []]"#;
        let tmp = write_temp(json);
        let pairs = import_exclusions_json(tmp.path()).unwrap();
        assert_eq!(pairs, vec![("Amy".to_string(), "Beth".to_string())]);
    }

    #[test]
    fn missing_exclusions_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster_exclusions_missing_test.json");
        let pairs = import_exclusions_json(&path).unwrap();
        assert!(pairs.is_empty());
    }
}
