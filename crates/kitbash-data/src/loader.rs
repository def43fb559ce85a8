//! Format detection (RON/JSON/TOML), file discovery, deserialization and
//! name resolution helpers used by [`load_catalog`](crate::catalog::load_catalog).

use kitbash_core::grade::Grade;
use kitbash_core::tree::CraftError;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a catalog or materializing from it.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// A blueprint lists the same grade twice.
    #[error("blueprint '{blueprint}' defines grade {grade} more than once in {file}")]
    DuplicateGrade {
        file: PathBuf,
        blueprint: String,
        grade: Grade,
    },

    /// One grade lists two children under the same name: a resource twice,
    /// a blueprint at two grades, or a resource and a blueprint that share
    /// a name. Children are keyed by name, so one of them would be lost.
    #[error("blueprint '{blueprint}' ({grade}) lists '{name}' more than once in {file}")]
    DuplicateChild {
        file: PathBuf,
        blueprint: String,
        grade: Grade,
        name: String,
    },

    /// Sub-assembly references loop back to a blueprint grade already being
    /// built.
    #[error("blueprint '{blueprint}' ({grade}) requires itself in {file}")]
    CyclicReference {
        file: PathBuf,
        blueprint: String,
        grade: Grade,
    },

    #[error(transparent)]
    Craft(#[from] CraftError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, e: impl std::fmt::Display) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: e.to_string(),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let mut table: toml::Table =
                toml::from_str(&content).map_err(|e| parse_error(path, e))?;
            let array = table.remove(toml_key).ok_or_else(|| DataLoadError::Parse {
                file: path.to_path_buf(),
                detail: format!("missing key '{toml_key}' in TOML file"),
            })?;
            array.try_into().map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a name in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Check whether a name already exists in a map, returning a `DuplicateName`
/// error if so.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::schema::{ResourceData, SettingsData};
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    pub(crate) fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "kitbash_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    pub(crate) fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("resources.ron")).unwrap(), Format::Ron);
        assert_eq!(
            detect_format(Path::new("resources.toml")).unwrap(),
            Format::Toml
        );
        assert_eq!(
            detect_format(Path::new("resources.json")).unwrap(),
            Format::Json
        );
    }

    #[test]
    fn detect_format_unsupported() {
        for name in ["resources.yaml", "resources"] {
            assert!(matches!(
                detect_format(Path::new(name)),
                Err(DataLoadError::UnsupportedFormat { .. })
            ));
        }
    }

    // -----------------------------------------------------------------------
    // find_data_file / require_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn find_data_file_found_toml() {
        let dir = make_test_dir("find_toml");
        fs::write(dir.join("resources.toml"), "").unwrap();

        let result = find_data_file(&dir, "resources").unwrap();
        assert_eq!(result, Some(dir.join("resources.toml")));

        cleanup(&dir);
    }

    #[test]
    fn find_data_file_missing() {
        let dir = make_test_dir("find_missing");

        assert_eq!(find_data_file(&dir, "resources").unwrap(), None);

        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("resources.ron"), "[]").unwrap();
        fs::write(dir.join("resources.json"), "[]").unwrap();

        let result = find_data_file(&dir, "resources");
        assert!(matches!(
            result,
            Err(DataLoadError::ConflictingFormats { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing() {
        let dir = make_test_dir("require_missing");

        let result = require_data_file(&dir, "blueprints");
        assert!(matches!(
            result,
            Err(DataLoadError::MissingRequired { ref file, .. }) if file == "blueprints"
        ));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // deserialize_file / deserialize_list
    // -----------------------------------------------------------------------

    #[test]
    fn deserialize_file_toml_settings() {
        let dir = make_test_dir("deser_settings");
        let path = dir.join("settings.toml");
        fs::write(&path, "max_depth = 12\nstrict = true\n").unwrap();

        let settings: SettingsData = deserialize_file(&path).unwrap();
        assert_eq!(settings.max_depth, 12);
        assert!(settings.strict);

        cleanup(&dir);
    }

    #[test]
    fn deserialize_file_parse_error() {
        let dir = make_test_dir("deser_parse_err");
        let path = dir.join("bad.ron");
        fs::write(&path, "this is not valid RON {{{").unwrap();

        let result: Result<Vec<ResourceData>, _> = deserialize_file(&path);
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_ron() {
        let dir = make_test_dir("list_ron");
        let path = dir.join("resources.ron");
        fs::write(&path, r#"[(name: "Hard Metal"), (name: "Basic Scrap")]"#).unwrap();

        let resources: Vec<ResourceData> = deserialize_list(&path, "resources").unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[1].name, "Basic Scrap");

        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_json() {
        let dir = make_test_dir("list_json");
        let path = dir.join("resources.json");
        fs::write(&path, r#"[{"name": "Hard Metal"}, {"name": "Basic Scrap"}]"#).unwrap();

        let resources: Vec<ResourceData> = deserialize_list(&path, "resources").unwrap();
        assert_eq!(resources.len(), 2);

        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_toml() {
        let dir = make_test_dir("list_toml");
        let path = dir.join("resources.toml");
        fs::write(
            &path,
            r#"
[[resources]]
name = "Hard Metal"

[[resources]]
name = "Basic Scrap"
expiration = { units = 1, time_unit = "end_of_event" }
"#,
        )
        .unwrap();

        let resources: Vec<ResourceData> = deserialize_list(&path, "resources").unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].name, "Hard Metal");
        assert!(resources[1].expiration.expires());

        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_toml_missing_key() {
        let dir = make_test_dir("list_toml_missing");
        let path = dir.join("resources.toml");
        fs::write(&path, r#"foo = "bar""#).unwrap();

        let result: Result<Vec<ResourceData>, _> = deserialize_list(&path, "resources");
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // resolve_name / check_duplicate
    // -----------------------------------------------------------------------

    #[test]
    fn resolve_name_found_and_missing() {
        let mut map = HashMap::new();
        map.insert("Hard Metal".to_string(), 42u32);

        let val = resolve_name(&map, "Hard Metal", Path::new("blueprints.ron"), "resource");
        assert_eq!(*val.unwrap(), 42);

        let result = resolve_name(&map, "Soft Metal", Path::new("blueprints.ron"), "resource");
        assert!(matches!(
            result,
            Err(DataLoadError::UnresolvedRef { ref name, expected_kind: "resource", .. }) if name == "Soft Metal"
        ));
    }

    #[test]
    fn check_duplicate_detects_existing_name() {
        let mut map = HashMap::new();
        assert!(check_duplicate(&map, "Hard Metal", Path::new("resources.ron")).is_ok());

        map.insert("Hard Metal".to_string(), ());
        let result = check_duplicate(&map, "Hard Metal", Path::new("resources.ron"));
        assert!(matches!(
            result,
            Err(DataLoadError::DuplicateName { ref name, .. }) if name == "Hard Metal"
        ));
    }

    // -----------------------------------------------------------------------
    // Error display messages
    // -----------------------------------------------------------------------

    #[test]
    fn error_display_messages() {
        let e = DataLoadError::MissingRequired {
            file: "resources".to_string(),
            dir: PathBuf::from("/data"),
        };
        assert!(format!("{e}").contains("resources"));
        assert!(format!("{e}").contains("/data"));

        let e = DataLoadError::DuplicateGrade {
            file: PathBuf::from("blueprints.ron"),
            blueprint: "Mechanical Engine".to_string(),
            grade: Grade::Basic,
        };
        let msg = format!("{e}");
        assert!(msg.contains("Mechanical Engine"));
        assert!(msg.contains("Basic"));

        let e = DataLoadError::DuplicateChild {
            file: PathBuf::from("blueprints.ron"),
            blueprint: "Mechanical Engine".to_string(),
            grade: Grade::Master,
            name: "Hard Metal".to_string(),
        };
        let msg = format!("{e}");
        assert!(msg.contains("Mechanical Engine"));
        assert!(msg.contains("Master"));
        assert!(msg.contains("'Hard Metal'"));

        let e = DataLoadError::CyclicReference {
            file: PathBuf::from("blueprints.ron"),
            blueprint: "Loop".to_string(),
            grade: Grade::Master,
        };
        assert!(format!("{e}").contains("Loop"));

        let e: DataLoadError = CraftError::DepthExceeded { limit: 4 }.into();
        assert!(matches!(e, DataLoadError::Craft(_)));
        assert!(format!("{e}").contains('4'));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let data_err: DataLoadError = io_err.into();
        assert!(matches!(data_err, DataLoadError::Io(_)));
        assert!(format!("{data_err}").contains("file not found"));
    }
}
