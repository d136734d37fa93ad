//! Override-file IO.
//!
//! The override map persists as a flat JSON object. An absent file means
//! "no overrides" and is not an error; anything else that goes wrong while
//! reading, parsing, or writing is.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use mibsim_core::overrides::Overrides;

/// Override-file error.
#[derive(Debug, thiserror::Error)]
pub enum OverrideFileError {
    /// Filesystem failure.
    #[error("override file IO: {0}")]
    Io(#[from] io::Error),
    /// The file exists but is not a flat JSON object of scalars.
    #[error("override file malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Load overrides from `path`. A missing file yields the empty map.
pub fn load(path: &Path) -> Result<Overrides, OverrideFileError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no override file, starting empty");
            return Ok(Overrides::new());
        }
        Err(err) => return Err(err.into()),
    };
    Ok(serde_json::from_str(&text)?)
}

/// Write overrides to `path` as pretty-printed JSON.
pub fn save(path: &Path, overrides: &Overrides) -> Result<(), OverrideFileError> {
    let text = serde_json::to_string_pretty(overrides)?;
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mibsim_core::overrides::OverrideValue;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");

        let mut overrides = Overrides::new();
        overrides.insert("IF-MIB::ifDescr.1", OverrideValue::Text("uplink".into()));
        overrides.insert("SNMPv2-MIB::sysUpTime.0", OverrideValue::Integer(12345));

        save(&path, &overrides).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, overrides);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(load(&path), Err(OverrideFileError::Malformed(_))));
    }
}
