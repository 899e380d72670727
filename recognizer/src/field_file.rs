//! YAML persistence for field definitions.
//!
//! A field file holds a single [`FieldSchema`]:
//!
//! ```yaml
//! name: bread
//! terms: [bread]
//! optional: true
//! kind:
//!   type: enumeration
//!   values:
//!     - value: Wheat
//!       terms: [wheat, whole wheat]
//!     - value: Rye
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use field_recognizer_core::FieldSchema;
use tracing::debug;

use crate::error::Result;

/// Loads a field definition from a YAML file.
///
/// The definition is not validated; [`build_recognizer`](crate::build_recognizer)
/// does that.
pub fn load_field(path: impl AsRef<Path>) -> Result<FieldSchema> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let field: FieldSchema = serde_yaml::from_reader(reader)?;
    debug!(path = %path.display(), field = %field.name, kind = field.kind.label(), "Loaded field definition");
    Ok(field)
}

/// Saves a field definition to a YAML file.
pub fn save_field(field: &FieldSchema, path: impl AsRef<Path>) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);
    serde_yaml::to_writer(writer, field)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use field_recognizer_core::{EnumValue, FieldKind};
    use tempfile::tempdir;

    use super::*;
    use crate::RecognizerError;

    #[test]
    fn test_save_and_load_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bread.yaml");
        let field = FieldSchema::new(
            "bread",
            FieldKind::enumeration(vec![
                EnumValue::new("Wheat").with_terms(["wheat", "whole wheat"]),
                EnumValue::new("Rye"),
            ]),
        )
        .optional();

        save_field(&field, &path).unwrap();
        assert_eq!(load_field(&path).unwrap(), field);
    }

    #[test]
    fn test_load_applies_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("n.yaml");
        std::fs::write(&path, "name: guests\nkind:\n  type: integer\n  max: 8\n").unwrap();

        let field = load_field(&path).unwrap();
        assert!(!field.optional);
        assert!(field.nullable);
        assert_eq!(field.kind, FieldKind::integer(None, Some(8)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_field("/nonexistent/field.yaml").unwrap_err();
        assert!(matches!(err, RecognizerError::IoError(_)));
    }

    #[test]
    fn test_load_malformed_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "name: x\nkind:\n  type: spaceship\n").unwrap();
        assert!(matches!(
            load_field(&path).unwrap_err(),
            RecognizerError::YamlError(_)
        ));
    }
}
