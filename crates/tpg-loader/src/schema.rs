//! Column-spec string parser
//!
//! Parses the compact schema string supplied by the group configuration
//! into an ordered [`TableSchema`]. The format is comma-separated column
//! definitions of the form `name:type:uniqueFlag`, where the literal
//! `yes` marks a unique-key column:
//!
//! ```text
//! id:int:yes,name:char:no,update:char:no
//! ```
//!
//! Duplicate column names are not rejected; they pass through into the
//! generated SQL and fail at execution.

use tpg_common::{LoadError, Result};

use crate::models::{ColumnSpec, TableSchema};

/// Literal flag value that marks a unique-key column
const UNIQUE_KEY_FLAG: &str = "yes";

/// Parse a comma-separated column-spec string into a table schema
///
/// Fails with [`LoadError::MalformedSchema`] if any definition does not
/// have exactly three colon-separated parts.
pub fn parse_column_specs(spec: &str) -> Result<TableSchema> {
    let mut columns = Vec::new();

    for definition in spec.split(',') {
        let parts: Vec<&str> = definition.split(':').collect();

        if parts.len() != 3 {
            return Err(LoadError::malformed_schema(definition));
        }

        columns.push(ColumnSpec {
            name: parts[0].to_string(),
            type_tag: parts[1].to_string(),
            is_unique_key: parts[2] == UNIQUE_KEY_FLAG,
        });
    }

    Ok(TableSchema::new(columns))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keyed_schema() {
        let schema = parse_column_specs("id:int:yes,name:char:no").unwrap();

        assert_eq!(schema.len(), 2);
        assert!(schema.has_unique_key);

        assert_eq!(schema.columns[0].name, "id");
        assert_eq!(schema.columns[0].type_tag, "int");
        assert!(schema.columns[0].is_unique_key);

        assert_eq!(schema.columns[1].name, "name");
        assert_eq!(schema.columns[1].type_tag, "char");
        assert!(!schema.columns[1].is_unique_key);
    }

    #[test]
    fn test_parse_insert_only_schema() {
        let schema = parse_column_specs("event:char:no,payload:char:no").unwrap();

        assert!(!schema.has_unique_key);
        assert_eq!(schema.unique_columns().count(), 0);
    }

    #[test]
    fn test_parse_preserves_declaration_order() {
        let schema = parse_column_specs("c:int:no,a:int:no,b:int:no").unwrap();
        let names: Vec<&str> = schema.columns.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_parse_rejects_missing_parts() {
        let err = parse_column_specs("id:int:yes,name:char").unwrap_err();

        assert!(matches!(err, LoadError::MalformedSchema(ref def) if def == "name:char"));
    }

    #[test]
    fn test_parse_rejects_extra_parts() {
        assert!(parse_column_specs("id:int:yes:extra").is_err());
    }

    #[test]
    fn test_parse_allows_duplicate_names() {
        // Legacy behavior: duplicates pass through and fail at execution.
        let schema = parse_column_specs("id:int:yes,id:int:no").unwrap();

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.columns[0].name, schema.columns[1].name);
    }

    #[test]
    fn test_only_yes_marks_unique() {
        let schema = parse_column_specs("a:int:YES,b:int:true,c:int:yes").unwrap();

        assert!(!schema.columns[0].is_unique_key);
        assert!(!schema.columns[1].is_unique_key);
        assert!(schema.columns[2].is_unique_key);
    }
}
