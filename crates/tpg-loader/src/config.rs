//! Group configuration and table/connection registry
//!
//! Two structured config files drive a run: the groups file lists the file
//! groups to process (directory, filename pattern, delimiter, target table,
//! column-spec string), and the tables file is the registry of connection
//! settings keyed by table name. Both are read through the `config` crate,
//! so any format it supports works; TOML is the convention:
//!
//! ```toml
//! # groups.toml
//! [[group]]
//! path = "/data/incoming/sales"
//! search_pattern = "*.csv"
//! delimiter = ","
//! table = "sales"
//! columns = "id:int:yes,name:char:no,update:char:no"
//! ```
//!
//! ```toml
//! # tables.toml
//! [tables.sales]
//! server = "db.internal"
//! user_id = "loader"
//! password = "secret"
//! database = "warehouse"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use serde::Deserialize;
use tpg_common::{LoadError, Result};

// ============================================================================
// Loader Configuration Constants
// ============================================================================

/// Subdirectory of each group's source directory that receives archived files.
pub const BACKUP_DIR_NAME: &str = "backup files";

/// Default PostgreSQL port when the registry entry does not specify one.
pub const DEFAULT_PORT: u16 = 5432;

/// Default legacy text encoding for source files.
pub const DEFAULT_ENCODING: &str = "shift_jis";

/// Delimiter literal that maps to a tab character.
const TAB_DELIMITER: &str = "tab";

/// One configured file group; immutable for the run
#[derive(Debug, Clone, Deserialize)]
pub struct FileGroup {
    /// Source directory to scan
    pub path: PathBuf,

    /// Glob-style filename pattern (e.g. `*.csv`)
    pub search_pattern: String,

    /// Delimiter: the literal `tab` means a tab character, any other
    /// value contributes its first character
    pub delimiter: String,

    /// Target table name; key into the table registry
    pub table: String,

    /// Compact column-spec string, parsed per group at group start
    pub columns: String,

    /// Text encoding label of the source files
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

impl FileGroup {
    /// Resolve the configured delimiter to a single character
    pub fn delimiter_char(&self) -> Result<char> {
        if self.delimiter == TAB_DELIMITER {
            return Ok('\t');
        }

        self.delimiter.chars().next().ok_or_else(|| {
            LoadError::config(format!(
                "Empty delimiter for group '{}'",
                self.path.display()
            ))
        })
    }

    /// Resolve the configured encoding label
    pub fn source_encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.encoding.as_bytes()).ok_or_else(|| {
            LoadError::config(format!("Unknown encoding label '{}'", self.encoding))
        })
    }

    /// The group's archive directory
    pub fn backup_dir(&self) -> PathBuf {
        self.path.join(BACKUP_DIR_NAME)
    }
}

#[derive(Debug, Deserialize)]
struct GroupsFile {
    group: Vec<FileGroup>,
}

/// Load the configured file groups, in configuration order
pub fn load_groups(path: &Path) -> Result<Vec<FileGroup>> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .build()?;

    let file: GroupsFile = settings.try_deserialize()?;
    Ok(file.group)
}

/// Connection settings for one target table
#[derive(Debug, Clone, Deserialize)]
pub struct TableConnection {
    pub server: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub user_id: String,
    pub password: String,
    pub database: String,

    /// Connect timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Per-statement timeout in seconds
    #[serde(default)]
    pub command_timeout: Option<u64>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Debug, Deserialize)]
struct TablesFile {
    tables: HashMap<String, TableConnection>,
}

/// Registry of connection settings keyed by table name
#[derive(Debug)]
pub struct TableRegistry {
    tables: HashMap<String, TableConnection>,
}

impl TableRegistry {
    /// Create a registry from already-resolved entries
    pub fn new(tables: HashMap<String, TableConnection>) -> Self {
        Self { tables }
    }

    /// Load the registry from a structured config file
    pub fn load(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;

        let file: TablesFile = settings.try_deserialize()?;
        Ok(Self::new(file.tables))
    }

    /// Look up a table's connection settings
    pub fn lookup(&self, table: &str) -> Result<&TableConnection> {
        self.tables
            .get(table)
            .ok_or_else(|| LoadError::metadata_lookup(table))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_groups() {
        let file = write_config(
            r#"
            [[group]]
            path = "/data/incoming/sales"
            search_pattern = "*.csv"
            delimiter = ","
            table = "sales"
            columns = "id:int:yes,name:char:no"

            [[group]]
            path = "/data/incoming/audit"
            search_pattern = "audit_*.txt"
            delimiter = "tab"
            table = "audit"
            columns = "event:char:no"
            encoding = "utf-8"
            "#,
        );

        let groups = load_groups(file.path()).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].table, "sales");
        assert_eq!(groups[0].delimiter_char().unwrap(), ',');
        assert_eq!(groups[0].encoding, DEFAULT_ENCODING);
        assert_eq!(
            groups[0].backup_dir(),
            PathBuf::from("/data/incoming/sales").join(BACKUP_DIR_NAME)
        );

        assert_eq!(groups[1].delimiter_char().unwrap(), '\t');
        assert_eq!(groups[1].source_encoding().unwrap().name(), "UTF-8");
    }

    #[test]
    fn test_delimiter_uses_first_character() {
        let file = write_config(
            r#"
            [[group]]
            path = "/data"
            search_pattern = "*"
            delimiter = ";extra"
            table = "t"
            columns = "a:int:no"
            "#,
        );

        let groups = load_groups(file.path()).unwrap();
        assert_eq!(groups[0].delimiter_char().unwrap(), ';');
    }

    #[test]
    fn test_default_encoding_is_shift_jis() {
        let group = FileGroup {
            path: PathBuf::from("/data"),
            search_pattern: "*".to_string(),
            delimiter: ",".to_string(),
            table: "t".to_string(),
            columns: "a:int:no".to_string(),
            encoding: default_encoding(),
        };

        assert_eq!(group.source_encoding().unwrap().name(), "Shift_JIS");
    }

    #[test]
    fn test_table_registry_defaults_and_lookup() {
        let file = write_config(
            r#"
            [tables.sales]
            server = "db.internal"
            user_id = "loader"
            password = "secret"
            database = "warehouse"

            [tables.audit]
            server = "db.internal"
            port = 5433
            user_id = "loader"
            password = "secret"
            database = "audit"
            timeout = 5
            command_timeout = 30
            "#,
        );

        let registry = TableRegistry::load(file.path()).unwrap();

        let sales = registry.lookup("sales").unwrap();
        assert_eq!(sales.port, DEFAULT_PORT);
        assert_eq!(sales.timeout, None);

        let audit = registry.lookup("audit").unwrap();
        assert_eq!(audit.port, 5433);
        assert_eq!(audit.timeout, Some(5));
        assert_eq!(audit.command_timeout, Some(30));

        let err = registry.lookup("missing").unwrap_err();
        assert!(matches!(err, LoadError::MetadataLookup(ref t) if t == "missing"));
    }
}
