//! Output module for writing migration artifacts
//!
//! This module handles:
//! - Writing content documents with frontmatter
//! - Writing navigation data and JSON reports
//! - Downloading image assets
//! - Recording run statistics
//!
//! Every file is written atomically: content goes to a temporary sibling
//! which is renamed over the destination, so an interrupted run never leaves
//! a truncated artifact behind.

pub mod assets;
pub mod documents;
pub mod reports;
pub mod stats;

pub use assets::{asset_path, download_images, download_logo, AssetOutcome};
pub use documents::{document_path, infer_layout, render_document, write_documents};
pub use reports::{write_reports, AnalyticsReport, FormsReport, MigrationReport, UrlAudit};
pub use stats::{print_summary, RunSummary};

use crate::crawler::temp_sibling;
use crate::extract::NavigationTree;
use crate::{MigrateError, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

/// File name of the navigation artifact inside the data directory
pub const NAVIGATION_FILE: &str = "navigation.json";

/// Writes `contents` to `path` atomically, creating parent directories
pub fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let write_err = |source: std::io::Error| MigrateError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp = temp_sibling(path);
    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(contents)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(write_err(e));
    }
    Ok(())
}

/// Serializes `value` as pretty-printed JSON and writes it atomically
pub fn write_json<T: Serialize>(path: &Path, what: &'static str, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|source| MigrateError::Serialize { what, source })?;
    json.push('\n');
    write_file(path, json.as_bytes())
}

/// Writes `navigation.json` into `data_dir`
pub fn write_navigation(data_dir: &Path, navigation: &NavigationTree) -> Result<()> {
    let path = data_dir.join(NAVIGATION_FILE);
    write_json(&path, "navigation", navigation)?;
    tracing::info!("Saved navigation to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Footer, Header, MenuItem};
    use tempfile::TempDir;

    #[test]
    fn test_write_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c.txt");

        write_file(&path, b"hello").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");

        // No temporary file is left behind
        let entries: Vec<_> = fs::read_dir(path.parent().unwrap()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_file_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        write_file(&path, b"old contents").unwrap();
        write_file(&path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_file_into_file_path_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = write_file(&blocker.join("child.txt"), b"y").unwrap_err();
        assert!(matches!(err, MigrateError::Write { .. }));
    }

    #[test]
    fn test_write_navigation() {
        let dir = TempDir::new().unwrap();
        let nav = NavigationTree {
            header: Header {
                logo: "/images/logo.png".to_string(),
                menu: vec![MenuItem {
                    label: "Home".to_string(),
                    href: Some("/".to_string()),
                    items: None,
                }],
            },
            footer: Footer {
                copyright: "© 2024 Example".to_string(),
                sections: vec![],
            },
        };

        write_navigation(dir.path(), &nav).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(NAVIGATION_FILE)).unwrap())
                .unwrap();
        assert_eq!(json["header"]["logo"], "/images/logo.png");
        assert_eq!(json["header"]["menu"][0]["label"], "Home");
        assert!(json["header"]["menu"][0].get("items").is_none());
        assert_eq!(json["footer"]["copyright"], "© 2024 Example");
    }
}
