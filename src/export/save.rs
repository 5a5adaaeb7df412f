//! Writing exports to disk.
//!
//! Uses atomic writes (temp file + rename) so a failed write never leaves a
//! half-serialized export behind. Write failures surface as
//! [`ScanError::OutputWriteFailed`] rather than passing silently.

use crate::contact::ContactRecord;
use crate::error::ScanError;
use crate::export::{csv, vcard};
use std::path::{Path, PathBuf};
use tracing::info;

/// Write `content` to `path` atomically: write to `<path>.tmp`, then rename
/// into place. Parent directories are created as needed.
pub async fn save_export(content: &str, path: &Path) -> Result<(), ScanError> {
    let write_failed = |source: std::io::Error| ScanError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
        }
    }

    let tmp_path = tmp_sibling(path);
    tokio::fs::write(&tmp_path, content)
        .await
        .map_err(write_failed)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_failed)?;

    info!("Saved export: {}", path.display());
    Ok(())
}

/// Save the tabular export as `contacts_<today>.csv` under `dir`.
///
/// Returns the path written.
pub async fn save_csv(contacts: &[ContactRecord], dir: &Path) -> Result<PathBuf, ScanError> {
    let path = dir.join(csv::csv_filename(today()));
    save_export(&csv::to_csv(contacts), &path).await?;
    Ok(path)
}

/// Save the contact-card export as `contacts_<today>.vcf` under `dir`.
pub async fn save_vcard(contacts: &[ContactRecord], dir: &Path) -> Result<PathBuf, ScanError> {
    let path = dir.join(vcard::vcard_filename(today()));
    save_export(&vcard::to_vcard(contacts), &path).await?;
    Ok(path)
}

/// Save one record as `<Name_With_Underscores>.vcf` under `dir`.
pub async fn save_single_vcard(
    contact: &ContactRecord,
    dir: &Path,
) -> Result<PathBuf, ScanError> {
    let path = dir.join(vcard::single_vcard_filename(contact));
    save_export(&vcard::to_vcard(std::slice::from_ref(contact)), &path).await?;
    Ok(path)
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Sibling temp path: `contacts_2026-08-07.csv` → `contacts_2026-08-07.csv.tmp`.
fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(name: &str) -> ContactRecord {
        ContactRecord {
            full_name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn save_csv_writes_dated_file() {
        let dir = TempDir::new().unwrap();
        let path = save_csv(&[record("Jane Doe")], dir.path()).await.unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("contacts_"), "got: {name}");
        assert!(name.ends_with(".csv"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.starts_with("Name,Title,"));
    }

    #[tokio::test]
    async fn save_leaves_no_tmp_file_behind() {
        let dir = TempDir::new().unwrap();
        save_vcard(&[record("Jane Doe")], dir.path()).await.unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty(), "tmp files left behind: {leftovers:?}");
    }

    #[tokio::test]
    async fn save_single_uses_underscored_name() {
        let dir = TempDir::new().unwrap();
        let path = save_single_vcard(&record("Jane Mary Doe"), dir.path())
            .await
            .unwrap();
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "Jane_Mary_Doe.vcf"
        );
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("BEGIN:VCARD").count(), 1);
    }

    #[tokio::test]
    async fn save_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("exports/2026");
        let path = save_csv(&[record("Jane Doe")], &nested).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn unwritable_target_surfaces_output_write_failed() {
        // A directory cannot be overwritten by a file rename target's tmp write.
        let dir = TempDir::new().unwrap();
        let blocked = dir.path().join("contacts.csv");
        std::fs::create_dir(&blocked).unwrap();

        let err = save_export("data", &blocked).await.unwrap_err();
        assert!(matches!(err, ScanError::OutputWriteFailed { .. }), "got: {err:?}");
    }
}
