//! Collision-free file naming
//!
//! Picks the name a file is written under so that an existing file is
//! never overwritten.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};

/// Splits `name` into stem and extension, the extension keeping its dot.
///
/// Only the final path element is searched for the dot, so `a.d/file`
/// has no extension and `.profile` is all extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    let element_start = name.rfind('/').map(|i| i + 1).unwrap_or(0);
    match name[element_start..].rfind('.') {
        Some(dot) => name.split_at(element_start + dot),
        None => (name, ""),
    }
}

/// Returns `requested` if nothing exists under that name in `dir`, otherwise
/// the first free `<stem>-<n><ext>` counting from 1.
///
/// Nothing is created, so two calls without an intervening write agree.
/// Any existence check that fails for a reason other than "not found"
/// (a name too long for the filesystem, an unsearchable directory) is
/// returned as the error.
pub async fn unique_file_name(dir: &Path, requested: &str) -> std::io::Result<String> {
    if is_free(dir, requested).await? {
        return Ok(requested.to_string());
    }

    let (stem, ext) = split_extension(requested);
    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{}-{}{}", stem, counter, ext);
        if is_free(dir, &candidate).await? {
            return Ok(candidate);
        }
        counter += 1;
    }
}

/// Creates a new, empty file under the name `unique_file_name` picks.
///
/// The create itself refuses existing files, so a name taken between the
/// search and the create moves on to the next candidate instead of
/// overwriting it.
pub async fn create_unique_file(dir: &Path, requested: &str) -> std::io::Result<(File, PathBuf)> {
    loop {
        let path = dir.join(unique_file_name(dir, requested).await?);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
}

async fn is_free(dir: &Path, name: &str) -> std::io::Result<bool> {
    tokio::fs::try_exists(dir.join(name)).await.map(|exists| !exists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("report.csv"), ("report", ".csv"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension(".profile"), ("", ".profile"));
        assert_eq!(split_extension("dir.d/file"), ("dir.d/file", ""));
    }

    #[tokio::test]
    async fn test_free_name_is_kept() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            unique_file_name(dir.path(), "photo.png").await.unwrap(),
            "photo.png"
        );
    }

    #[tokio::test]
    async fn test_counter_suffix() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("photo.png")).unwrap();
        assert_eq!(
            unique_file_name(dir.path(), "photo.png").await.unwrap(),
            "photo-1.png"
        );

        File::create(dir.path().join("photo-1.png")).unwrap();
        File::create(dir.path().join("photo-2.png")).unwrap();
        assert_eq!(
            unique_file_name(dir.path(), "photo.png").await.unwrap(),
            "photo-3.png"
        );
    }

    #[tokio::test]
    async fn test_no_extension() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("notes")).unwrap();
        assert_eq!(unique_file_name(dir.path(), "notes").await.unwrap(), "notes-1");
    }

    #[tokio::test]
    async fn test_repeated_calls_agree() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("data.bin")).unwrap();

        let first = unique_file_name(dir.path(), "data.bin").await.unwrap();
        let second = unique_file_name(dir.path(), "data.bin").await.unwrap();
        assert_eq!(first, "data-1.bin");
        assert_eq!(first, second);
        assert!(!dir.path().join(&first).exists());
    }

    #[tokio::test]
    async fn test_overlong_name_is_an_error() {
        let dir = TempDir::new().unwrap();
        let name = format!("{}.txt", "a".repeat(300));

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            unique_file_name(dir.path(), &name),
        )
        .await
        .unwrap();
        assert!(result.is_err());

        let created = create_unique_file(dir.path(), &name).await;
        assert!(created.is_err());
    }

    #[tokio::test]
    async fn test_create_unique_file_never_reuses_a_name() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("same.bin"), b"first").unwrap();

        let (_, second) = create_unique_file(dir.path(), "same.bin").await.unwrap();
        let (_, third) = create_unique_file(dir.path(), "same.bin").await.unwrap();

        assert_eq!(second, dir.path().join("same-1.bin"));
        assert_eq!(third, dir.path().join("same-2.bin"));
        assert_eq!(std::fs::read(dir.path().join("same.bin")).unwrap(), b"first");
    }
}
