//! Distribution archive writer.
//!
//! The archive is assembled in a temporary file beside the output path and
//! renamed over it only after the zip is finished. A failure at any point
//! drops the temporary file and leaves the previous archive in place.

use serde::Serialize;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;
use wpp_core::{Error, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Archive written by [`write_archive`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveReport {
    /// Final archive path
    pub path: PathBuf,
    /// Archive size in bytes
    pub bytes: u64,
    /// Number of zip entries, directories included
    pub entries: usize,
    /// Whether an archive already existed at `path`
    pub replaced: bool,
}

/// Zips `source_dir` into `output` under a single top-level `folder`.
///
/// Entry names use `/` separators. Directories get their own entries so empty
/// directories survive extraction. Symbolic links are skipped.
/// `compression_level` 0 stores entries uncompressed; 1 through 9 deflate.
///
/// # Errors
///
/// Returns [`Error::Filesystem`] if `source_dir` cannot be walked or a file
/// cannot be read, and [`Error::Archive`] if the zip cannot be written or
/// moved into place.
///
/// # Examples
///
/// ```
/// use wpp_pipeline::write_archive;
///
/// let dir = tempfile::tempdir().unwrap();
/// let plugin = dir.path().join("names-fusion");
/// std::fs::create_dir_all(plugin.join("css")).unwrap();
/// std::fs::write(plugin.join("index.php"), "<?php // Silence is golden.").unwrap();
///
/// let output = dir.path().join("names-fusion-plugin.zip");
/// let report = write_archive(&plugin, "names-fusion", &output, 9).unwrap();
///
/// // names-fusion/, names-fusion/css/, names-fusion/index.php
/// assert_eq!(report.entries, 3);
/// assert!(output.exists());
/// ```
pub fn write_archive(
    source_dir: &Path,
    folder: &str,
    output: &Path,
    compression_level: u8,
) -> Result<ArchiveReport> {
    if !source_dir.is_dir() {
        return Err(Error::filesystem(
            "read directory",
            source_dir,
            io::Error::new(io::ErrorKind::NotFound, "plugin directory does not exist"),
        ));
    }

    let replaced = output.exists();
    let parent = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = tempfile::Builder::new()
        .prefix(".wp-packager-")
        .suffix(".zip.tmp")
        .tempfile_in(parent)
        .map_err(|e| Error::archive(output, "failed to create temporary archive", e))?;
    tracing::debug!("Writing archive to {}", temp.path().display());

    let options = file_options(compression_level);

    let entries = {
        let mut zip = ZipWriter::new(temp.as_file_mut());
        let entries = add_tree(&mut zip, source_dir, folder, output, options)?;
        zip.finish()
            .map_err(|e| Error::archive(output, "failed to finalize archive", e))?;
        entries
    };

    temp.as_file()
        .sync_all()
        .map_err(|e| Error::archive(output, "failed to flush archive", e))?;
    temp.persist(output)
        .map_err(|e| Error::archive(output, "failed to move archive into place", e.error))?;

    let bytes = fs::metadata(output)
        .map_err(|e| Error::filesystem("inspect archive", output, e))?
        .len();

    tracing::info!(
        "Archive written: {} ({} bytes, {} entries)",
        output.display(),
        bytes,
        entries
    );

    Ok(ArchiveReport {
        path: output.to_path_buf(),
        bytes,
        entries,
        replaced,
    })
}

/// Level 0 stores entries uncompressed; deflate only accepts 1 through 9.
fn file_options(compression_level: u8) -> SimpleFileOptions {
    if compression_level == 0 {
        SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
    } else {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(compression_level)))
    }
}

fn add_tree<W: io::Write + io::Seek>(
    zip: &mut ZipWriter<W>,
    source_dir: &Path,
    folder: &str,
    output: &Path,
    options: SimpleFileOptions,
) -> Result<usize> {
    let mut entries = 0;

    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source_dir).to_path_buf();
            Error::filesystem("read directory", path, io::Error::from(e))
        })?;

        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|e| Error::archive(output, "entry outside plugin directory", e))?;
        let name = entry_name(folder, relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            zip.add_directory(format!("{name}/"), options)
                .map_err(|e| Error::archive(output, format!("failed to add {name}/"), e))?;
        } else if file_type.is_file() {
            zip.start_file(name.as_str(), options)
                .map_err(|e| Error::archive(output, format!("failed to add {name}"), e))?;
            let mut file = File::open(entry.path())
                .map_err(|e| Error::filesystem("read file", entry.path(), e))?;
            io::copy(&mut file, zip)
                .map_err(|e| Error::archive(output, format!("failed to write {name}"), e))?;
        } else {
            tracing::warn!("Skipping non-regular file: {}", entry.path().display());
            continue;
        }

        tracing::debug!("Added {}", name);
        entries += 1;
    }

    Ok(entries)
}

/// `folder` followed by the normal components of `relative`, `/`-joined.
fn entry_name(folder: &str, relative: &Path) -> String {
    std::iter::once(folder.to_string())
        .chain(relative.components().filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        }))
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn plugin_tree(temp: &TempDir) -> PathBuf {
        let root = temp.path().join("names-fusion");
        fs::create_dir_all(root.join("react-build/assets")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("names-fusion.php"), "<?php").unwrap();
        fs::write(root.join("react-build/assets/index.abc123.js"), "console.log(1)").unwrap();
        root
    }

    fn names(path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        names
    }

    #[test]
    fn test_entries_are_nested_under_folder() {
        let temp = TempDir::new().unwrap();
        let root = plugin_tree(&temp);
        let output = temp.path().join("out.zip");

        let report = write_archive(&root, "names-fusion", &output, 9).unwrap();

        assert!(!report.replaced);
        assert_eq!(report.entries, 6);
        assert_eq!(report.bytes, fs::metadata(&output).unwrap().len());
        assert_eq!(
            names(&output),
            vec![
                "names-fusion/",
                "names-fusion/empty/",
                "names-fusion/names-fusion.php",
                "names-fusion/react-build/",
                "names-fusion/react-build/assets/",
                "names-fusion/react-build/assets/index.abc123.js",
            ]
        );
    }

    #[test]
    fn test_file_content_roundtrips() {
        let temp = TempDir::new().unwrap();
        let root = plugin_tree(&temp);
        let output = temp.path().join("out.zip");

        write_archive(&root, "names-fusion", &output, 6).unwrap();

        let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let mut content = String::new();
        archive
            .by_name("names-fusion/react-build/assets/index.abc123.js")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "console.log(1)");
    }

    #[test]
    fn test_level_zero_stores_entries() {
        let temp = TempDir::new().unwrap();
        let root = plugin_tree(&temp);
        let output = temp.path().join("out.zip");

        let report = write_archive(&root, "names-fusion", &output, 0).unwrap();
        assert_eq!(report.entries, 6);

        let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let mut file = archive
            .by_name("names-fusion/react-build/assets/index.abc123.js")
            .unwrap();
        assert_eq!(file.compression(), CompressionMethod::Stored);
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        assert_eq!(content, "console.log(1)");
    }

    #[test]
    fn test_deflate_levels_are_accepted() {
        let temp = TempDir::new().unwrap();
        let root = plugin_tree(&temp);

        for level in 1..=wpp_core::config::MAX_COMPRESSION_LEVEL {
            let output = temp.path().join(format!("out-{level}.zip"));
            write_archive(&root, "names-fusion", &output, level).unwrap();

            let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
            let file = archive.by_name("names-fusion/names-fusion.php").unwrap();
            assert_eq!(file.compression(), CompressionMethod::Deflated);
        }
    }

    #[test]
    fn test_replaces_existing_archive() {
        let temp = TempDir::new().unwrap();
        let root = plugin_tree(&temp);
        let output = temp.path().join("out.zip");
        fs::write(&output, "stale").unwrap();

        let report = write_archive(&root, "names-fusion", &output, 9).unwrap();

        assert!(report.replaced);
        assert_eq!(names(&output).len(), 6);
        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".zip.tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_missing_source_keeps_previous_archive() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out.zip");
        fs::write(&output, "previous").unwrap();

        let err = write_archive(&temp.path().join("absent"), "names-fusion", &output, 9)
            .unwrap_err();

        assert_eq!(err.kind(), wpp_core::ErrorKind::Filesystem);
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
    }

    #[test]
    fn test_entry_name_uses_forward_slashes() {
        let relative: PathBuf = ["react-build", "assets", "index.js"].iter().collect();
        assert_eq!(
            entry_name("names-fusion", &relative),
            "names-fusion/react-build/assets/index.js"
        );
        assert_eq!(entry_name("names-fusion", Path::new("")), "names-fusion");
    }
}
