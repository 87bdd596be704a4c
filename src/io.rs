//! File I/O: GeoJSON read/write, atomic big-file outputs, zip extraction.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tempfile::NamedTempFile;
use zip::ZipArchive;

use crate::geojson::FeatureCollection;

pub fn assert_not_stdout(path: &Path) -> Result<()> {
    if path == Path::new("-") {
        bail!("stdout is not supported; provide a real file path.");
    }
    Ok(())
}

/// Create the directory if it doesn't exist; error if a non-directory
/// exists there.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            bail!("Path exists but is not a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

/// Write-then-rename wrapper so a failed run never leaves partial output.
pub struct PendingWrite {
    target: PathBuf,
    tmp: NamedTempFile,
}

impl PendingWrite {
    /// Stage a write next to `target`. Refuses to overwrite an existing
    /// file unless `force` is set.
    pub fn create(target: &Path, force: bool) -> Result<Self> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        if !force && target.exists() {
            bail!("Refusing to overwrite existing file: {} (use --force)", target.display());
        }
        let tmp = NamedTempFile::new_in(target.parent().unwrap_or(Path::new(".")))
            .context("create temp file")?;
        Ok(PendingWrite { target: target.to_path_buf(), tmp })
    }

    /// Atomically move the staged bytes into place.
    pub fn commit(self) -> Result<()> {
        self.tmp.as_file().sync_all().ok(); // best-effort fsync
        self.tmp.persist(&self.target)
            .with_context(|| format!("rename to {}", self.target.display()))?;
        Ok(())
    }
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.tmp.write(buf)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.tmp.flush()
    }
}

/// Read a GeoJSON FeatureCollection from a file.
pub fn read_feature_collection(path: &Path) -> Result<FeatureCollection> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open GeoJSON file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse GeoJSON from {}", path.display()))
}

/// Write a GeoJSON FeatureCollection atomically.
pub fn write_feature_collection(path: &Path, collection: &FeatureCollection, force: bool) -> Result<()> {
    assert_not_stdout(path)?;
    let mut sink = PendingWrite::create(path, force)?;
    {
        let mut writer = BufWriter::new(&mut sink);
        serde_json::to_writer(&mut writer, collection)
            .with_context(|| format!("Failed to serialize GeoJSON to {}", path.display()))?;
        writer.flush()?;
    }
    sink.commit()
}

/// Write any serializable value as JSON, atomically.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T, force: bool) -> Result<()> {
    assert_not_stdout(path)?;
    let mut sink = PendingWrite::create(path, force)?;
    {
        let mut writer = BufWriter::new(&mut sink);
        serde_json::to_writer(&mut writer, value)
            .with_context(|| format!("Failed to serialize JSON to {}", path.display()))?;
        writer.flush()?;
    }
    sink.commit()
}

/// Extracts the given `.zip` file to the target directory. If
/// `delete_after` is set, removes the `.zip` after a successful extraction.
pub fn extract_zip(zip_path: &Path, dest_dir: &Path, delete_after: bool) -> Result<()> {
    let file = File::open(zip_path)
        .with_context(|| format!("failed to open {}", zip_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("failed to read zip archive {}", zip_path.display()))?;

    archive.extract(dest_dir)
        .with_context(|| format!("failed to extract {} to {}", zip_path.display(), dest_dir.display()))?;

    if delete_after {
        fs::remove_file(zip_path)
            .with_context(|| format!("failed to delete {}", zip_path.display()))?;
    }
    Ok(())
}
