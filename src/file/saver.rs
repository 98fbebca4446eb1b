//! Document saving with atomic writes and optional backups.

use crate::config::Config;
use crate::document::tree::Document;
use crate::file::format::{is_gzip_path, Format};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Saves `document` to `path` in `format`.
///
/// The bytes are written to a temporary sibling file which is then renamed over
/// the target, so the target is never left half written. A `.gz` target is
/// gzip-compressed. When `config.create_backup` is set and the target already
/// exists, it is first copied to `<name>.bak`.
///
/// # Examples
///
/// ```no_run
/// use plistquill::config::Config;
/// use plistquill::document::tree::Document;
/// use plistquill::file::format::Format;
/// use plistquill::file::saver::save_document;
///
/// let document = Document::default();
/// save_document("out.plist", &document, Format::Plist, &Config::default()).unwrap();
/// ```
pub fn save_document<P: AsRef<Path>>(
    path: P,
    document: &Document,
    format: Format,
    config: &Config,
) -> Result<()> {
    let path = path.as_ref();
    let data = format.encode(document, config)?;

    if config.create_backup && path.exists() {
        create_backup(path)?;
    }

    debug!(path = %path.display(), %format, bytes = data.len(), "saving document");
    write_file_atomic(path, &data, is_gzip_path(path))
}

/// Encodes `document` and writes it to `writer`, uncompressed.
pub fn write_document_to<W: Write>(
    writer: &mut W,
    document: &Document,
    format: Format,
    config: &Config,
) -> Result<()> {
    let data = format.encode(document, config)?;
    writer.write_all(&data).context("Failed to write output")?;
    writer.flush().context("Failed to flush output")?;
    Ok(())
}

/// Copies `path` to `<name>.bak` next to it.
fn create_backup(path: &Path) -> Result<PathBuf> {
    let original_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Invalid file name"))?;
    let backup_path = path.with_file_name(format!("{}.bak", original_name));
    fs::copy(path, &backup_path).context("Failed to create backup")?;
    Ok(backup_path)
}

/// Returns `<name>.tmp` next to `path`, so targets that differ only by
/// extension never share a temp file.
fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Invalid file name"))?;
    Ok(path.with_file_name(format!("{}.tmp", file_name)))
}

fn write_file_atomic(path: &Path, data: &[u8], compress: bool) -> Result<()> {
    let temp_path = temp_path_for(path)?;

    let result = write_temp(&temp_path, data, compress)
        .and_then(|()| fs::rename(&temp_path, path).context("Failed to rename temp file"));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn write_temp(temp_path: &Path, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    if compress {
        let file = fs::File::create(temp_path).context("Failed to create temp file")?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        fs::write(temp_path, data).context("Failed to write temp file")?;
    }

    Ok(())
}
