//! Document loading.
//!
//! Files are read as raw bytes so that binary property lists survive. Gzipped
//! input is detected either by a `.gz` suffix or by the gzip magic bytes.

use crate::document::tree::Document;
use crate::file::format::{is_gzip_path, Format};
use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Loads a document from `path`, choosing the format from its name.
///
/// Returns the document together with the format it was read as, so that the
/// caller can write it back the same way.
///
/// # Examples
///
/// ```no_run
/// use plistquill::file::loader::load_document;
///
/// let (document, format) = load_document("config.plist").unwrap();
/// println!("{} top-level keys, read as {}", document.entries().len(), format);
/// ```
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<(Document, Format)> {
    let path = path.as_ref();
    let format = Format::from_path(path);
    let document = load_document_as(path, format)?;
    Ok((document, format))
}

/// Loads a document from `path` in an explicit format.
pub fn load_document_as<P: AsRef<Path>>(path: P, format: Format) -> Result<Document> {
    let path = path.as_ref();

    let raw = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let bytes = if is_gzip_path(path) || raw.starts_with(&GZIP_MAGIC) {
        decompress_gzip_bytes(&raw)
            .with_context(|| format!("Failed to decompress {}", path.display()))?
    } else {
        raw
    };

    debug!(path = %path.display(), %format, bytes = bytes.len(), "loading document");

    format
        .decode(&bytes)
        .with_context(|| format!("Failed to load {}", path.display()))
}

/// Reads a document from standard input, gunzipping if needed.
pub fn load_document_from_stdin(format: Format) -> Result<Document> {
    let mut buffer = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    load_document_from_bytes(&buffer, format)
}

/// Decodes an in-memory buffer, gunzipping if it starts with the gzip magic.
pub fn load_document_from_bytes(bytes: &[u8], format: Format) -> Result<Document> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let inflated = decompress_gzip_bytes(bytes).context("Failed to decompress input")?;
        format.decode(&inflated)
    } else {
        format.decode(bytes)
    }
}

fn decompress_gzip_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    use flate2::read::GzDecoder;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = Vec::new();
    decoder
        .read_to_end(&mut content)
        .context("Invalid gzip data - file may be corrupted")?;
    Ok(content)
}
