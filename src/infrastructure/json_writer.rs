//! JSON document writer for crawl output

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Indentation used for every written document
const INDENT: &[u8] = b"    ";

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize output document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Serialize `document` as 4-space indented JSON into a byte buffer.
pub fn to_pretty_json<T: Serialize + ?Sized>(document: &T) -> Result<Vec<u8>, OutputError> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    document.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Write `document` to `path`, replacing any existing file.
///
/// The document is serialized in full before the file is touched, so a
/// serialization failure leaves a previous file intact.
pub fn write_json_document<T: Serialize + ?Sized>(path: &Path, document: &T) -> Result<(), OutputError> {
    let bytes = to_pretty_json(document)?;

    let io_error = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes).map_err(io_error)?;
    writer.flush().map_err(io_error)?;

    info!("Wrote {} bytes to {:?}", bytes.len(), path);
    Ok(())
}
