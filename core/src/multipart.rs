//! Single-part `multipart/form-data` encoding for file uploads.
//!
//! The whole file is read into memory before the request is built. The file
//! handle lives only inside `read_file` and is closed before the body is
//! assembled, whether or not the read succeeded.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use uuid::Uuid;

use crate::error::{Error, Result, ValidationError};

/// Content type used when no signature matches.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Leading-byte signatures, checked in order.
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], "image/png"),
    (&[0xFF, 0xD8, 0xFF], "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"BM", "image/bmp"),
    (b"II*\0", "image/tiff"),
    (b"MM\0*", "image/tiff"),
    (b"{\\rtf", "application/rtf"),
    (&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1], "application/x-ole-storage"),
    (b"PK\x03\x04", "application/zip"),
    (&[0x1F, 0x8B], "application/gzip"),
];

/// Sniffs a content type from the first bytes of a file.
pub fn detect_content_type(data: &[u8]) -> &'static str {
    // RIFF containers carry their real type at offset 8.
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return "image/webp";
    }
    SIGNATURES
        .iter()
        .find(|(magic, _)| data.starts_with(magic))
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// A fresh boundary token, unique per request.
pub fn new_boundary() -> String {
    format!("copyleaks-{}", Uuid::new_v4().simple())
}

/// Reads `path` and wraps its contents in a one-part multipart body.
pub fn encode(path: &Path, boundary: &str) -> Result<Vec<u8>> {
    let data = read_file(path)?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    encode_bytes(&filename, &data, boundary)
}

/// Wraps `data` in a one-part multipart body named `filename`.
///
/// Quotes and backslashes in the name are backslash-escaped inside the quoted
/// `filename` parameter. Names with control characters are rejected.
pub fn encode_bytes(filename: &str, data: &[u8], boundary: &str) -> Result<Vec<u8>> {
    let filename = quote_filename(filename)?;
    let content_type = detect_content_type(data);
    let head = format!(
        "\r\n--{boundary}\r\n\
         content-disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: {content_type}\r\n\
         Content-Transfer-Encoding: binary\r\n\
         \r\n"
    );
    let tail = format!("\r\n--{boundary}--\r\n");

    let mut body = Vec::with_capacity(head.len() + data.len() + tail.len());
    body.extend_from_slice(head.as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(tail.as_bytes());
    Ok(body)
}

fn quote_filename(filename: &str) -> Result<String> {
    if filename.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFileName(filename.to_string()).into());
    }
    let mut quoted = String::with_capacity(filename.len());
    for c in filename.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    Ok(quoted)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(io_err)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data).map_err(io_err)?;
    Ok(data)
}
