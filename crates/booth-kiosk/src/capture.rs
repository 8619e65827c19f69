//! Encoding captured stills for submission.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Encodes raw image bytes as a `data:` URL.
#[must_use]
pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// MIME type guessed from the file extension. Unknown extensions are
/// treated as JPEG, the format the capture screen produces.
#[must_use]
pub fn guess_image_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

/// Reads an image file into a `data:` URL.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be read.
pub fn read_image_as_data_url(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(encode_data_url(&bytes, guess_image_mime(path)))
}

/// A loggable prefix of a `data:` URL; stills are never logged whole.
#[must_use]
pub fn preview(data_url: &str) -> &str {
    let end = data_url
        .char_indices()
        .nth(32)
        .map_or(data_url.len(), |(index, _)| index);
    &data_url[..end]
}
