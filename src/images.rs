//! Inline image materialization
//!
//! Chart replies arrive as `data:<media type>;base64,<payload>` URLs. A
//! terminal cannot show those, so they are decoded into content-addressed
//! files. Any other URL is left for the user to open.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Not a base64 data URL")]
    NotInline,
    #[error("Invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed image reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef<'a> {
    Inline { media_type: &'a str, data: &'a str },
    Linked(&'a str),
}

impl ImageRef<'_> {
    #[must_use]
    pub fn parse(url: &str) -> ImageRef<'_> {
        url.strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .and_then(|(header, data)| {
                header
                    .strip_suffix(";base64")
                    .map(|media_type| ImageRef::Inline { media_type, data })
            })
            .unwrap_or(ImageRef::Linked(url))
    }
}

fn extension_for(media_type: &str) -> &'static str {
    match media_type.to_ascii_lowercase().as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        _ => "bin",
    }
}

/// Decode an inline image into `dir`, returning the written path.
///
/// Identical images map to the same file, so replays are idempotent.
///
/// # Errors
///
/// Fails if `url` is not a base64 data URL, if the payload does not decode,
/// or if the file cannot be written.
pub fn materialize(url: &str, dir: &Path) -> Result<PathBuf, ImageError> {
    let ImageRef::Inline { media_type, data } = ImageRef::parse(url) else {
        return Err(ImageError::NotInline);
    };

    let bytes = STANDARD.decode(data.trim())?;
    let digest = Sha256::digest(&bytes);
    let name: String = digest.iter().take(8).map(|b| format!("{b:02x}")).collect();

    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{name}.{}", extension_for(media_type)));
    if !path.exists() {
        std::fs::write(&path, &bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote inline image");
    }
    Ok(path)
}
