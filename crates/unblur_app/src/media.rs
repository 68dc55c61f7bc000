use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use unblur_core::{CandidateFile, ACCEPTED_MEDIA_TYPES};
use unblur_logging::unblur_warn;

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Reads a file named on the command line into a picker candidate.
///
/// The media type is declared from the extension, the way a browser would
/// report it; content is never inspected.
pub fn candidate_from_path(path: &Path) -> Result<CandidateFile> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let media_type = media_type_for(path);
    if media_type.starts_with("image/") && !ACCEPTED_MEDIA_TYPES.contains(&media_type) {
        unblur_warn!("{} is {}; the service may reject it", name, media_type);
    }
    Ok(CandidateFile::new(name, media_type, bytes))
}

pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        _ => FALLBACK_MEDIA_TYPE,
    }
}
