//! File naming, image saving, and format conversion.

use std::path::Path;

use crate::error::GuruError;

/// Longest base name, in bytes, derived from a prompt.
const MAX_BASE_LEN: usize = 200;

/// Classification of the last whitespace-separated token of a candidate name.
#[derive(Debug, PartialEq, Eq)]
enum Suffix {
    /// `(k)` with `k` made of ASCII digits.
    Numeric(u64),
    /// Parenthesized, but not a usable counter (`(abc)`, `()`, overflow).
    Other,
    /// Not parenthesized.
    Plain,
}

fn classify_suffix(token: &str) -> Suffix {
    let Some(inner) = token.strip_prefix('(').and_then(|t| t.strip_suffix(')')) else {
        return Suffix::Plain;
    };
    if inner.is_empty() || !inner.bytes().all(|b| b.is_ascii_digit()) {
        return Suffix::Other;
    }
    inner.parse().map_or(Suffix::Other, Suffix::Numeric)
}

/// Resolve a file name that does not collide with an existing file.
///
/// Starting from `base + extension`, a collision bumps the trailing
/// ` (k)` counter (or appends ` (1)` when there is none) until `exists`
/// reports a free name. A trailing parenthesized token that is not a
/// counter, such as `(abc)`, stops the search and the colliding name is
/// returned as is.
pub fn resolve_unique_name_with(
    base: &str,
    extension: &str,
    mut exists: impl FnMut(&str) -> bool,
) -> String {
    let mut candidate = base.to_string();

    while exists(&format!("{candidate}{extension}")) {
        let mut tokens: Vec<&str> = candidate.split_whitespace().collect();
        let next = match tokens.last().map(|t| classify_suffix(t)) {
            Some(Suffix::Numeric(k)) => match k.checked_add(1) {
                Some(next) => {
                    tokens.pop();
                    next
                }
                None => break,
            },
            Some(Suffix::Other) => break,
            Some(Suffix::Plain) | None => 1,
        };
        let stem = tokens.join(" ");
        tracing::debug!(taken = %candidate, next, "file name taken, bumping suffix");
        candidate = format!("{stem} ({next})");
    }

    format!("{candidate}{extension}")
}

/// Resolve a file name inside `dir` that no existing file is using.
///
/// Only checks for existence; nothing is created. Another writer may still
/// take the name before the caller writes to it.
#[must_use]
pub fn resolve_unique_name(dir: &Path, base: &str, extension: &str) -> String {
    resolve_unique_name_with(base, extension, |name| dir.join(name).is_file())
}

/// Derive a file base name from a prompt.
///
/// The prompt text is kept as typed, spaces and case included. Path
/// separators and control characters become hyphens, and the result is
/// trimmed and capped at 200 bytes.
#[must_use]
pub fn prompt_base_name(prompt: &str) -> String {
    let mut result = String::with_capacity(prompt.len().min(MAX_BASE_LEN));

    for ch in prompt.trim().chars() {
        let ch = if ch == '/' || ch == '\\' || ch.is_control() { '-' } else { ch };
        if result.len() + ch.len_utf8() > MAX_BASE_LEN {
            break;
        }
        result.push(ch);
    }

    let trimmed = result.trim_end();
    if trimmed.is_empty() {
        "image".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Save raw image bytes to a file, converting format if necessary.
///
/// # Errors
///
/// Returns an error if the file cannot be written or format conversion fails.
pub fn save_image(
    data: &[u8],
    source_mime: &str,
    target_format: &str,
    output_path: &Path,
) -> Result<(), GuruError> {
    if mime_matches_format(source_mime, target_format) {
        std::fs::write(output_path, data).map_err(GuruError::Io)
    } else {
        tracing::debug!(source_mime, target_format, "converting generated image");
        convert_and_save(data, target_format, output_path)
    }
}

fn mime_matches_format(mime: &str, format: &str) -> bool {
    matches!((mime, format), ("image/jpeg", "jpeg") | ("image/png", "png") | ("image/webp", "webp"))
}

fn convert_and_save(data: &[u8], target_format: &str, output_path: &Path) -> Result<(), GuruError> {
    let img = image::load_from_memory(data)
        .map_err(|e| GuruError::ImageConversion(format!("Failed to decode image: {e}")))?;

    let image_format = match target_format {
        // JPEG has no alpha channel.
        "jpeg" => {
            return image::DynamicImage::ImageRgb8(img.to_rgb8())
                .save_with_format(output_path, image::ImageFormat::Jpeg)
                .map_err(|e| GuruError::ImageConversion(format!("Failed to save as jpeg: {e}")));
        }
        "png" => image::ImageFormat::Png,
        "webp" => image::ImageFormat::WebP,
        other => {
            return Err(GuruError::ImageConversion(format!("Unsupported format: {other}")));
        }
    };

    img.save_with_format(output_path, image_format)
        .map_err(|e| GuruError::ImageConversion(format!("Failed to save as {target_format}: {e}")))
}
