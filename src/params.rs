//! Parameter validation and translation to provider-specific values.

/// Translate an aspect ratio string to SDXL pixel dimensions `(width, height)`.
///
/// SDXL is trained on a fixed set of roughly one-megapixel buckets; each
/// supported ratio maps onto the closest bucket.
///
/// # Errors
///
/// Returns an error if the ratio is not recognized.
pub fn aspect_ratio_to_sdxl_dimensions(ratio: &str) -> Result<(u32, u32), String> {
    let dims = match ratio {
        "1:1" => (1024, 1024),
        // Portrait ratios
        "4:5" | "3:4" => (896, 1152),
        "2:3" => (832, 1216),
        "9:16" => (768, 1344),
        "9:21" => (640, 1536),
        // Landscape ratios
        "5:4" | "4:3" => (1152, 896),
        "3:2" => (1216, 832),
        "16:9" => (1344, 768),
        "21:9" => (1536, 640),
        _ => {
            return Err(format!(
                "Unsupported aspect ratio '{ratio}'. Valid: 1:1, 4:5, 3:4, 2:3, 9:16, 9:21, \
                 5:4, 4:3, 3:2, 16:9, 21:9"
            ))
        }
    };
    Ok(dims)
}

/// Validate the number of denoising steps.
///
/// # Errors
///
/// Returns an error if `steps` is outside `1..=100`.
pub fn validate_steps(steps: u32) -> Result<(), String> {
    if (1..=100).contains(&steps) {
        Ok(())
    } else {
        Err(format!("Unsupported steps {steps}. Valid: 1-100"))
    }
}

/// Validate the classifier-free guidance scale.
///
/// # Errors
///
/// Returns an error if `cfg_scale` is not a finite value in `0..=50`.
pub fn validate_cfg_scale(cfg_scale: f32) -> Result<(), String> {
    if cfg_scale.is_finite() && (0.0..=50.0).contains(&cfg_scale) {
        Ok(())
    } else {
        Err(format!("Unsupported cfg scale {cfg_scale}. Valid: 0-50"))
    }
}

/// Validate the number of images requested per prompt.
///
/// # Errors
///
/// Returns an error if `count` is outside `1..=4`.
pub fn validate_count(count: u32) -> Result<(), String> {
    if (1..=4).contains(&count) {
        Ok(())
    } else {
        Err(format!("Unsupported image count {count}. Valid: 1-4"))
    }
}

/// Validate the output format parameter.
///
/// # Errors
///
/// Returns an error if the format is not recognized.
pub fn validate_format(format: &str) -> Result<(), String> {
    match format {
        "jpeg" | "png" | "webp" => Ok(()),
        _ => Err(format!("Unsupported format '{format}'. Valid: jpeg, png, webp")),
    }
}

/// Get the file extension, including the leading dot, for an output format.
#[must_use]
pub fn format_extension(format: &str) -> &'static str {
    match format {
        "png" => ".png",
        "webp" => ".webp",
        // jpeg and any unknown format default to jpg
        _ => ".jpg",
    }
}

/// MIME type of an image the caption model accepts, sniffed from its bytes.
///
/// Only JPEG and PNG uploads are accepted.
///
/// # Errors
///
/// Returns an error if the bytes are not a JPEG or PNG image.
pub fn caption_mime_type(data: &[u8]) -> Result<&'static str, String> {
    match image::guess_format(data) {
        Ok(image::ImageFormat::Jpeg) => Ok("image/jpeg"),
        Ok(image::ImageFormat::Png) => Ok("image/png"),
        Ok(other) => Err(format!("Unsupported image format {other:?}. Valid: jpg, jpeg, png")),
        Err(_) => Err("Unsupported image format. Valid: jpg, jpeg, png".to_string()),
    }
}
