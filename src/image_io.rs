//! Conversion between image files and pixel collections.
//!
//! Images are flattened row-major: pixel `(x, y)` lands at index
//! `y * width + x`. The SOM itself never looks at positions, so any
//! consistent order would do as long as loading and saving agree.

use crate::error::{Result, SomError};
use crate::som::Color;
use image::{ImageReader, Rgb, RgbImage};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A decoded image as normalized color triples.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channels in `[0, 1]`, row-major.
    pub pixels: Vec<Color>,
}

/// Decodes an image file into normalized pixels.
pub fn load_pixels(path: &Path) -> Result<LoadedImage> {
    if !path.exists() {
        return Err(SomError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?
        .into_rgb8();

    Ok(LoadedImage {
        width: img.width(),
        height: img.height(),
        pixels: image_to_pixels(&img),
    })
}

/// Flattens an RGB image into normalized pixels.
pub fn image_to_pixels(img: &RgbImage) -> Vec<Color> {
    img.pixels()
        .map(|Rgb([r, g, b])| [*r as f32 / 255.0, *g as f32 / 255.0, *b as f32 / 255.0])
        .collect()
}

/// Rebuilds an RGB image from pixels whose channels are in `[0, 255]`.
///
/// Channels outside that range are saturated.
pub fn pixels_to_image(width: u32, height: u32, pixels: &[Color]) -> Result<RgbImage> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(SomError::InvalidArgument(format!(
            "{} pixels given for a {}x{} image",
            pixels.len(),
            width,
            height
        )));
    }

    let raw: Vec<u8> = pixels
        .iter()
        .flat_map(|px| px.map(|c| c as u8))
        .collect();

    RgbImage::from_raw(width, height, raw).ok_or_else(|| {
        SomError::InvalidArgument(format!("cannot build a {width}x{height} image"))
    })
}

/// Encodes posterized pixels to `path`; the format follows the extension.
pub fn save_pixels(path: &Path, width: u32, height: u32, pixels: &[Color]) -> Result<()> {
    let img = pixels_to_image(width, height, pixels)?;
    img.save(path)?;
    Ok(())
}

/// `<stem><suffix>.<ext>` next to `input`; `.png` when `input` has no extension.
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());

    input.with_file_name(format!("{stem}{suffix}.{ext}"))
}

/// Number of distinct RGB colors in an image.
pub fn count_colors(img: &RgbImage) -> usize {
    img.pixels().map(|p| p.0).collect::<HashSet<[u8; 3]>>().len()
}
