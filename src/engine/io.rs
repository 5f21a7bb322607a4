//! Raster I/O for Collage
//!
//! PPM (ASCII `P3`) is encoded and decoded natively. PNG and JPEG go
//! through the `image` crate at 8 bits per channel.
//!
//! Decoded images are plain pixel grids; placing them on a layer is up to
//! the caller.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use log::debug;

use crate::error::{CollageError, Result};
use crate::layers::Layer;
use crate::pixel::{Pixel, PixelGrid};

const PPM_MAGIC: &str = "P3";

/// Channel ceiling of 8-bit raster formats
const EIGHT_BIT_MAX: u16 = 255;

/// Raster formats the engine can read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Ppm,
    Png,
    Jpeg,
}

impl RasterFormat {
    /// Pick a format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "ppm" => Ok(RasterFormat::Ppm),
            "png" => Ok(RasterFormat::Png),
            "jpg" | "jpeg" => Ok(RasterFormat::Jpeg),
            "" => Err(CollageError::UnsupportedFormat {
                format: format!("{} (no extension)", path.display()),
            }),
            other => Err(CollageError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// Export settings
#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    /// JPEG quality, 1-100 (default: 90)
    pub jpeg_quality: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions { jpeg_quality: 90 }
    }
}

impl ExportOptions {
    pub fn with_jpeg_quality(quality: u8) -> Self {
        ExportOptions {
            jpeg_quality: quality.clamp(1, 100),
        }
    }
}

// ============================================================================
// PPM
// ============================================================================

/// Encode a layer as ASCII PPM (`P3`); alpha is dropped
pub fn encode_ppm(layer: &Layer) -> String {
    let mut out = format!(
        "{}\n{} {}\n{}\n",
        PPM_MAGIC,
        layer.width(),
        layer.height(),
        layer.max_value()
    );
    for row in layer.pixels() {
        let line: Vec<String> = row
            .iter()
            .map(|p| format!("{} {} {}", p.r(), p.g(), p.b()))
            .collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// Decode ASCII PPM (`P3`) text into an opaque pixel grid
///
/// `#` starts a comment that runs to the end of the line.
pub fn decode_ppm(text: &str) -> Result<PixelGrid> {
    let words: Vec<&str> = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(str::split_whitespace)
        .collect();
    let mut tokens = words.iter().copied();

    match tokens.next() {
        Some(PPM_MAGIC) => {}
        Some(other) => {
            return Err(decode_error(format!(
                "expected magic '{}', found '{}'",
                PPM_MAGIC, other
            )))
        }
        None => return Err(decode_error("empty PPM data".to_string())),
    }

    let mut next_number = |what: &str| -> Result<u32> {
        let token = tokens
            .next()
            .ok_or_else(|| decode_error(format!("missing {}", what)))?;
        token
            .parse::<u32>()
            .map_err(|_| decode_error(format!("invalid {}: '{}'", what, token)))
    };

    let width = next_number("width")? as usize;
    let height = next_number("height")? as usize;
    let max_value = next_number("max value")?;
    if width == 0 || height == 0 {
        return Err(CollageError::InvalidDimensions {
            reason: format!("PPM is {}x{}", width, height),
        });
    }
    let max_value = u16::try_from(max_value)
        .ok()
        .filter(|&m| m > 0)
        .ok_or_else(|| decode_error(format!("max value {} out of range", max_value)))?;

    // Header is magic plus three numbers; the rest must be exactly the samples
    let samples = words.len() - 4;
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| decode_error(format!("PPM size {}x{} overflows", width, height)))?;
    if samples != expected {
        return Err(decode_error(format!(
            "{}x{} PPM needs {} samples, found {}",
            width, height, expected, samples
        )));
    }

    let mut grid = Vec::with_capacity(height);
    for _ in 0..height {
        let mut row = Vec::with_capacity(width);
        for _ in 0..width {
            let r = next_number("red component")?;
            let g = next_number("green component")?;
            let b = next_number("blue component")?;
            let clamp = |c: u32| c.min(u16::MAX as u32) as u16;
            row.push(Pixel::rgb(clamp(r), clamp(g), clamp(b), max_value)?);
        }
        grid.push(row);
    }

    Ok(grid)
}

fn decode_error(reason: String) -> CollageError {
    CollageError::ImageDecode {
        reason,
        source: None,
    }
}

// ============================================================================
// 8-bit conversion
// ============================================================================

/// Convert a layer to an 8-bit RGBA image
///
/// # Errors
/// `ImageEncode` if the layer is too large for a raster image.
pub fn to_rgba_image(layer: &Layer) -> Result<RgbaImage> {
    let (width, height) = raster_dimensions(layer.width(), layer.height())?;
    let mut image = RgbaImage::new(width, height);
    for (y, row) in layer.pixels().iter().enumerate() {
        for (x, pixel) in row.iter().enumerate() {
            let [r, g, b, a] = pixel.rescale(EIGHT_BIT_MAX).channels();
            image.put_pixel(x as u32, y as u32, Rgba([r as u8, g as u8, b as u8, a as u8]));
        }
    }
    Ok(image)
}

fn raster_dimensions(width: usize, height: usize) -> Result<(u32, u32)> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(CollageError::ImageEncode {
            reason: format!("{}x{} exceeds raster image limits", width, height),
            source: None,
        }),
    }
}

/// Convert an 8-bit RGBA image to a pixel grid at max value 255
pub fn from_rgba_image(image: &RgbaImage) -> PixelGrid {
    image
        .rows()
        .map(|row| {
            row.map(|Rgba([r, g, b, a])| {
                Pixel::clamped(*r as i64, *g as i64, *b as i64, *a as i64, EIGHT_BIT_MAX)
            })
            .collect()
        })
        .collect()
}

// ============================================================================
// Files
// ============================================================================

/// Read an image file into a pixel grid
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `UnsupportedFormat` - If the extension is not ppm/png/jpg/jpeg
/// * `ImageDecode` - If the contents cannot be decoded
pub fn import_image(path: &Path) -> Result<PixelGrid> {
    if !path.exists() {
        return Err(CollageError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let format = RasterFormat::from_path(path)?;
    debug!("Importing {:?} image from {}", format, path.display());

    match format {
        RasterFormat::Ppm => decode_ppm(&fs::read_to_string(path)?),
        RasterFormat::Png | RasterFormat::Jpeg => {
            let decoded = image::open(path).map_err(|e| CollageError::ImageDecode {
                reason: format!("Failed to open {}: {}", path.display(), e),
                source: Some(Box::new(e)),
            })?;
            Ok(from_rgba_image(&decoded.to_rgba8()))
        }
    }
}

/// Write a layer to an image file, choosing the format from the extension
pub fn export_image(layer: &Layer, path: &Path, options: ExportOptions) -> Result<()> {
    let format = RasterFormat::from_path(path)?;
    debug!("Exporting '{}' as {:?} to {}", layer.name(), format, path.display());

    match format {
        RasterFormat::Ppm => fs::write(path, encode_ppm(layer))?,
        RasterFormat::Png | RasterFormat::Jpeg => {
            let image = to_rgba_image(layer)?;
            let mut writer = BufWriter::new(File::create(path)?);
            encode_8bit(&mut writer, image, format, options).map_err(|e| {
                CollageError::ImageEncode {
                    reason: format!("Failed to write {}: {}", path.display(), e),
                    source: Some(Box::new(e)),
                }
            })?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Encode an 8-bit image as PNG or JPEG
fn encode_8bit<W: Write>(
    writer: W,
    image: RgbaImage,
    format: RasterFormat,
    options: ExportOptions,
) -> image::ImageResult<()> {
    if format == RasterFormat::Jpeg {
        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
        return JpegEncoder::new_with_quality(writer, options.jpeg_quality).write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        );
    }
    PngEncoder::new(writer).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )
}

// ============================================================================
// Tests
// ============================================================================
