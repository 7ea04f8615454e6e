//! Single-channel intensity images.
//!
//! Pixels are stored row-major as `f32` in [0,1] where 1.0 is ink, the
//! inverse of the dark-on-light rasters on disk.

use std::path::{Path, PathBuf};

use image::GrayImage;
use log::{debug, info};

use crate::error::{Error, Result};

/// Side length of the canvases the default model is built for.
pub const IMAGE_SIZE: usize = 300;

#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<f32>,
}

impl Image {
    /// A blank canvas.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0.0; width * height],
        }
    }

    pub fn from_pixels(width: usize, height: usize, pixels: Vec<f32>) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(Error::Shape(format!(
                "{} pixels for a {}x{} image",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.pixels[y * self.width + x] = value;
    }

    /// Mean absolute per-pixel difference, or `None` if shapes differ.
    pub fn mean_abs_diff(&self, other: &Image) -> Option<f32> {
        if self.shape() != other.shape() || self.pixels.is_empty() {
            return None;
        }
        let total: f32 = self
            .pixels
            .iter()
            .zip(&other.pixels)
            .map(|(a, b)| (a - b).abs())
            .sum();
        Some(total / self.pixels.len() as f32)
    }

    /// Decode a raster as luma and map it to intensity `1 - p/255`.
    pub fn load(path: &Path) -> Result<Image> {
        let luma = image::open(path)
            .map_err(|source| Error::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_luma8();
        let (width, height) = (luma.width() as usize, luma.height() as usize);
        let pixels = luma
            .into_raw()
            .into_iter()
            .map(|p| 1.0 - p as f32 / 255.0)
            .collect();
        debug!("loaded {} ({}x{})", path.display(), width, height);
        Ok(Image {
            width,
            height,
            pixels,
        })
    }

    /// Write as an 8-bit grayscale PNG, ink dark on a light background.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }
        let raw: Vec<u8> = self
            .pixels
            .iter()
            .map(|v| ((1.0 - v.clamp(0.0, 1.0)) * 255.0).round() as u8)
            .collect();
        let buffer = GrayImage::from_raw(self.width as u32, self.height as u32, raw)
            .ok_or_else(|| Error::Shape(format!("{}x{} buffer", self.width, self.height)))?;
        buffer.save(path).map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load every path in order; the first unreadable file aborts the batch.
pub fn load_images<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Image>> {
    paths.iter().map(|p| Image::load(p.as_ref())).collect()
}

/// Write a preview of `image` to `<dir>/<name>.png` and log where it went.
pub fn show(image: &Image, dir: &Path, name: &str) -> Result<PathBuf> {
    let path = dir.join(format!("{}.png", name));
    image.save_png(&path)?;
    info!("preview: {}", path.display());
    Ok(path)
}
