//! Surface capture
//!
//! A rendered surface is the on-screen rendering of a report. Capturing it
//! yields a single RGB bitmap which the raster strategy lays across pages.

use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ReportError, ReportResult};

/// Handle to a rendered visual region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSurface {
    source: PathBuf,
    declared_size: Option<(u32, u32)>,
}

impl RenderedSurface {
    /// A surface whose pixels live in an image file (PNG or JPEG)
    pub fn from_path(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            declared_size: None,
        }
    }

    /// Declare the pixel size the presentation layer reported for this surface
    ///
    /// Capture fails if the pixels found do not match.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.declared_size = Some((width, height));
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn declared_size(&self) -> Option<(u32, u32)> {
        self.declared_size
    }
}

/// A bitmap snapshot of a surface
#[derive(Debug, Clone)]
pub struct Snapshot {
    pixels: RgbImage,
}

impl Snapshot {
    pub fn new(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbImage {
        self.pixels
    }
}

/// Produces a raster snapshot of a rendered surface
///
/// Any failure is reported as [`ReportError::Capture`]; callers do not inspect
/// the reason beyond logging it.
pub trait SurfaceCapture {
    fn capture(&self, surface: &RenderedSurface) -> ReportResult<Snapshot>;
}

/// Captures surfaces that were rendered to an image file
#[derive(Debug, Clone, Copy)]
pub struct ImageFileCapture {
    background: Rgb<u8>,
}

impl ImageFileCapture {
    pub fn new() -> Self {
        Self {
            background: Rgb([255, 255, 255]),
        }
    }
}

impl Default for ImageFileCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceCapture for ImageFileCapture {
    fn capture(&self, surface: &RenderedSurface) -> ReportResult<Snapshot> {
        let path = surface.source();
        debug!(source = %path.display(), "capturing surface");

        let decoded = image::open(path).map_err(|e| {
            ReportError::capture(format!("cannot read surface {}: {}", path.display(), e))
        })?;

        let (width, height) = (decoded.width(), decoded.height());
        if width == 0 || height == 0 {
            return Err(ReportError::capture(format!(
                "surface {} has zero area",
                path.display()
            )));
        }

        if let Some((declared_width, declared_height)) = surface.declared_size() {
            if (declared_width, declared_height) != (width, height) {
                return Err(ReportError::capture(format!(
                    "surface is {}x{} but {}x{} was declared",
                    width, height, declared_width, declared_height
                )));
            }
        }

        Ok(Snapshot::new(flatten(&decoded.to_rgba8(), self.background)))
    }
}

/// Composite an RGBA bitmap onto an opaque background
fn flatten(rgba: &image::RgbaImage, background: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |fg: u8, bg: u8| -> u8 {
            let alpha = a as u32;
            ((fg as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([
            blend(r, background.0[0]),
            blend(g, background.0[1]),
            blend(b, background.0[2]),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn test_capture_png() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.png");
        RgbImage::from_pixel(40, 120, Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let snapshot = ImageFileCapture::new()
            .capture(&RenderedSurface::from_path(&path))
            .unwrap();

        assert_eq!(snapshot.width(), 40);
        assert_eq!(snapshot.height(), 120);
        assert_eq!(snapshot.pixels().get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_transparent_pixels_become_background() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("overlay.png");
        let mut rgba = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        rgba.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
        rgba.save(&path).unwrap();

        let snapshot = ImageFileCapture::new()
            .capture(&RenderedSurface::from_path(&path))
            .unwrap();

        assert_eq!(snapshot.pixels().get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(snapshot.pixels().get_pixel(1, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_missing_surface_is_capture_error() {
        let temp_dir = TempDir::new().unwrap();
        let surface = RenderedSurface::from_path(temp_dir.path().join("missing.png"));

        let err = ImageFileCapture::new().capture(&surface).unwrap_err();
        assert!(err.is_capture());
    }

    #[test]
    fn test_undecodable_surface_is_capture_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        let err = ImageFileCapture::new()
            .capture(&RenderedSurface::from_path(&path))
            .unwrap_err();
        assert!(err.is_capture());
    }

    #[test]
    fn test_declared_size_mismatch_is_capture_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.png");
        RgbImage::new(40, 120).save(&path).unwrap();

        let surface = RenderedSurface::from_path(&path).with_size(40, 200);
        let err = ImageFileCapture::new().capture(&surface).unwrap_err();
        assert!(err.is_capture());
        assert!(err.to_string().contains("40x120"));
    }
}
