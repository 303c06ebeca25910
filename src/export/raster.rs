//! Raster capture strategy
//!
//! Snapshots the rendered report, scales it to the page width and lays the
//! same image on consecutive pages, each shifted up by one page height so the
//! page boundary shows the next band.

use tracing::debug;

use super::capture::{RenderedSurface, SurfaceCapture};
use super::document::{Page, PdfDocument};
use super::geometry::{paginate, scaled_height};
use super::REPORT_TITLE;
use crate::error::ReportResult;

/// Capture `surface` and paginate it onto pages of the given size (mm)
///
/// Capture failures come back as [`crate::ReportError::Capture`] and are not
/// retried here.
pub fn capture_and_paginate(
    capture: &dyn SurfaceCapture,
    surface: &RenderedSurface,
    page_width: f64,
    page_height: f64,
) -> ReportResult<PdfDocument> {
    let snapshot = capture.capture(surface)?;

    let image_height = scaled_height(snapshot.width(), snapshot.height(), page_width);
    let slices = paginate(image_height, page_height)?;

    debug!(
        width_px = snapshot.width(),
        height_px = snapshot.height(),
        image_height_mm = image_height,
        pages = slices.len(),
        "paginating captured surface"
    );

    let mut document = PdfDocument::new(REPORT_TITLE, page_width, page_height);
    let image = document.add_image(snapshot.into_pixels());

    for slice in &slices {
        let mut page = Page::new();
        page.draw_image(image, 0.0, -slice.source_y_offset, page_width, image_height);
        document.push_page(page);
    }

    Ok(document)
}
