//! Page geometry
//!
//! Splits a tall source (a captured image scaled to page width) into
//! page-height bands. All lengths are in document units (millimetres).

use crate::error::{ReportError, ReportResult};

/// A4 page width in millimetres
pub const PAGE_WIDTH_MM: f64 = 210.0;

/// A4 page height in millimetres
pub const PAGE_HEIGHT_MM: f64 = 297.0;

/// A vertical window into the source assigned to one page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSlice {
    /// Top of the band, measured from the top of the source
    pub source_y_offset: f64,
    /// Height of the band; equals the page height except possibly on the last page
    pub source_height: f64,
}

impl PageSlice {
    /// Bottom edge of the band (exclusive)
    pub fn end(&self) -> f64 {
        self.source_y_offset + self.source_height
    }
}

/// Split `total_height` into consecutive bands of `page_height`
///
/// Produces `ceil(total_height / page_height)` slices; none when the source is
/// empty. The last slice is clipped to whatever remains.
pub fn paginate(total_height: f64, page_height: f64) -> ReportResult<Vec<PageSlice>> {
    let valid = page_height.is_finite()
        && page_height > 0.0
        && total_height.is_finite()
        && total_height >= 0.0;
    if !valid {
        return Err(ReportError::InvalidGeometry {
            total_height,
            page_height,
        });
    }

    let count = (total_height / page_height).ceil() as usize;
    let slices = (0..count)
        .map(|i| {
            let source_y_offset = i as f64 * page_height;
            PageSlice {
                source_y_offset,
                source_height: (total_height - source_y_offset).min(page_height),
            }
        })
        .collect();

    Ok(slices)
}

/// Height of an image once its width is scaled to `target_width`
pub fn scaled_height(source_width: u32, source_height: u32, target_width: f64) -> f64 {
    if source_width == 0 {
        return 0.0;
    }
    source_height as f64 * target_width / source_width as f64
}
