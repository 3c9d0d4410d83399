//! Page geometry: the bridge between capture pixels and page points.
//!
//! One ratio governs everything: `px_per_pt = body width px / page width
//! pt`. Band heights convert through the same ratio so header and footer
//! occupy a page-width-proportional strip regardless of their native
//! capture resolution.

use crate::error::BandPressError;
use crate::types::{Pt, Size};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width_pt: Pt,
    pub page_height_pt: Pt,
    pub px_per_pt: f32,
    /// Band heights round to whole points, like the preview's exporter.
    pub header_height_pt: Pt,
    pub footer_height_pt: Pt,
    pub usable_height_pt: Pt,
    /// Body pixels that fit one page; never below one row, so slicing
    /// always makes progress.
    pub usable_height_px: u32,
}

impl PageGeometry {
    pub fn resolve(
        body_width_px: u32,
        page: Size,
        header_height_px: Option<u32>,
        footer_height_px: Option<u32>,
    ) -> Result<Self, BandPressError> {
        if body_width_px == 0 {
            return Err(BandPressError::Capture(
                "body raster has zero width".to_string(),
            ));
        }
        let page_width_pt = page.width;
        let page_height_pt = page.height;
        let px_per_pt = body_width_px as f32 / page_width_pt.to_f32();

        let header_height_pt = band_height_pt(header_height_px, body_width_px, page_width_pt);
        let footer_height_pt = band_height_pt(footer_height_px, body_width_px, page_width_pt);

        let usable_height_pt = page_height_pt - header_height_pt - footer_height_pt;
        if usable_height_pt <= Pt::ZERO {
            return Err(BandPressError::LayoutOverflow {
                header_pt: header_height_pt.to_f32(),
                footer_pt: footer_height_pt.to_f32(),
                page_height_pt: page_height_pt.to_f32(),
            });
        }

        let usable_height_px = ((usable_height_pt.to_f32() * px_per_pt).round() as u32).max(1);
        Ok(Self {
            page_width_pt,
            page_height_pt,
            px_per_pt,
            header_height_pt,
            footer_height_pt,
            usable_height_pt,
            usable_height_px,
        })
    }
}

/// Band pixel height expressed in whole page points through the body
/// capture's width ratio.
fn band_height_pt(height_px: Option<u32>, body_width_px: u32, page_width_pt: Pt) -> Pt {
    match height_px {
        None | Some(0) => Pt::ZERO,
        Some(h) => {
            let pt = (h as f32 / body_width_px as f32) * page_width_pt.to_f32();
            Pt::from_i32(pt.round() as i32)
        }
    }
}

/// The body raster rows that hold scrollable content: everything between
/// the captured header band and footer band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    pub start_px: u32,
    pub end_px: u32,
}

impl ContentRange {
    pub fn new(
        body_height_px: u32,
        header_height_px: Option<u32>,
        footer_height_px: Option<u32>,
    ) -> Self {
        let start_px = header_height_px.unwrap_or(0).min(body_height_px);
        let end_px = body_height_px
            .saturating_sub(footer_height_px.unwrap_or(0))
            .max(start_px);
        Self { start_px, end_px }
    }

    pub fn total_px(&self) -> u32 {
        self.end_px - self.start_px
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_comes_from_body_width() {
        let geometry = PageGeometry::resolve(1190, Size::a4(), None, None).unwrap();
        assert!((geometry.px_per_pt - 1190.0 / 595.28).abs() < 1e-4);
        assert_eq!(geometry.header_height_pt, Pt::ZERO);
        assert_eq!(geometry.usable_height_pt, Size::a4().height);
    }

    #[test]
    fn band_heights_round_to_whole_points() {
        // 160px band on a 1588px-wide capture of an A4 page:
        // 160 / 1588 * 595.28 = 59.97pt -> 60pt.
        let geometry = PageGeometry::resolve(1588, Size::a4(), Some(160), Some(160)).unwrap();
        assert_eq!(geometry.header_height_pt, Pt::from_i32(60));
        assert_eq!(geometry.footer_height_pt, Pt::from_i32(60));
        let expected_usable = Size::a4().height - Pt::from_i32(120);
        assert_eq!(geometry.usable_height_pt, expected_usable);
    }

    #[test]
    fn band_round_trip_stays_within_one_pixel() {
        let geometry = PageGeometry::resolve(1588, Size::a4(), Some(213), None).unwrap();
        let back_px = geometry.header_height_pt.to_f32() * geometry.px_per_pt;
        assert!((back_px - 213.0).abs() <= geometry.px_per_pt.max(1.0));
    }

    #[test]
    fn usable_px_floors_at_one_row() {
        // Bands eat all but a sliver of the page.
        let page = Size::a4();
        let geometry = PageGeometry::resolve(1000, page, Some(700), Some(690)).unwrap();
        assert!(geometry.usable_height_pt > Pt::ZERO);
        assert!(geometry.usable_height_px >= 1);
    }

    #[test]
    fn bands_consuming_the_page_overflow() {
        // 760px bands on a 1000px-wide A4 capture: 760/1000*595.28 = 452pt
        // each, versus 841.89pt of page.
        let err = PageGeometry::resolve(1000, Size::a4(), Some(760), Some(760)).unwrap_err();
        match err {
            BandPressError::LayoutOverflow {
                header_pt,
                footer_pt,
                ..
            } => {
                assert_eq!(header_pt, 452.0);
                assert_eq!(footer_pt, 452.0);
            }
            other => panic!("expected LayoutOverflow, got {}", other),
        }
    }

    #[test]
    fn exactly_full_page_is_still_overflow() {
        // Bands summing to exactly the page height leave zero usable area.
        let page = Size {
            width: Pt::from_i32(500),
            height: Pt::from_i32(800),
        };
        // 400pt each at 1000px width: 400/500*1000 = 800px bands.
        let err = PageGeometry::resolve(1000, page, Some(800), Some(800)).unwrap_err();
        assert!(matches!(err, BandPressError::LayoutOverflow { .. }));
    }

    #[test]
    fn zero_width_body_is_a_capture_error() {
        let err = PageGeometry::resolve(0, Size::a4(), None, None).unwrap_err();
        assert!(matches!(err, BandPressError::Capture(_)));
    }

    #[test]
    fn content_range_clamps_into_the_raster() {
        let range = ContentRange::new(3000, Some(200), Some(200));
        assert_eq!(range.start_px, 200);
        assert_eq!(range.end_px, 2800);
        assert_eq!(range.total_px(), 2600);

        // Bands taller than the capture collapse the range to empty.
        let collapsed = ContentRange::new(300, Some(200), Some(200));
        assert_eq!(collapsed.total_px(), 0);
        assert!(collapsed.end_px >= collapsed.start_px);
    }
}
