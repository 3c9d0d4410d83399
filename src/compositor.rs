//! Composes one output page per band: header stamped at the top edge, the
//! body slice between the bands, footer at the bottom edge. Every page gets
//! the same header and footer; compositing is a pure function of the band
//! plus the static band rasters, with no cross-page state.

use crate::geometry::PageGeometry;
use crate::raster::Raster;
use crate::slicer::PageBand;
use crate::types::{Color, Pt, Rect};

/// A raster positioned on the page, in page points.
#[derive(Debug, Clone)]
pub struct Placement {
    pub rect: Rect,
    pub raster: Raster,
}

/// One finished page, placements in stacking order.
#[derive(Debug, Clone)]
pub struct OutputPage {
    pub header: Option<Placement>,
    pub body: Option<Placement>,
    pub footer: Option<Placement>,
}

impl OutputPage {
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.header
            .iter()
            .chain(self.body.iter())
            .chain(self.footer.iter())
    }
}

pub(crate) fn compose_page(
    band: PageBand,
    body: &Raster,
    header: Option<&Raster>,
    footer: Option<&Raster>,
    geometry: &PageGeometry,
    background: Color,
) -> OutputPage {
    // The slice surface is background-filled before the copy so partially
    // transparent captures never leave see-through gaps on the page.
    let slice = body.band(band.source_y, band.height_px, background);
    let body_placement = Placement {
        rect: Rect {
            x: Pt::ZERO,
            y: geometry.header_height_pt,
            width: geometry.page_width_pt,
            height: Pt::from_f32(band.height_pt(geometry.px_per_pt)),
        },
        raster: slice,
    };

    OutputPage {
        header: band_placement_top(header, geometry),
        body: Some(body_placement),
        footer: band_placement_bottom(footer, geometry),
    }
}

/// The page emitted when the bands cover the entire capture and no body
/// content remains: header and footer only, never a zero-page document.
pub(crate) fn compose_bands_only_page(
    header: Option<&Raster>,
    footer: Option<&Raster>,
    geometry: &PageGeometry,
) -> OutputPage {
    OutputPage {
        header: band_placement_top(header, geometry),
        body: None,
        footer: band_placement_bottom(footer, geometry),
    }
}

fn band_placement_top(raster: Option<&Raster>, geometry: &PageGeometry) -> Option<Placement> {
    let raster = raster?;
    if geometry.header_height_pt <= Pt::ZERO {
        return None;
    }
    Some(Placement {
        rect: Rect {
            x: Pt::ZERO,
            y: Pt::ZERO,
            width: geometry.page_width_pt,
            height: geometry.header_height_pt,
        },
        raster: raster.clone(),
    })
}

fn band_placement_bottom(raster: Option<&Raster>, geometry: &PageGeometry) -> Option<Placement> {
    let raster = raster?;
    if geometry.footer_height_pt <= Pt::ZERO {
        return None;
    }
    Some(Placement {
        rect: Rect {
            x: Pt::ZERO,
            y: geometry.page_height_pt - geometry.footer_height_pt,
            width: geometry.page_width_pt,
            height: geometry.footer_height_pt,
        },
        raster: raster.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ContentRange;
    use crate::slicer::BandSlicer;
    use crate::types::Size;

    fn solid(width: u32, height: u32, value: u8) -> Raster {
        let data = vec![value; (width * height * 4) as usize];
        Raster::from_rgba(width, height, data).unwrap()
    }

    fn geometry(body_width: u32, header: Option<u32>, footer: Option<u32>) -> PageGeometry {
        PageGeometry::resolve(body_width, Size::a4(), header, footer).unwrap()
    }

    #[test]
    fn page_stacks_header_body_footer() {
        let geometry = geometry(1190, Some(160), Some(160));
        let body = solid(1190, 3000, 200);
        let header = solid(1190, 160, 10);
        let footer = solid(1190, 160, 20);
        let band = PageBand {
            source_y: 160,
            height_px: 600,
        };
        let page = compose_page(
            band,
            &body,
            Some(&header),
            Some(&footer),
            &geometry,
            Color::WHITE,
        );

        let header_rect = page.header.as_ref().unwrap().rect;
        assert_eq!(header_rect.y, Pt::ZERO);
        assert_eq!(header_rect.height, geometry.header_height_pt);

        let body_rect = page.body.as_ref().unwrap().rect;
        assert_eq!(body_rect.y, geometry.header_height_pt);
        let expected_height = 600.0 / geometry.px_per_pt;
        assert!((body_rect.height.to_f32() - expected_height).abs() < 0.01);

        let footer_rect = page.footer.as_ref().unwrap().rect;
        assert_eq!(
            footer_rect.y,
            geometry.page_height_pt - geometry.footer_height_pt
        );
        assert_eq!(page.placements().count(), 3);
    }

    #[test]
    fn body_slice_matches_band_rows() {
        let geometry = geometry(4, None, None);
        // 4x4 raster with row index in the red channel.
        let mut data = Vec::new();
        for row in 0..4u8 {
            for _ in 0..4 {
                data.extend_from_slice(&[row, 0, 0, 255]);
            }
        }
        let body = Raster::from_rgba(4, 4, data).unwrap();
        let band = PageBand {
            source_y: 2,
            height_px: 2,
        };
        let page = compose_page(band, &body, None, None, &geometry, Color::WHITE);
        let slice = &page.body.as_ref().unwrap().raster;
        assert_eq!(slice.height(), 2);
        assert_eq!(slice.rgba()[0], 2);
        assert_eq!(slice.rgba()[4 * 4], 3);
    }

    #[test]
    fn missing_bands_compose_body_only_pages() {
        let geometry = geometry(1190, None, None);
        let body = solid(1190, 1000, 128);
        let band = PageBand {
            source_y: 0,
            height_px: 1000,
        };
        let page = compose_page(band, &body, None, None, &geometry, Color::WHITE);
        assert!(page.header.is_none());
        assert!(page.footer.is_none());
        assert_eq!(page.body.as_ref().unwrap().rect.y, Pt::ZERO);
    }

    #[test]
    fn bands_only_page_has_no_body() {
        let geometry = geometry(1190, Some(160), Some(160));
        let header = solid(1190, 160, 1);
        let footer = solid(1190, 160, 2);
        let page = compose_bands_only_page(Some(&header), Some(&footer), &geometry);
        assert!(page.body.is_none());
        assert_eq!(page.placements().count(), 2);
    }

    #[test]
    fn every_band_gets_identical_band_placements() {
        let geometry = geometry(1190, Some(160), Some(160));
        let body = solid(1190, 3000, 99);
        let header = solid(1190, 160, 1);
        let footer = solid(1190, 160, 2);
        let range = ContentRange::new(3000, Some(160), Some(160));
        let pages: Vec<OutputPage> = BandSlicer::new(range, geometry.usable_height_px)
            .map(|band| {
                compose_page(
                    band,
                    &body,
                    Some(&header),
                    Some(&footer),
                    &geometry,
                    Color::WHITE,
                )
            })
            .collect();
        assert!(pages.len() > 1);
        let first_header = pages[0].header.as_ref().unwrap().rect;
        for page in &pages {
            assert_eq!(page.header.as_ref().unwrap().rect, first_header);
            assert_eq!(
                page.footer.as_ref().unwrap().rect.y,
                geometry.page_height_pt - geometry.footer_height_pt
            );
        }
    }
}
