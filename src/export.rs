//! The document assembler: drives capture, geometry, slicing, compositing
//! and PDF finalization end to end.
//!
//! Ordering and failure discipline: captures run strictly in sequence
//! (body, header, footer); any capture or geometry failure aborts before a
//! single page exists, so a partial document can never be written; the
//! capture stage is released on every exit path.

use crate::assets::AssetBundle;
use crate::capture::{BandCapture, CaptureConfig, StagedScene};
use crate::compositor::{OutputPage, compose_bands_only_page, compose_page};
use crate::error::BandPressError;
use crate::fonts::FontRegistry;
use crate::geometry::{ContentRange, PageGeometry};
use crate::invoice::InvoiceData;
use crate::pdf;
use crate::raster::Raster;
use crate::scene::Scene;
use crate::slicer::BandSlicer;
use crate::template::build_invoice_scene;
use crate::types::{Color, Size};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_FILE_NAME: &str = "invoice.pdf";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Output file name used by the directory-saving entry points.
    pub file_name: String,
    pub page_size: Size,
    pub capture: CaptureConfig,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            page_size: Size::a4(),
            capture: CaptureConfig::default(),
        }
    }
}

pub struct Exporter {
    fonts: Arc<FontRegistry>,
    options: ExportOptions,
}

impl Exporter {
    pub fn new(fonts: Arc<FontRegistry>, options: ExportOptions) -> Self {
        Self { fonts, options }
    }

    /// System fonts, A4 pages, 2x capture, `invoice.pdf`.
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(FontRegistry::with_system_fonts()),
            ExportOptions::default(),
        )
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Renders the invoice preview and exports it as PDF bytes.
    pub fn export_invoice(
        &self,
        data: &InvoiceData,
        assets: &AssetBundle,
    ) -> Result<Vec<u8>, BandPressError> {
        let scene = build_invoice_scene(data, assets);
        self.export_scene(&scene, assets)
    }

    /// Exports an arbitrary scene as PDF bytes.
    pub fn export_scene(
        &self,
        scene: &Scene,
        assets: &AssetBundle,
    ) -> Result<Vec<u8>, BandPressError> {
        // The staged clone lives exactly as long as this call; dropping it
        // releases the stage on success and on every error path alike.
        let mut staged =
            StagedScene::mount(scene, assets, self.fonts.clone(), &self.options.capture)?;
        let pages = paginate(
            &mut staged,
            self.options.page_size,
            self.options.capture.background,
        )?;
        pdf::assemble(&pages, self.options.page_size)
    }

    /// Exports into `dir` under the configured file name and returns the
    /// full path written.
    pub fn export_invoice_to_dir(
        &self,
        data: &InvoiceData,
        assets: &AssetBundle,
        dir: &Path,
    ) -> Result<PathBuf, BandPressError> {
        let bytes = self.export_invoice(data, assets)?;
        let path = dir.join(&self.options.file_name);
        std::fs::write(&path, &bytes)?;
        log::info!("saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// The core pipeline over any capture backend: capture in fixed order,
/// resolve geometry, slice, compose one page per band. An empty content
/// range still yields exactly one page carrying the bands.
pub fn paginate<C: BandCapture>(
    capture: &mut C,
    page_size: Size,
    background: Color,
) -> Result<Vec<OutputPage>, BandPressError> {
    let body = capture.capture_body()?;
    let header = capture.capture_header()?;
    let footer = capture.capture_footer()?;

    let geometry = PageGeometry::resolve(
        body.width(),
        page_size,
        header.as_ref().map(Raster::height),
        footer.as_ref().map(Raster::height),
    )?;
    let range = ContentRange::new(
        body.height(),
        header.as_ref().map(Raster::height),
        footer.as_ref().map(Raster::height),
    );
    let slicer = BandSlicer::new(range, geometry.usable_height_px);
    log::debug!(
        "slicing {} content px at {} px per page into {} band(s)",
        range.total_px(),
        geometry.usable_height_px,
        slicer.band_count()
    );

    let mut pages: Vec<OutputPage> = slicer
        .map(|band| {
            compose_page(
                band,
                &body,
                header.as_ref(),
                footer.as_ref(),
                &geometry,
                background,
            )
        })
        .collect();
    if pages.is_empty() {
        pages.push(compose_bands_only_page(
            header.as_ref(),
            footer.as_ref(),
            &geometry,
        ));
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pt;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeCapture {
        body: Raster,
        header: Option<Raster>,
        footer: Option<Raster>,
        calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl BandCapture for FakeCapture {
        fn capture_body(&mut self) -> Result<Raster, BandPressError> {
            self.calls.borrow_mut().push("body");
            Ok(self.body.clone())
        }

        fn capture_header(&mut self) -> Result<Option<Raster>, BandPressError> {
            self.calls.borrow_mut().push("header");
            Ok(self.header.clone())
        }

        fn capture_footer(&mut self) -> Result<Option<Raster>, BandPressError> {
            self.calls.borrow_mut().push("footer");
            Ok(self.footer.clone())
        }
    }

    fn solid(width: u32, height: u32, value: u8) -> Raster {
        Raster::from_rgba(width, height, vec![value; (width * height * 4) as usize]).unwrap()
    }

    fn fake(
        body_height: u32,
        band_height: Option<u32>,
    ) -> (FakeCapture, Rc<RefCell<Vec<&'static str>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let capture = FakeCapture {
            body: solid(500, body_height, 50),
            header: band_height.map(|h| solid(500, h, 10)),
            footer: band_height.map(|h| solid(500, h, 20)),
            calls: calls.clone(),
        };
        (capture, calls)
    }

    /// 500pt x 1000pt page against a 500px-wide capture: one px per pt,
    /// 200px bands become 200pt, usable height is exactly 600px.
    fn page() -> Size {
        Size {
            width: Pt::from_i32(500),
            height: Pt::from_i32(1000),
        }
    }

    #[test]
    fn reference_scenario_emits_five_stamped_pages() {
        let (mut capture, _) = fake(3000, Some(200));
        let pages = paginate(&mut capture, page(), Color::WHITE).unwrap();
        assert_eq!(pages.len(), 5);
        let heights: Vec<u32> = pages
            .iter()
            .map(|p| p.body.as_ref().unwrap().raster.height())
            .collect();
        assert_eq!(heights, vec![600, 600, 600, 600, 200]);
        for page in &pages {
            assert!(page.header.is_some());
            assert!(page.footer.is_some());
        }
    }

    #[test]
    fn captures_run_body_then_header_then_footer() {
        let (mut capture, calls) = fake(1000, Some(100));
        paginate(&mut capture, page(), Color::WHITE).unwrap();
        assert_eq!(*calls.borrow(), vec!["body", "header", "footer"]);
    }

    #[test]
    fn empty_content_still_emits_one_page_with_bands() {
        // Bands cover the whole 400px capture; no body rows remain.
        let (mut capture, _) = fake(400, Some(200));
        let pages = paginate(&mut capture, page(), Color::WHITE).unwrap();
        assert_eq!(pages.len(), 1);
        let only = &pages[0];
        assert!(only.body.is_none());
        assert!(only.header.is_some());
        assert!(only.footer.is_some());
    }

    #[test]
    fn overflow_aborts_with_zero_pages() {
        let small_page = Size {
            width: Pt::from_i32(500),
            height: Pt::from_i32(300),
        };
        let (mut capture, _) = fake(1000, Some(200));
        let err = paginate(&mut capture, small_page, Color::WHITE).unwrap_err();
        assert!(matches!(err, BandPressError::LayoutOverflow { .. }));
    }

    #[test]
    fn failed_body_capture_aborts_before_band_captures() {
        struct FailingCapture {
            calls: Rc<RefCell<Vec<&'static str>>>,
        }
        impl BandCapture for FailingCapture {
            fn capture_body(&mut self) -> Result<Raster, BandPressError> {
                self.calls.borrow_mut().push("body");
                Err(BandPressError::Capture("detached".to_string()))
            }
            fn capture_header(&mut self) -> Result<Option<Raster>, BandPressError> {
                self.calls.borrow_mut().push("header");
                Ok(None)
            }
            fn capture_footer(&mut self) -> Result<Option<Raster>, BandPressError> {
                self.calls.borrow_mut().push("footer");
                Ok(None)
            }
        }
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut capture = FailingCapture {
            calls: calls.clone(),
        };
        let err = paginate(&mut capture, page(), Color::WHITE).unwrap_err();
        assert!(matches!(err, BandPressError::Capture(_)));
        assert_eq!(*calls.borrow(), vec!["body"]);
    }

    #[test]
    fn repeated_pagination_is_deterministic() {
        let (mut first, _) = fake(2777, Some(160));
        let (mut second, _) = fake(2777, Some(160));
        let a = paginate(&mut first, page(), Color::WHITE).unwrap();
        let b = paginate(&mut second, page(), Color::WHITE).unwrap();
        assert_eq!(a.len(), b.len());
        for (left, right) in a.iter().zip(&b) {
            let lrect = left.body.as_ref().unwrap().rect;
            let rrect = right.body.as_ref().unwrap().rect;
            assert_eq!(lrect, rrect);
            assert_eq!(
                left.body.as_ref().unwrap().raster.height(),
                right.body.as_ref().unwrap().raster.height()
            );
        }
    }

    #[test]
    fn body_only_capture_paginates_without_bands() {
        let (mut capture, _) = fake(1500, None);
        let pages = paginate(&mut capture, page(), Color::WHITE).unwrap();
        // Full 1000pt page available: 1000px usable.
        assert_eq!(pages.len(), 2);
        assert!(pages[0].header.is_none());
        assert!(pages[0].footer.is_none());
        assert_eq!(pages[0].body.as_ref().unwrap().rect.y, Pt::ZERO);
    }
}
