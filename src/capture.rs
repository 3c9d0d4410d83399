//! Band capture: turns a mounted scene into rasters.
//!
//! `BandCapture` is the capability seam between the pagination engine and
//! the painting backend; the engine only ever sees rasters, so alternative
//! backends (a headless browser, a server-side rasterizer) can slot in
//! without touching the slicer or compositor.

use crate::assets::AssetBundle;
use crate::error::BandPressError;
use crate::fonts::FontRegistry;
use crate::paint::{PaintResources, paint_band, paint_full_scene};
use crate::raster::Raster;
use crate::scene::Scene;
use crate::types::Color;
use std::collections::HashMap;
use std::sync::Arc;
use tiny_skia::Pixmap;

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Supersampling factor applied to the whole capture.
    pub scale: f32,
    /// Opaque fill behind the full-document capture. Band captures stay
    /// transparent so the compositor can stamp them over any page.
    pub background: Color,
    pub image_policy: ImagePolicy,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: Color::WHITE,
            image_policy: ImagePolicy::Strict,
        }
    }
}

/// How the mount treats images it cannot resolve to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePolicy {
    /// Every referenced image must decode before any capture runs; a
    /// missing, unresolved-remote, or undecodable image aborts the mount.
    Strict,
    /// Unresolvable images are skipped and leave a blank region.
    SkipUnresolved,
}

/// Sequential capture of the three page ingredients. Implementations are
/// called in a fixed order: body first, then header, then footer.
pub trait BandCapture {
    fn capture_body(&mut self) -> Result<Raster, BandPressError>;
    fn capture_header(&mut self) -> Result<Option<Raster>, BandPressError>;
    fn capture_footer(&mut self) -> Result<Option<Raster>, BandPressError>;
}

/// A detached clone of the scene mounted for capture, with every referenced
/// image decoded up front.
///
/// The stage is a uniquely owned scoped resource: it exists only for the
/// duration of one export and is released on every exit path when dropped.
/// The caller's scene is never touched.
#[derive(Debug)]
pub struct StagedScene {
    scene: Scene,
    fonts: Arc<FontRegistry>,
    images: HashMap<String, Pixmap>,
    config: CaptureConfig,
}

impl StagedScene {
    pub fn mount(
        scene: &Scene,
        assets: &AssetBundle,
        fonts: Arc<FontRegistry>,
        config: &CaptureConfig,
    ) -> Result<Self, BandPressError> {
        if scene.width == 0 {
            return Err(BandPressError::Capture(
                "capture source has zero width".to_string(),
            ));
        }
        if !scene.has_content() {
            return Err(BandPressError::Capture(
                "capture source has no content".to_string(),
            ));
        }
        if !(config.scale > 0.0 && config.scale.is_finite()) {
            return Err(BandPressError::Capture(format!(
                "invalid capture scale {}",
                config.scale
            )));
        }

        let scene = scene.clone();
        let mut images: HashMap<String, Pixmap> = HashMap::new();
        for name in scene.image_refs() {
            if images.contains_key(name) {
                continue;
            }
            let resolved = match assets.image(name) {
                None => Err(format!("image asset '{}' is not in the bundle", name)),
                Some(asset) if asset.is_unresolved() => Err(format!(
                    "image asset '{}' points at an unresolved remote source {}",
                    name,
                    asset.source.as_deref().unwrap_or("")
                )),
                Some(asset) => crate::assets::decode_image_pixmap(&asset.data)
                    .map_err(|e| format!("image asset '{}' failed to decode: {}", name, e)),
            };
            match resolved {
                Ok(pixmap) => {
                    images.insert(name.to_string(), pixmap);
                }
                Err(message) => match config.image_policy {
                    ImagePolicy::Strict => return Err(BandPressError::Capture(message)),
                    ImagePolicy::SkipUnresolved => {
                        log::warn!("{}; region will be blank", message);
                    }
                },
            }
        }

        log::debug!(
            "stage mounted: {}px wide, {} image(s) decoded, scale {}",
            scene.width,
            images.len(),
            config.scale
        );
        Ok(Self {
            scene,
            fonts,
            images,
            config: config.clone(),
        })
    }

    fn resources(&self) -> PaintResources<'_> {
        PaintResources {
            fonts: &self.fonts,
            images: &self.images,
        }
    }
}

impl Drop for StagedScene {
    fn drop(&mut self) {
        // Cleanup is unconditional and must never mask the export outcome.
        log::debug!("capture stage released");
    }
}

impl BandCapture for StagedScene {
    fn capture_body(&mut self) -> Result<Raster, BandPressError> {
        let pixmap = paint_full_scene(
            &self.scene,
            self.config.scale,
            self.config.background,
            &self.resources(),
        )?;
        log::debug!("body captured: {}x{}px", pixmap.width(), pixmap.height());
        Ok(Raster::from_pixmap(&pixmap))
    }

    fn capture_header(&mut self) -> Result<Option<Raster>, BandPressError> {
        let Some(band) = self.scene.header.clone() else {
            return Ok(None);
        };
        let pixmap = paint_band(&band, self.scene.width, self.config.scale, &self.resources())?;
        Ok(Some(Raster::from_pixmap(&pixmap)))
    }

    fn capture_footer(&mut self) -> Result<Option<Raster>, BandPressError> {
        let Some(band) = self.scene.footer.clone() else {
            return Ok(None);
        };
        let pixmap = paint_band(&band, self.scene.width, self.config.scale, &self.resources())?;
        Ok(Some(Raster::from_pixmap(&pixmap)))
    }
}
