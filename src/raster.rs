use crate::types::Color;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// An immutable RGBA pixel grid produced by a capture.
///
/// Pixel data is straight (non-premultiplied) alpha, row-major, shared
/// cheaply between the pages that re-stamp the same band. Never mutated
/// after capture; slicing and compositing allocate new rasters.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl Raster {
    /// Wraps raw straight-alpha RGBA bytes. Returns `None` when the byte
    /// length does not match the dimensions.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data: data.into(),
        })
    }

    /// Converts a painted surface into an immutable raster, demultiplying
    /// tiny-skia's premultiplied pixels.
    pub(crate) fn from_pixmap(pixmap: &Pixmap) -> Self {
        let mut data = Vec::with_capacity(pixmap.pixels().len() * 4);
        for pixel in pixmap.pixels() {
            let c = pixel.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Self {
            width: pixmap.width(),
            height: pixmap.height(),
            data: data.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.data
    }

    /// One page-band slice: a raster of the same width, `height` rows tall,
    /// filled with the opaque `background` and overlaid with the source
    /// rows `[source_y, source_y + height)`. Rows past the bottom edge stay
    /// background, so a defensively clamped copy can never read out of
    /// bounds.
    pub(crate) fn band(&self, source_y: u32, height: u32, background: Color) -> Raster {
        let width = self.width as usize;
        let [bg_r, bg_g, bg_b, _] = background.to_rgba8();
        let mut out = Vec::with_capacity(width * height as usize * 4);
        for _ in 0..(width * height as usize) {
            out.extend_from_slice(&[bg_r, bg_g, bg_b, 255]);
        }

        let available = self.height.saturating_sub(source_y).min(height);
        for row in 0..available {
            let src_start = ((source_y + row) as usize * width) * 4;
            let dst_start = (row as usize * width) * 4;
            for col in 0..width {
                let s = src_start + col * 4;
                let d = dst_start + col * 4;
                let a = self.data[s + 3] as u16;
                if a == 255 {
                    out[d..d + 3].copy_from_slice(&self.data[s..s + 3]);
                } else if a > 0 {
                    for ch in 0..3 {
                        let src_c = self.data[s + ch] as u16;
                        let dst_c = out[d + ch] as u16;
                        let blended = (src_c * a + dst_c * (255 - a) + 127) / 255;
                        out[d + ch] = blended as u8;
                    }
                }
            }
        }

        Raster {
            width: self.width,
            height,
            data: out.into(),
        }
    }

    /// Splits into RGB bytes plus an alpha plane; the alpha plane is `None`
    /// when every pixel is opaque, so fully opaque rasters embed without a
    /// soft mask.
    pub(crate) fn split_rgb_alpha(&self) -> (Vec<u8>, Option<Vec<u8>>) {
        let pixels = (self.width as usize) * (self.height as usize);
        let mut rgb = Vec::with_capacity(pixels * 3);
        let mut alpha = Vec::with_capacity(pixels);
        let mut has_alpha = false;
        for px in self.data.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
            if px[3] != 255 {
                has_alpha = true;
            }
            alpha.push(px[3]);
        }
        (rgb, if has_alpha { Some(alpha) } else { None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_raster(width: u32, height: u32, rgba: [u8; 4]) -> Raster {
        let mut data = Vec::new();
        for _ in 0..(width * height) {
            data.extend_from_slice(&rgba);
        }
        Raster::from_rgba(width, height, data).unwrap()
    }

    #[test]
    fn from_rgba_validates_length() {
        assert!(Raster::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(Raster::from_rgba(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn band_copies_exact_source_rows() {
        // Rows 0..4 carry their row index in the red channel.
        let mut data = Vec::new();
        for row in 0..4u8 {
            for _ in 0..2 {
                data.extend_from_slice(&[row, 0, 0, 255]);
            }
        }
        let raster = Raster::from_rgba(2, 4, data).unwrap();
        let band = raster.band(1, 2, Color::WHITE);
        assert_eq!(band.width(), 2);
        assert_eq!(band.height(), 2);
        let row_stride = 2 * 4;
        // First output row is source row 1, second is source row 2.
        assert_eq!(band.rgba()[0], 1);
        assert_eq!(band.rgba()[4], 1);
        assert_eq!(band.rgba()[row_stride], 2);
        assert_eq!(band.rgba()[row_stride + 4], 2);
    }

    #[test]
    fn band_fills_rows_past_the_edge_with_background() {
        let raster = solid_raster(2, 2, [10, 10, 10, 255]);
        let band = raster.band(1, 3, Color::WHITE);
        assert_eq!(band.height(), 3);
        // Row 0 comes from the source, rows 1..3 are background.
        assert_eq!(band.rgba()[0], 10);
        assert_eq!(band.rgba()[2 * 4], 255);
        assert_eq!(band.rgba()[2 * 4 * 2], 255);
    }

    #[test]
    fn band_composites_translucent_source_over_background() {
        let raster = solid_raster(1, 1, [255, 0, 0, 128]);
        let band = raster.band(0, 1, Color::WHITE);
        let px = &band.rgba()[..4];
        // Half red over white: red stays high, green/blue land mid-range.
        assert_eq!(px[3], 255);
        assert!(px[0] > 200);
        assert!(px[1] > 100 && px[1] < 160);
    }

    #[test]
    fn split_detects_fully_opaque_rasters() {
        let opaque = solid_raster(2, 1, [1, 2, 3, 255]);
        let (rgb, alpha) = opaque.split_rgb_alpha();
        assert_eq!(rgb, vec![1, 2, 3, 1, 2, 3]);
        assert!(alpha.is_none());

        let translucent = solid_raster(1, 1, [1, 2, 3, 100]);
        let (_, alpha) = translucent.split_rgb_alpha();
        assert_eq!(alpha, Some(vec![100]));
    }

    #[test]
    fn from_pixmap_demultiplies() {
        let mut pixmap = Pixmap::new(1, 1).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba(0.5, 0.0, 0.0, 0.5).unwrap());
        let raster = Raster::from_pixmap(&pixmap);
        let px = &raster.rgba()[..4];
        assert_eq!(px[3], 128);
        // Straight red channel recovers to ~0.5 after demultiplication.
        assert!((px[0] as i16 - 128).abs() <= 2);
    }
}
