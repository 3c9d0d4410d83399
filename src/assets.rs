use crate::error::BandPressError;
use base64::Engine;
use std::path::Path;
use tiny_skia::Pixmap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Font,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Font => "font",
        }
    }
}

/// A named binary resource the preview scene can reference: the brand logo,
/// a status badge, or a font face.
#[derive(Debug, Clone)]
pub struct Asset {
    pub name: String,
    pub kind: AssetKind,
    pub data: Vec<u8>,
    /// Where the bytes came from, for diagnostics. Remote URLs are recorded
    /// here with empty data until the caller resolves them.
    pub source: Option<String>,
}

impl Asset {
    pub fn new(name: String, kind: AssetKind, data: Vec<u8>, source: Option<String>) -> Self {
        Self {
            name,
            kind,
            data,
            source,
        }
    }

    /// True when the asset only names a remote source and carries no bytes.
    pub fn is_unresolved(&self) -> bool {
        self.data.is_empty() && self.source.as_deref().is_some_and(is_remote_source)
    }
}

fn is_remote_source(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[derive(Debug, Clone, Default)]
pub struct AssetBundle {
    pub assets: Vec<Asset>,
}

impl AssetBundle {
    pub fn add(&mut self, asset: Asset) {
        self.assets.push(asset);
    }

    pub fn add_image_file(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<(), BandPressError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        self.assets.push(Asset::new(
            name.into(),
            AssetKind::Image,
            data,
            Some(path.display().to_string()),
        ));
        Ok(())
    }

    pub fn add_image_data_uri(
        &mut self,
        name: impl Into<String>,
        uri: &str,
    ) -> Result<(), BandPressError> {
        let (mime, data) = parse_data_uri(uri)
            .ok_or_else(|| BandPressError::Asset("malformed data URI".to_string()))?;
        if !mime.contains("image") {
            return Err(BandPressError::Asset(format!(
                "data URI is not an image: {}",
                mime
            )));
        }
        self.assets
            .push(Asset::new(name.into(), AssetKind::Image, data, None));
        Ok(())
    }

    /// Records a remote image by URL without fetching it. The capture stage
    /// refuses to mount unresolved remote assets unless the image policy
    /// allows skipping them.
    pub fn add_image_url(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.assets.push(Asset::new(
            name.into(),
            AssetKind::Image,
            Vec::new(),
            Some(url.into()),
        ));
    }

    pub fn image(&self, name: &str) -> Option<&Asset> {
        self.assets
            .iter()
            .find(|asset| asset.kind == AssetKind::Image && asset.name == name)
    }

    pub fn font_assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets
            .iter()
            .filter(|asset| asset.kind == AssetKind::Font)
    }
}

pub(crate) fn parse_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    if !uri.starts_with("data:") {
        return None;
    }
    let parts: Vec<&str> = uri.splitn(2, ',').collect();
    if parts.len() != 2 {
        return None;
    }
    let header = parts[0];
    let data_part = parts[1];
    let mime = header
        .trim_start_matches("data:")
        .split(';')
        .next()
        .unwrap_or("application/octet-stream")
        .to_string();
    let data = if header.contains("base64") {
        base64::engine::general_purpose::STANDARD
            .decode(data_part)
            .ok()?
    } else {
        data_part.as_bytes().to_vec()
    };
    Some((mime, data))
}

/// Decodes png/jpeg bytes into a premultiplied-alpha pixmap.
pub(crate) fn decode_image_pixmap(data: &[u8]) -> Result<Pixmap, BandPressError> {
    let format = image::guess_format(data)
        .map_err(|e| BandPressError::Asset(format!("unrecognized image format: {}", e)))?;
    let decoded = image::load_from_memory_with_format(data, format)
        .map_err(|e| BandPressError::Asset(format!("image decode failed: {}", e)))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| BandPressError::Asset("image has zero size".to_string()))?;
    let src = rgba.as_raw();
    let dst = pixmap.data_mut();
    for (src_px, dst_px) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        let a = src_px[3];
        dst_px[0] = premul_u8(src_px[0], a);
        dst_px[1] = premul_u8(src_px[1], a);
        dst_px[2] = premul_u8(src_px[2], a);
        dst_px[3] = a;
    }
    Ok(pixmap)
}

fn premul_u8(channel: u8, alpha: u8) -> u8 {
    let prod = (channel as u16) * (alpha as u16) + 127;
    ((prod + (prod >> 8)) >> 8) as u8
}
