//! Final PDF assembly with lopdf.
//!
//! Each page is a content stream of image placements over shared XObject
//! resources. Identical rasters (the header and footer stamped on every
//! page) embed once and are referenced from every page; translucent rasters
//! carry their alpha plane as an SMask.

use crate::compositor::OutputPage;
use crate::error::BandPressError;
use crate::types::Size;
use lopdf::{Document as LoDocument, Object as LoObject, ObjectId as LoObjectId, Stream as LoStream, dictionary};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::Cursor;

fn lopdf_err(err: std::io::Error) -> BandPressError {
    BandPressError::Pdf(err.to_string())
}

struct EmbeddedImage {
    id: LoObjectId,
    name: String,
}

struct ImageTable {
    by_digest: HashMap<[u8; 32], EmbeddedImage>,
    next_index: usize,
}

impl ImageTable {
    fn new() -> Self {
        Self {
            by_digest: HashMap::new(),
            next_index: 0,
        }
    }

    /// Embeds the raster once per distinct pixel content and returns the
    /// resource name and object id to reference it by.
    fn embed(
        &mut self,
        doc: &mut LoDocument,
        raster: &crate::raster::Raster,
    ) -> (LoObjectId, String) {
        let mut hasher = Sha256::new();
        hasher.update(raster.width().to_le_bytes());
        hasher.update(raster.height().to_le_bytes());
        hasher.update(raster.rgba());
        let digest: [u8; 32] = hasher.finalize().into();

        if let Some(existing) = self.by_digest.get(&digest) {
            return (existing.id, existing.name.clone());
        }

        let (rgb, alpha) = raster.split_rgb_alpha();
        let smask_id = alpha.map(|plane| {
            doc.add_object(LoStream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => raster.width() as i64,
                    "Height" => raster.height() as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                plane,
            ))
        });

        let mut image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => raster.width() as i64,
            "Height" => raster.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        if let Some(smask_id) = smask_id {
            image_dict.set("SMask", LoObject::Reference(smask_id));
        }
        let id = doc.add_object(LoStream::new(image_dict, rgb));

        self.next_index += 1;
        let name = format!("Im{}", self.next_index);
        self.by_digest.insert(
            digest,
            EmbeddedImage {
                id,
                name: name.clone(),
            },
        );
        (id, name)
    }
}

/// Builds the whole document in memory. Pages arrive in slice order and are
/// written in that order; nothing is reordered.
pub(crate) fn assemble(pages: &[OutputPage], page_size: Size) -> Result<Vec<u8>, BandPressError> {
    if pages.is_empty() {
        return Err(BandPressError::Pdf(
            "refusing to write a zero-page document".to_string(),
        ));
    }

    let page_width = page_size.width.to_f32();
    let page_height = page_size.height.to_f32();

    let mut doc = LoDocument::with_version("1.7");
    let pages_id = doc.new_object_id();
    let mut images = ImageTable::new();
    let mut kids: Vec<LoObject> = Vec::with_capacity(pages.len());

    for page in pages {
        let mut xobjects = lopdf::Dictionary::new();
        let mut content = String::new();
        for placement in page.placements() {
            let (id, name) = images.embed(&mut doc, &placement.raster);
            xobjects.set(name.as_bytes().to_vec(), LoObject::Reference(id));

            let w = placement.rect.width.to_f32();
            let h = placement.rect.height.to_f32();
            let x = placement.rect.x.to_f32();
            // Placements are top-down; PDF user space is bottom-up.
            let y = page_height - placement.rect.y.to_f32() - h;
            content.push_str(&format!(
                "q\n{:.3} 0 0 {:.3} {:.3} {:.3} cm\n/{} Do\nQ\n",
                w, h, x, y, name
            ));
        }

        let content_id = doc.add_object(LoStream::new(
            lopdf::Dictionary::new(),
            content.into_bytes(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => LoObject::Reference(pages_id),
            "MediaBox" => vec![0.0.into(), 0.0.into(), page_width.into(), page_height.into()],
            "Contents" => LoObject::Reference(content_id),
            "Resources" => dictionary! {
                "XObject" => LoObject::Dictionary(xobjects),
            },
        });
        kids.push(LoObject::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        LoObject::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => LoObject::Reference(pages_id),
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut cursor = Cursor::new(Vec::new());
    doc.save_to(&mut cursor).map_err(lopdf_err)?;
    log::debug!(
        "document assembled: {} page(s), {} byte(s)",
        page_count,
        cursor.get_ref().len()
    );
    Ok(cursor.into_inner())
}
