use crate::error::BandPressError;
use std::sync::Arc;

/// Font faces available to the preview painter.
///
/// The preview uses one family at two weights. Faces can be registered
/// explicitly from bytes, or discovered from the host system. A registry
/// with no faces is still usable: text then reserves layout space from
/// approximate metrics and paints nothing, which keeps capture dimensions
/// deterministic on fontless hosts.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    regular: Option<Arc<Vec<u8>>>,
    bold: Option<Arc<Vec<u8>>>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discovers a sans-serif regular and bold face from the system, when
    /// the host has any. Missing faces are tolerated.
    pub fn with_system_fonts() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        let mut registry = Self::new();
        registry.regular = query_face(&db, fontdb::Weight::NORMAL);
        registry.bold = query_face(&db, fontdb::Weight::BOLD);
        if registry.regular.is_none() && registry.bold.is_none() {
            log::warn!("no system sans-serif face found; preview text will not be painted");
        }
        registry
    }

    pub fn register_regular(&mut self, data: Vec<u8>) -> Result<(), BandPressError> {
        validate_face(&data)?;
        self.regular = Some(Arc::new(data));
        Ok(())
    }

    pub fn register_bold(&mut self, data: Vec<u8>) -> Result<(), BandPressError> {
        validate_face(&data)?;
        self.bold = Some(Arc::new(data));
        Ok(())
    }

    pub fn has_any_face(&self) -> bool {
        self.regular.is_some() || self.bold.is_some()
    }

    /// Face bytes for the requested weight, falling back to the other
    /// weight rather than dropping glyphs.
    pub(crate) fn face_data(&self, bold: bool) -> Option<&[u8]> {
        let (first, second) = if bold {
            (&self.bold, &self.regular)
        } else {
            (&self.regular, &self.bold)
        };
        first
            .as_deref()
            .or(second.as_deref())
            .map(|v| v.as_slice())
    }
}

fn validate_face(data: &[u8]) -> Result<(), BandPressError> {
    ttf_parser::Face::parse(data, 0)
        .map(|_| ())
        .map_err(|e| BandPressError::Font(format!("unusable font face: {}", e)))
}

fn query_face(db: &fontdb::Database, weight: fontdb::Weight) -> Option<Arc<Vec<u8>>> {
    let query = fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        weight,
        ..fontdb::Query::default()
    };
    let id = db.query(&query)?;
    db.with_face_data(id, |data, _index| Arc::new(data.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_reports_no_faces() {
        let registry = FontRegistry::new();
        assert!(!registry.has_any_face());
        assert!(registry.face_data(false).is_none());
        assert!(registry.face_data(true).is_none());
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let mut registry = FontRegistry::new();
        let err = registry.register_regular(vec![0u8; 16]).unwrap_err();
        assert!(matches!(err, BandPressError::Font(_)));
        assert!(!registry.has_any_face());
    }

    #[test]
    fn system_discovery_does_not_panic_on_fontless_hosts() {
        let registry = FontRegistry::with_system_fonts();
        // Either outcome is fine; the painter tolerates both.
        let _ = registry.has_any_face();
    }
}
