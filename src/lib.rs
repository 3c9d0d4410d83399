mod assets;
mod capture;
mod compositor;
mod error;
mod export;
mod fonts;
mod geometry;
mod invoice;
mod paint;
mod pdf;
mod raster;
mod scene;
mod slicer;
mod template;
mod types;
mod validate;

pub use assets::{Asset, AssetBundle, AssetKind};
pub use capture::{BandCapture, CaptureConfig, ImagePolicy, StagedScene};
pub use compositor::{OutputPage, Placement};
pub use error::BandPressError;
pub use export::{DEFAULT_FILE_NAME, ExportOptions, Exporter, paginate};
pub use fonts::FontRegistry;
pub use geometry::{ContentRange, PageGeometry};
pub use invoice::{
    InvoiceData, InvoiceItem, InvoiceStatus, Party, PaymentInfo, ProjectDetails, Totals,
    calc_totals, format_date_dmy, format_inr,
};
pub use raster::Raster;
pub use scene::{
    Band, DividerNode, EdgeInsets, Fill, FontWeight, ImageNode, Node, RowCell, RowNode, Scene,
    TableColumn, TableNode, TextAlign, TextNode,
};
pub use slicer::{BandSlicer, PageBand};
pub use template::{
    BRAND_BAR_HEIGHT_PX, LOGO_ASSET, PREVIEW_MIN_HEIGHT_PX, PREVIEW_WIDTH_PX, build_invoice_scene,
};
pub use types::{Color, Pt, Rect, Size};
pub use validate::{FieldError, validate};
