//! Detection results produced at the end of a pipeline run.

use serde::Serialize;

/// Category of a shopping-item defect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum DefectKind {
    WrongItem = 0,
    WrongQuantity = 1,
    ExpiredOrQuality = 2,
    /// Checkout process failure such as a skipped scan or a barcode switch.
    #[default]
    ProcessError = 3,
}

impl DefectKind {
    /// Model class id conventionally associated with this kind.
    pub fn class_id(self) -> i64 {
        self as u8 as i64
    }

    pub fn label(self) -> &'static str {
        match self {
            DefectKind::WrongItem => "WrongItem",
            DefectKind::WrongQuantity => "WrongQuantity",
            DefectKind::ExpiredOrQuality => "ExpiredOrQuality",
            DefectKind::ProcessError => "ProcessError",
        }
    }
}

/// Axis-aligned box, either normalized or in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl BBox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Single detected defect.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Defect {
    pub kind: DefectKind,
    pub bbox: BBox,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Defect {
    pub fn new(kind: DefectKind, bbox: BBox, confidence: f32) -> Self {
        Self {
            kind,
            bbox,
            confidence,
            product_id: None,
            category: None,
        }
    }

    pub fn with_product_id(mut self, product_id: u64) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Terminal output of a pipeline run.
///
/// `camera_id` and `customer_id` are attached by the runner layer after the
/// run, never by a stage.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DefectResult {
    pub frame_id: u64,
    pub defects: Vec<Defect>,
    pub metadata: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

impl DefectResult {
    pub fn new(frame_id: u64, defects: Vec<Defect>) -> Self {
        Self {
            frame_id,
            defects,
            ..Self::default()
        }
    }
}
