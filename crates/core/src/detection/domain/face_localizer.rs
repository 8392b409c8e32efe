use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// One face found by the localizer, in the network's native output order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawFace {
    pub bbox: BoundingBox,
    pub confidence: f32,
}

/// Domain interface for face localization.
///
/// Implementations hold an inference session, hence `&mut self`.
pub trait FaceLocalizer: Send {
    fn localize(&mut self, frame: &Frame) -> Result<Vec<RawFace>, Box<dyn std::error::Error>>;
}
