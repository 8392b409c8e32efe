/// SSD face localizer using ONNX Runtime via `ort`.
///
/// Wraps the OpenCV ResNet-SSD face graph: 300x300 mean-subtracted BGR
/// input, `[1, 1, N, 7]` output where each row is
/// `(image_id, label, confidence, x1, y1, x2, y2)` with normalized
/// coordinates. Thresholding and coordinate decode happen here; any NMS is
/// whatever the network does internally.
use std::path::Path;

use crate::detection::domain::face_localizer::{FaceLocalizer, RawFace};
use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::{FACE_CONFIDENCE_THRESHOLD, FACE_INPUT_SIZE, FACE_MEAN};
use crate::shared::frame::Frame;

use super::blob::mean_subtracted_blob;

/// Values per detection row in the SSD output tensor.
const DETECTION_ROW_LEN: usize = 7;

pub struct OnnxFaceLocalizer {
    session: ort::session::Session,
    threshold: f32,
}

impl OnnxFaceLocalizer {
    /// Load the face-detection ONNX model with the default 0.7 threshold.
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_threshold(model_path, FACE_CONFIDENCE_THRESHOLD)
    }

    pub fn with_threshold(
        model_path: &Path,
        threshold: f32,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        Ok(Self { session, threshold })
    }
}

impl FaceLocalizer for OnnxFaceLocalizer {
    fn localize(&mut self, frame: &Frame) -> Result<Vec<RawFace>, Box<dyn std::error::Error>> {
        let input_tensor = mean_subtracted_blob(frame, FACE_INPUT_SIZE, FACE_MEAN);
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("face detector produced no outputs".into());
        }

        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape();
        // Expect [1, 1, N, 7]
        if shape.len() != 4 || shape[3] != DETECTION_ROW_LEN {
            return Err(format!("Unexpected detector output shape: {shape:?}").into());
        }
        let data = tensor.as_slice().ok_or("Cannot get detector tensor slice")?;

        Ok(decode_detections(
            data,
            self.threshold,
            frame.width(),
            frame.height(),
        ))
    }
}

/// Decode flattened `[N, 7]` SSD rows into pixel-space faces.
///
/// Keeps the network's native output order; the confidence threshold is
/// strict (`>`), so a detection at exactly the threshold is dropped.
fn decode_detections(data: &[f32], threshold: f32, frame_w: u32, frame_h: u32) -> Vec<RawFace> {
    let mut faces = Vec::new();
    for row in data.chunks_exact(DETECTION_ROW_LEN) {
        let confidence = row[2];
        if confidence > threshold {
            faces.push(RawFace {
                bbox: BoundingBox::from_normalized(row[3], row[4], row[5], row[6], frame_w, frame_h),
                confidence,
            });
        }
    }
    faces
}
