use chrono::Utc;

use crate::detection::domain::age_buckets::estimate_age;
use crate::detection::domain::attribute_classifier::AttributeClassifier;
use crate::detection::domain::face_detection::FaceDetection;
use crate::detection::domain::face_localizer::FaceLocalizer;
use crate::detection::domain::gender::Gender;
use crate::shared::frame::Frame;

/// Frame analysis pipeline: localize → crop → classify → assemble.
///
/// Strictly sequential per invocation; the loaded networks are the only
/// state and are never mutated by inference, so one use case can serve
/// any number of consecutive frames.
pub struct AnalyzeFrameUseCase {
    localizer: Box<dyn FaceLocalizer>,
    classifier: Box<dyn AttributeClassifier>,
}

impl AnalyzeFrameUseCase {
    pub fn new(
        localizer: Box<dyn FaceLocalizer>,
        classifier: Box<dyn AttributeClassifier>,
    ) -> Self {
        Self {
            localizer,
            classifier,
        }
    }

    /// Analyzes a frame at its native resolution.
    pub fn execute(
        &mut self,
        frame: &Frame,
    ) -> Result<Vec<FaceDetection>, Box<dyn std::error::Error>> {
        self.analyze(frame, 1.0)
    }

    /// Analyzes a frame, downscaling first when either side exceeds
    /// `max_dim` (aspect ratio preserved). Reported boxes are always in
    /// original-frame coordinates.
    pub fn execute_bounded(
        &mut self,
        frame: &Frame,
        max_dim: u32,
    ) -> Result<Vec<FaceDetection>, Box<dyn std::error::Error>> {
        let scale = (max_dim as f64 / frame.width() as f64)
            .min(max_dim as f64 / frame.height() as f64);
        if scale >= 1.0 {
            return self.analyze(frame, 1.0);
        }

        let new_w = (frame.width() as f64 * scale).round() as u32;
        let new_h = (frame.height() as f64 * scale).round() as u32;
        log::debug!(
            "Downscaling {}x{} frame to {new_w}x{new_h} for detection",
            frame.width(),
            frame.height()
        );
        let small = frame.resize(new_w, new_h);
        self.analyze(&small, scale)
    }

    fn analyze(
        &mut self,
        frame: &Frame,
        scale: f64,
    ) -> Result<Vec<FaceDetection>, Box<dyn std::error::Error>> {
        let faces = self.localizer.localize(frame)?;
        let timestamp = Utc::now();

        let mut detections = Vec::with_capacity(faces.len());
        for raw in faces {
            // Degenerate crop (box outside the frame after clamping): skip
            // this face, never the whole frame.
            let Some(crop) = frame.crop(&raw.bbox) else {
                log::debug!("Skipping face with empty crop at {:?}", raw.bbox);
                continue;
            };

            let probs = self.classifier.classify(&crop)?;
            let (gender, gender_confidence) = Gender::decode(&probs.gender);
            let age = estimate_age(&probs.age);

            let bounding_box = if scale < 1.0 {
                raw.bbox.scale_up(scale)
            } else {
                raw.bbox
            };

            detections.push(FaceDetection {
                bounding_box,
                face_confidence: raw.confidence,
                gender,
                gender_confidence,
                age: age.age,
                age_confidence: age.confidence,
                age_bucket: age.bucket,
                timestamp,
            });
        }

        Ok(detections)
    }
}
