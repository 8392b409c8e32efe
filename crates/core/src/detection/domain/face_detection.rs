use chrono::{DateTime, Utc};

use crate::detection::domain::age_buckets::{AgeBucket, AGE_BUCKETS};
use crate::detection::domain::gender::Gender;
use crate::shared::bounding_box::BoundingBox;

/// One fully-analyzed face: box, gender, and interpolated age, stamped at
/// capture time. Immutable after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceDetection {
    /// Always in original-frame pixel coordinates, even when detection ran
    /// on a downscaled copy.
    pub bounding_box: BoundingBox,
    pub face_confidence: f32,
    pub gender: Gender,
    pub gender_confidence: f32,
    /// Weighted-midpoint age estimate.
    pub age: u32,
    pub age_confidence: f32,
    /// Argmax bucket index into [`AGE_BUCKETS`], for range-label display.
    pub age_bucket: usize,
    pub timestamp: DateTime<Utc>,
}

impl FaceDetection {
    pub fn age_bucket(&self) -> &'static AgeBucket {
        &AGE_BUCKETS[self.age_bucket]
    }

    /// Overlay label in the desktop loop's `"<Gender>,<AgeRange>"` form.
    pub fn overlay_label(&self) -> String {
        format!("{},{}", self.gender, self.age_bucket().label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection() -> FaceDetection {
        FaceDetection {
            bounding_box: BoundingBox { x1: 10, y1: 20, x2: 110, y2: 140 },
            face_confidence: 0.92,
            gender: Gender::Female,
            gender_confidence: 0.85,
            age: 29,
            age_confidence: 0.6,
            age_bucket: 4,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_age_bucket_lookup() {
        assert_eq!(detection().age_bucket().label, "(25-32)");
    }

    #[test]
    fn test_overlay_label_format() {
        assert_eq!(detection().overlay_label(), "Female,(25-32)");
    }
}
