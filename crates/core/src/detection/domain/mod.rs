pub mod age_buckets;
pub mod attribute_classifier;
pub mod face_detection;
pub mod face_localizer;
pub mod gender;
