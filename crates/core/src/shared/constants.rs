pub const FACE_MODEL_NAME: &str = "opencv_face_detector.onnx";
pub const FACE_MODEL_URL: &str =
    "https://github.com/agelens/agelens/releases/download/v0.1.0/opencv_face_detector.onnx";

pub const AGE_MODEL_NAME: &str = "age_net.onnx";
pub const AGE_MODEL_URL: &str =
    "https://github.com/agelens/agelens/releases/download/v0.1.0/age_net.onnx";

pub const GENDER_MODEL_NAME: &str = "gender_net.onnx";
pub const GENDER_MODEL_URL: &str =
    "https://github.com/agelens/agelens/releases/download/v0.1.0/gender_net.onnx";

/// Detections at or below this face confidence are discarded (strict `>`).
pub const FACE_CONFIDENCE_THRESHOLD: f32 = 0.7;

/// SSD face detector input resolution.
pub const FACE_INPUT_SIZE: u32 = 300;

/// Per-channel means for the face detector blob, BGR order.
pub const FACE_MEAN: [f32; 3] = [104.0, 117.0, 123.0];

/// Age/gender classifier input resolution.
pub const ATTRIBUTE_INPUT_SIZE: u32 = 227;

/// Per-channel means for the age/gender blob, BGR order. These values are
/// part of the trained models' input contract and must not be changed
/// independently of the model files.
pub const ATTRIBUTE_MEAN: [f32; 3] = [78.4263377603, 87.7689143744, 114.895847746];

/// Frames larger than this on either side are downscaled before detection.
pub const MAX_DETECT_DIMENSION: u32 = 640;

/// Most recent detections retained by the in-memory history ring.
pub const HISTORY_CAPACITY: usize = 100;
