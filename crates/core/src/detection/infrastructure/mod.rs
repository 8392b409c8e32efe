pub mod blob;
pub mod onnx_attribute_classifier;
pub mod onnx_face_localizer;
