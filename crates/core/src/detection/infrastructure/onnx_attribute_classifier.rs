/// Age and gender classification using ONNX Runtime via `ort`.
///
/// Holds both attribute networks. They take identical 227x227
/// mean-subtracted BGR input, so one blob is built per crop and fed to
/// each session in turn.
use std::path::Path;

use crate::detection::domain::attribute_classifier::{AttributeClassifier, AttributeProbabilities};
use crate::shared::constants::{ATTRIBUTE_INPUT_SIZE, ATTRIBUTE_MEAN};
use crate::shared::frame::Frame;

use super::blob::mean_subtracted_blob;

pub struct OnnxAttributeClassifier {
    gender_session: ort::session::Session,
    age_session: ort::session::Session,
}

impl OnnxAttributeClassifier {
    pub fn new(
        gender_model_path: &Path,
        age_model_path: &Path,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let gender_session =
            ort::session::Session::builder()?.commit_from_file(gender_model_path)?;
        let age_session = ort::session::Session::builder()?.commit_from_file(age_model_path)?;
        Ok(Self {
            gender_session,
            age_session,
        })
    }
}

impl AttributeClassifier for OnnxAttributeClassifier {
    fn classify(
        &mut self,
        crop: &Frame,
    ) -> Result<AttributeProbabilities, Box<dyn std::error::Error>> {
        let blob = mean_subtracted_blob(crop, ATTRIBUTE_INPUT_SIZE, ATTRIBUTE_MEAN);

        let gender = run_probabilities::<2>(&mut self.gender_session, blob.clone(), "gender")?;
        let age = run_probabilities::<8>(&mut self.age_session, blob, "age")?;

        Ok(AttributeProbabilities { gender, age })
    }
}

/// Run one classifier session and extract its flat probability vector.
fn run_probabilities<const N: usize>(
    session: &mut ort::session::Session,
    blob: ndarray::Array4<f32>,
    name: &str,
) -> Result<[f32; N], Box<dyn std::error::Error>> {
    let input_value = ort::value::Tensor::from_array(blob)?;
    let outputs = session.run(ort::inputs![input_value])?;
    if outputs.len() == 0 {
        return Err(format!("{name} classifier produced no outputs").into());
    }

    let tensor = outputs[0].try_extract_array::<f32>()?;
    let data = tensor
        .as_slice()
        .ok_or_else(|| format!("Cannot get {name} tensor slice"))?;
    if data.len() < N {
        return Err(format!(
            "{name} classifier returned {} values, expected {N}",
            data.len()
        )
        .into());
    }

    let mut probs = [0.0f32; N];
    probs.copy_from_slice(&data[..N]);
    Ok(probs)
}
