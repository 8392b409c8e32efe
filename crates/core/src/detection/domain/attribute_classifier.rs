use crate::shared::frame::Frame;

/// Raw output of the two attribute networks for one face crop.
///
/// Both vectors follow the trained output orders: gender index 0 = Male,
/// 1 = Female; age indices align with
/// [`crate::detection::domain::age_buckets::AGE_BUCKETS`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttributeProbabilities {
    pub gender: [f32; 2],
    pub age: [f32; 8],
}

/// Domain interface for age/gender classification over a face crop.
///
/// The two networks take identical preprocessed input, so a single call
/// covers both and implementations can build the input tensor once.
/// Decoding (argmax gender, weighted-midpoint age) stays in the domain,
/// independent of the inference runtime.
pub trait AttributeClassifier: Send {
    fn classify(
        &mut self,
        crop: &Frame,
    ) -> Result<AttributeProbabilities, Box<dyn std::error::Error>>;
}
