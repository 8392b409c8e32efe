use std::fmt;

/// Gender label as emitted by the gender network.
///
/// Index order (0 = Male, 1 = Female) is contractually tied to the trained
/// model's output layout and must not be reordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    /// Argmax decode of the raw two-class probability vector.
    ///
    /// Returns the label and its probability (the classifier's confidence).
    pub fn decode(probs: &[f32; 2]) -> (Gender, f32) {
        if probs[0] >= probs[1] {
            (Gender::Male, probs[0])
        } else {
            (Gender::Female, probs[1])
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
