/// One of the eight age-range classes the age network was trained on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgeBucket {
    pub label: &'static str,
    pub min: u32,
    pub max: u32,
}

impl AgeBucket {
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) as f64 / 2.0
    }
}

/// The age network's output classes, in trained order.
///
/// Order is load-bearing: index i of the classifier's probability vector
/// must align with bucket i. The table is contractually tied to the
/// specific model file and is not independently changeable.
pub const AGE_BUCKETS: [AgeBucket; 8] = [
    AgeBucket { label: "(0-2)", min: 0, max: 2 },
    AgeBucket { label: "(4-6)", min: 4, max: 6 },
    AgeBucket { label: "(8-12)", min: 8, max: 12 },
    AgeBucket { label: "(15-20)", min: 15, max: 20 },
    AgeBucket { label: "(25-32)", min: 25, max: 32 },
    AgeBucket { label: "(38-43)", min: 38, max: 43 },
    AgeBucket { label: "(48-53)", min: 48, max: 53 },
    AgeBucket { label: "(60-100)", min: 60, max: 100 },
];

/// Decoded age prediction for one face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgeEstimate {
    /// Weighted-midpoint age, rounded to the nearest integer.
    pub age: u32,
    /// Max element of the probability vector (plain classifier confidence,
    /// independent of the weighted estimate).
    pub confidence: f32,
    /// Index of the argmax bucket, for range-label display.
    pub bucket: usize,
}

impl AgeEstimate {
    pub fn bucket_label(&self) -> &'static str {
        AGE_BUCKETS[self.bucket].label
    }
}

/// Blends all eight class probabilities into a single integer age.
///
/// Each bucket contributes its midpoint weighted by its share of the total
/// probability mass, which gives a smoother estimate than reporting the raw
/// argmax range. Rounding is `f64::round` (half away from zero).
///
/// A zero-sum probability vector cannot be normalized; instead of dividing
/// by zero the estimate falls back to the argmax bucket's rounded midpoint.
pub fn estimate_age(probs: &[f32; 8]) -> AgeEstimate {
    let argmax = probs
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let confidence = probs[argmax];

    let total: f64 = probs.iter().map(|&p| p as f64).sum();
    let weighted = if total > 0.0 {
        probs
            .iter()
            .zip(AGE_BUCKETS.iter())
            .map(|(&p, bucket)| bucket.midpoint() * (p as f64 / total))
            .sum()
    } else {
        AGE_BUCKETS[argmax].midpoint()
    };

    AgeEstimate {
        age: weighted.round() as u32,
        confidence,
        bucket: argmax,
    }
}
