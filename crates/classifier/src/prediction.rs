/// Most likely class for one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub class_index: usize,
    /// Probability of `class_index`, in [0, 1].
    pub confidence: f32,
    /// Gap between the top two probabilities. Equals `confidence` for a
    /// single-class model.
    pub margin: f32,
}

impl Prediction {
    pub fn new(class_index: usize, confidence: f32) -> Self {
        Self {
            class_index,
            confidence,
            margin: confidence,
        }
    }

    /// Pick the arg-max of a probability distribution.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_probabilities(probabilities: &[f32]) -> Option<Self> {
        let mut best: Option<(usize, f32)> = None;
        let mut runner_up = 0.0f32;

        for (i, &p) in probabilities.iter().enumerate() {
            match best {
                Some((_, top)) if p <= top => runner_up = runner_up.max(p),
                Some((_, top)) => {
                    runner_up = top;
                    best = Some((i, p));
                }
                None => best = Some((i, p)),
            }
        }

        best.map(|(class_index, confidence)| Self {
            class_index,
            confidence: confidence.clamp(0.0, 1.0),
            margin: (confidence - runner_up).clamp(0.0, 1.0),
        })
    }

    /// Softmax over raw model outputs, then arg-max.
    pub fn from_logits(logits: &[f32]) -> Option<Self> {
        Self::from_probabilities(&softmax(logits))
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_probabilities() {
        let p = Prediction::from_probabilities(&[0.1, 0.7, 0.2]).unwrap();
        assert_eq!(p.class_index, 1);
        assert!((p.confidence - 0.7).abs() < 1e-6);
        assert!((p.margin - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_runner_up_before_best() {
        let p = Prediction::from_probabilities(&[0.3, 0.1, 0.6]).unwrap();
        assert_eq!(p.class_index, 2);
        assert!((p.margin - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_empty() {
        assert!(Prediction::from_probabilities(&[]).is_none());
        assert!(Prediction::from_logits(&[]).is_none());
    }

    #[test]
    fn test_single_class() {
        let p = Prediction::from_logits(&[3.0]).unwrap();
        assert_eq!(p.class_index, 0);
        assert!((p.confidence - 1.0).abs() < 1e-6);
        assert!((p.margin - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_logits_is_normalized() {
        let p = Prediction::from_logits(&[1.0, 1.0, 1.0, 1.0]).unwrap();
        assert_eq!(p.class_index, 0);
        assert!((p.confidence - 0.25).abs() < 1e-6);
        assert!(p.margin.abs() < 1e-6);
    }

    #[test]
    fn test_softmax_large_logits() {
        let p = Prediction::from_logits(&[1000.0, 0.0]).unwrap();
        assert_eq!(p.class_index, 0);
        assert!(p.confidence > 0.99);
    }
}
