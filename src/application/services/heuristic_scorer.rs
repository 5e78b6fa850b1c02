use crate::domain::{FeatureVector, Label, Verdict};

/// Empirical decision thresholds for the rule-based scorer.
///
/// The defaults are tuning constants carried over from production traffic;
/// changing them changes classification behavior for existing callers.
#[derive(Debug, Clone)]
pub struct HeuristicThresholds {
    /// Greetings longer than this lean machine.
    pub long_greeting_secs: f32,
    /// Per-frame energy deviation below this reads as a flat, scripted
    /// recording.
    pub flat_energy_variation: f32,
    /// Zero-crossing-rate deviation above this reads as live speech.
    pub lively_zcr_std: f32,
    /// Spectral centroid deviation below this reads as a machine's constant
    /// timbre.
    pub flat_centroid_std: f32,
    /// Open interval of typical human greeting durations.
    pub typical_greeting_secs: (f32, f32),
    /// Durations beyond this are almost always voicemail prompts.
    pub very_long_secs: f32,
}

impl Default for HeuristicThresholds {
    fn default() -> Self {
        Self {
            long_greeting_secs: 3.0,
            flat_energy_variation: 0.01,
            lively_zcr_std: 0.05,
            flat_centroid_std: 100.0,
            typical_greeting_secs: (2.0, 5.0),
            very_long_secs: 8.0,
        }
    }
}

/// Fixed-weight additive rule system over a [`FeatureVector`].
///
/// Starts from a neutral 0.5 and applies every matching adjustment; the
/// rules are independent, not mutually exclusive. The clamped score maps to
/// a label at the 0.5 midpoint and to a confidence by distance from it.
pub struct HeuristicScorer {
    thresholds: HeuristicThresholds,
}

impl HeuristicScorer {
    pub fn new(thresholds: HeuristicThresholds) -> Self {
        Self { thresholds }
    }

    pub fn score(&self, features: &FeatureVector) -> Verdict {
        let t = &self.thresholds;
        let mut score = 0.5f32;

        if features.duration > t.long_greeting_secs {
            score -= 0.2;
        }
        if features.energy_variation < t.flat_energy_variation {
            score -= 0.2;
        }
        if features.zcr_std > t.lively_zcr_std {
            score += 0.1;
        }
        if features.spectral_centroid_std < t.flat_centroid_std {
            score -= 0.1;
        }
        if features.duration > t.typical_greeting_secs.0
            && features.duration < t.typical_greeting_secs.1
        {
            score += 0.1;
        }
        if features.duration > t.very_long_secs {
            score -= 0.3;
        }

        let score = score.clamp(0.0, 1.0);
        let label = if score > 0.5 {
            Label::Human
        } else {
            Label::Machine
        };

        Verdict {
            label,
            confidence: (score - 0.5).abs() * 2.0,
        }
    }
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self::new(HeuristicThresholds::default())
    }
}
