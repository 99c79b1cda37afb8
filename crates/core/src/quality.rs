use serde::Serialize;

use crate::api::ValidationResult;

/// Coarse bucket derived from the composite CodeBLEU score
///
/// Bands are half-open intervals with inclusive lower bounds:
/// `[0.8, ∞)` Good, `[0.6, 0.8)` Fair, `[0.4, 0.6)` Weak, everything below Poor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityBand {
    Poor,
    Weak,
    Fair,
    Good,
}

impl QualityBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            QualityBand::Good
        } else if score >= 0.6 {
            QualityBand::Fair
        } else if score >= 0.4 {
            QualityBand::Weak
        } else {
            // NaN lands here as well
            QualityBand::Poor
        }
    }

    /// 1 (Poor) through 4 (Good)
    pub fn rank(self) -> u8 {
        match self {
            QualityBand::Poor => 1,
            QualityBand::Weak => 2,
            QualityBand::Fair => 3,
            QualityBand::Good => 4,
        }
    }

    /// Badge background color
    pub fn color(self) -> &'static str {
        match self {
            QualityBand::Good => "rgba(16, 185, 129, 0.3)",
            QualityBand::Fair => "rgba(59, 130, 246, 0.3)",
            QualityBand::Weak => "rgba(251, 191, 36, 0.3)",
            QualityBand::Poor => "rgba(239, 68, 68, 0.3)",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityBand::Good => "good",
            QualityBand::Fair => "fair",
            QualityBand::Weak => "weak",
            QualityBand::Poor => "poor",
        }
    }
}

/// A single component score rendered as a progress bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBar {
    pub label: &'static str,
    pub value: f64,
    /// Bar width in percent, clamped to `0..=100`
    pub width_percent: f64,
}

impl ScoreBar {
    fn new(label: &'static str, value: f64) -> Self {
        let width = if value.is_nan() { 0.0 } else { value * 100.0 };
        Self {
            label,
            value,
            width_percent: width.clamp(0.0, 100.0),
        }
    }
}

/// Everything the presentation layer needs to render a validation result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationView {
    pub codebleu: f64,
    pub weighted_ngram_match: f64,
    pub quality: String,
    pub band: QualityBand,
    pub color: &'static str,
    pub component_bars: Vec<ScoreBar>,
    pub recommendations: Vec<String>,
}

/// Project a validation result into display state
pub fn project_validation(result: &ValidationResult) -> ValidationView {
    let band = QualityBand::from_score(result.codebleu);

    ValidationView {
        codebleu: result.codebleu,
        weighted_ngram_match: result.weighted_ngram_match,
        quality: result.quality.clone(),
        band,
        color: band.color(),
        component_bars: vec![
            ScoreBar::new("N-gram match", result.ngram_match),
            ScoreBar::new("Syntax match", result.syntax_match),
            ScoreBar::new("Dataflow match", result.dataflow_match),
        ],
        recommendations: result.recommendations.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_score(codebleu: f64) -> ValidationResult {
        ValidationResult {
            codebleu,
            ngram_match: 0.5,
            weighted_ngram_match: 0.6,
            syntax_match: 1.0,
            dataflow_match: 0.25,
            quality: "Fair - Significant Improvements Needed".to_string(),
            recommendations: vec![
                "Improve token-level similarity with reference code.".to_string(),
                "Check semantic logic and variable usage consistency.".to_string(),
            ],
        }
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(QualityBand::from_score(0.8).rank(), 4);
        assert_eq!(QualityBand::from_score(0.79999).rank(), 3);
        assert_eq!(QualityBand::from_score(0.6).rank(), 3);
        assert_eq!(QualityBand::from_score(0.59999).rank(), 2);
        assert_eq!(QualityBand::from_score(0.4).rank(), 2);
        assert_eq!(QualityBand::from_score(0.39999).rank(), 1);
        assert_eq!(QualityBand::from_score(0.0).rank(), 1);
    }

    #[test]
    fn test_band_outside_unit_interval() {
        assert_eq!(QualityBand::from_score(1.5), QualityBand::Good);
        assert_eq!(QualityBand::from_score(-0.1), QualityBand::Poor);
        assert_eq!(QualityBand::from_score(f64::NAN), QualityBand::Poor);
    }

    #[test]
    fn test_band_colors_are_distinct() {
        let colors = [
            QualityBand::Good.color(),
            QualityBand::Fair.color(),
            QualityBand::Weak.color(),
            QualityBand::Poor.color(),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(QualityBand::Good.color(), "rgba(16, 185, 129, 0.3)");
    }

    #[test]
    fn test_project_validation_top_band() {
        let view = project_validation(&result_with_score(0.92));
        assert_eq!(view.band, QualityBand::Good);
        assert_eq!(view.color, "rgba(16, 185, 129, 0.3)");
    }

    #[test]
    fn test_project_validation_bars_and_recommendations() {
        let view = project_validation(&result_with_score(0.45));

        let labels: Vec<_> = view.component_bars.iter().map(|bar| bar.label).collect();
        assert_eq!(labels, vec!["N-gram match", "Syntax match", "Dataflow match"]);

        let widths: Vec<_> = view
            .component_bars
            .iter()
            .map(|bar| bar.width_percent)
            .collect();
        assert_eq!(widths, vec![50.0, 100.0, 25.0]);

        assert_eq!(view.recommendations.len(), 2);
        assert!(view.recommendations[0].starts_with("Improve token-level"));
    }

    #[test]
    fn test_score_bar_width_is_clamped() {
        assert_eq!(ScoreBar::new("x", 1.7).width_percent, 100.0);
        assert_eq!(ScoreBar::new("x", -0.2).width_percent, 0.0);
        assert_eq!(ScoreBar::new("x", f64::NAN).width_percent, 0.0);
    }
}
