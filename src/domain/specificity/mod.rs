//! Specificity analysis of raw generation commands.
//!
//! Maps a user command plus its parsed descriptors into a specificity score
//! and a creativity temperature. A vague "make me some dresses" should run
//! hot (explore the style space); "a sporty chic cashmere fitted dress"
//! should run cold (exploit what the user asked for). Pure domain service,
//! no external state.

mod terms;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::foundation::ValidationError;

use terms::{is_technical_term, PRECISE_CUES, VAGUE_CUES};

// Score terms are accumulated in integer tenths and divided once at the
// end, so sums land exactly on threshold values instead of one ULP off.

/// Maximum contribution of explicit descriptors, in tenths.
const DESCRIPTOR_CAP_TENTHS: i32 = 6;

/// Contribution per distinct explicit descriptor, in tenths.
const DESCRIPTOR_STEP_TENTHS: i32 = 2;

/// Contribution of language-precision cues, in tenths.
const LANGUAGE_CUE_TENTHS: i32 = 3;

/// Contribution of technical fabric/construction terms, in tenths.
const TECHNICAL_BONUS_TENTHS: i32 = 2;

/// What kind of constraint a parsed descriptor expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorKind {
    Color,
    Style,
    Fabric,
    Modifier,
}

/// One descriptor extracted from the user command by upstream parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub kind: DescriptorKind,
    pub value: String,
}

impl Descriptor {
    pub fn new(kind: DescriptorKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// How the request should be treated downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestMode {
    /// Loose request; bias selection toward exploration.
    Exploratory,
    /// Tight request; bias selection toward exploitation.
    Specific,
}

/// Result of analyzing one generation command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecificityReport {
    /// How precisely the command constrains attribute choices, in [0, 1].
    pub score: f64,
    /// Exploration temperature for the bandit draw.
    pub temperature: f64,
    /// Exploratory vs. specific treatment.
    pub mode: RequestMode,
}

/// Analyzer parameters, sourced from [`crate::config::SpecificityConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    min: f64,
    max: f64,
    specific_threshold: f64,
}

impl TemperatureRange {
    /// Creates a range; `min` must be positive and below `max`.
    pub fn new(min: f64, max: f64, specific_threshold: f64) -> Result<Self, ValidationError> {
        if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min >= max {
            return Err(ValidationError::invalid_format(
                "temperature_range",
                format!("min {} must be positive and below max {}", min, max),
            ));
        }
        if !(0.0..=1.0).contains(&specific_threshold) {
            return Err(ValidationError::out_of_range(
                "specific_threshold",
                0.0,
                1.0,
                specific_threshold,
            ));
        }
        Ok(Self {
            min,
            max,
            specific_threshold,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self {
            min: 0.3,
            max: 1.2,
            specific_threshold: 0.6,
        }
    }
}

/// Pure analyzer turning a command into a specificity score and temperature.
#[derive(Debug, Clone, Default)]
pub struct SpecificityAnalyzer {
    range: TemperatureRange,
}

impl SpecificityAnalyzer {
    pub fn new(range: TemperatureRange) -> Self {
        Self { range }
    }

    /// Analyzes a raw command with its parsed descriptors.
    ///
    /// Additive score: +0.2 per distinct descriptor (capped at +0.6), a
    /// quantity term favoring small requested counts, ±0.3 for vague vs.
    /// exact language, +0.2 when a descriptor names a technical fabric or
    /// construction term. Clamped to [0, 1]. Temperature is the affine
    /// inverse: a fully specific command gets the minimum temperature.
    pub fn analyze(
        &self,
        raw_command: &str,
        descriptors: &[Descriptor],
        requested_count: u32,
    ) -> SpecificityReport {
        let mut tenths = 0;

        tenths += descriptor_term(descriptors);
        tenths += quantity_term(requested_count);
        tenths += language_term(raw_command);
        if descriptors
            .iter()
            .any(|d| is_technical_term(&d.value))
        {
            tenths += TECHNICAL_BONUS_TENTHS;
        }

        let score = f64::from(tenths.clamp(0, 10)) / 10.0;
        let temperature = self.range.max - score * (self.range.max - self.range.min);
        let mode = if score > self.range.specific_threshold {
            RequestMode::Specific
        } else {
            RequestMode::Exploratory
        };

        SpecificityReport {
            score,
            temperature,
            mode,
        }
    }
}

fn descriptor_term(descriptors: &[Descriptor]) -> i32 {
    let distinct: HashSet<(DescriptorKind, String)> = descriptors
        .iter()
        .map(|d| (d.kind, d.value.trim().to_lowercase()))
        .filter(|(_, v)| !v.is_empty())
        .collect();

    (distinct.len() as i32 * DESCRIPTOR_STEP_TENTHS).min(DESCRIPTOR_CAP_TENTHS)
}

fn quantity_term(requested_count: u32) -> i32 {
    match requested_count {
        1 => 3,
        2..=5 => 2,
        6..=10 => 1,
        _ => 0,
    }
}

fn language_term(raw_command: &str) -> i32 {
    let words: Vec<String> = raw_command
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    let mut term = 0;
    if words.iter().any(|w| VAGUE_CUES.contains(w.as_str())) {
        term -= LANGUAGE_CUE_TENTHS;
    }
    if words.iter().any(|w| PRECISE_CUES.contains(w.as_str())) {
        term += LANGUAGE_CUE_TENTHS;
    }
    term
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> SpecificityAnalyzer {
        SpecificityAnalyzer::default()
    }

    #[test]
    fn bulk_vague_request_is_exploratory() {
        let report = analyzer().analyze("make me 10 dresses", &[], 10);

        assert!(report.score <= 0.3, "score was {}", report.score);
        assert_eq!(report.mode, RequestMode::Exploratory);
    }

    #[test]
    fn detailed_single_request_is_specific() {
        let descriptors = vec![
            Descriptor::new(DescriptorKind::Style, "sporty chic"),
            Descriptor::new(DescriptorKind::Fabric, "cashmere"),
            Descriptor::new(DescriptorKind::Modifier, "fitted"),
        ];
        let report = analyzer().analyze(
            "make a sporty chic cashmere fitted dress",
            &descriptors,
            1,
        );

        assert!(report.score >= 0.7, "score was {}", report.score);
        assert_eq!(report.mode, RequestMode::Specific);
    }

    #[test]
    fn vague_language_lowers_score() {
        let base = analyzer().analyze("make me a dress", &[], 1);
        let vague = analyzer().analyze("make me something, whatever works", &[], 1);

        assert!(vague.score < base.score);
    }

    #[test]
    fn exact_language_raises_score() {
        let base = analyzer().analyze("a red dress", &[], 1);
        let exact = analyzer().analyze("exactly this: a red dress, must-have", &[], 1);

        assert!(exact.score > base.score);
    }

    #[test]
    fn descriptor_contribution_caps_at_three() {
        let three: Vec<Descriptor> = ["red", "blue", "green"]
            .iter()
            .map(|c| Descriptor::new(DescriptorKind::Color, *c))
            .collect();
        let five: Vec<Descriptor> = ["red", "blue", "green", "ivory", "navy"]
            .iter()
            .map(|c| Descriptor::new(DescriptorKind::Color, *c))
            .collect();

        let a = analyzer().analyze("dresses", &three, 11);
        let b = analyzer().analyze("dresses", &five, 11);
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn duplicate_descriptors_count_once() {
        let dupes = vec![
            Descriptor::new(DescriptorKind::Color, "Red"),
            Descriptor::new(DescriptorKind::Color, "red"),
        ];
        let single = vec![Descriptor::new(DescriptorKind::Color, "red")];

        let a = analyzer().analyze("dress", &dupes, 11);
        let b = analyzer().analyze("dress", &single, 11);
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn temperature_is_affine_inverse_of_score() {
        let range = TemperatureRange::default();
        let loose = analyzer().analyze("surprise me with anything", &[], 20);
        let tight = analyzer().analyze(
            "exactly one fitted cashmere sheath dress",
            &[
                Descriptor::new(DescriptorKind::Fabric, "cashmere"),
                Descriptor::new(DescriptorKind::Modifier, "fitted"),
                Descriptor::new(DescriptorKind::Style, "sheath"),
            ],
            1,
        );

        assert!(loose.temperature > tight.temperature);
        assert!(loose.temperature <= range.max());
        assert!(tight.temperature >= range.min());
    }

    #[test]
    fn mode_boundary_is_exclusive_at_threshold() {
        // Two descriptors + count 2: 0.4 + 0.2 = 0.6, not above the 0.6
        // threshold, so still exploratory.
        let descriptors = vec![
            Descriptor::new(DescriptorKind::Color, "red"),
            Descriptor::new(DescriptorKind::Style, "casual"),
        ];
        let report = analyzer().analyze("two red casual dresses", &descriptors, 2);

        assert!((report.score - 0.6).abs() < 1e-9);
        assert_eq!(report.mode, RequestMode::Exploratory);
    }

    #[test]
    fn invalid_temperature_range_is_rejected() {
        assert!(TemperatureRange::new(1.2, 0.3, 0.6).is_err());
        assert!(TemperatureRange::new(0.0, 1.2, 0.6).is_err());
        assert!(TemperatureRange::new(0.3, 1.2, 1.5).is_err());
    }
}
