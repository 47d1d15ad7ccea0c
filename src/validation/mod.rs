/*!
 * Structural validation of generated output.
 *
 * The pipeline treats generated text as opaque except for structural
 * sanity: output must not be near-empty, must not contain script ranges
 * outside the Hangul target alphabet, must be free of raw markup
 * artifacts, and must be mostly target-alphabet text rather than
 * untranslated passthrough. All failing checks are reported, not just
 * the first, so degraded chunks carry full diagnostics.
 */

pub use self::markup::strip_reasoning_tags;

pub mod markup;
pub mod scripts;

use crate::app_config::ValidationConfig;

use self::markup::find_markup_artifacts;
use self::scripts::{foreign_scripts_in, hangul_ratio};

/// Result of validating one generated text
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Whether all checks passed
    pub passed: bool,
    /// Human-readable reasons for every failing check
    pub reasons: Vec<String>,
}

impl ValidationReport {
    fn passed() -> Self {
        Self {
            passed: true,
            reasons: Vec::new(),
        }
    }

    fn failed(reasons: Vec<String>) -> Self {
        Self {
            passed: false,
            reasons,
        }
    }
}

/// Runs all structural checks on generated output. Pure and non-blocking.
#[derive(Debug, Clone)]
pub struct Validator {
    /// Minimum output length in characters
    min_output_chars: usize,
    /// Minimum ratio of Hangul among non-whitespace characters
    min_hangul_ratio: f64,
}

impl Validator {
    /// Create a validator with explicit thresholds
    pub fn new(min_output_chars: usize, min_hangul_ratio: f64) -> Self {
        Self {
            min_output_chars,
            min_hangul_ratio,
        }
    }

    /// Create a validator from the application validation configuration
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(config.min_output_chars, config.min_hangul_ratio)
    }

    /// Run every check and collect all failing reasons
    pub fn check(&self, text: &str) -> ValidationReport {
        let trimmed = text.trim();
        let mut reasons = Vec::new();

        if trimmed.chars().count() < self.min_output_chars {
            reasons.push(format!(
                "output too short: {} chars (minimum {})",
                trimmed.chars().count(),
                self.min_output_chars
            ));
            // Nothing else is worth checking on a near-empty result.
            return ValidationReport::failed(reasons);
        }

        for script in foreign_scripts_in(trimmed) {
            reasons.push(format!(
                "contains {} characters outside the target alphabet",
                script
            ));
        }

        for artifact in find_markup_artifacts(trimmed) {
            reasons.push(format!("contains raw markup artifact: {}", artifact));
        }

        let ratio = hangul_ratio(trimmed);
        if ratio < self.min_hangul_ratio {
            reasons.push(format!(
                "insufficient Hangul ratio: {:.2} (minimum {:.2})",
                ratio, self.min_hangul_ratio
            ));
        }

        if reasons.is_empty() {
            ValidationReport::passed()
        } else {
            ValidationReport::failed(reasons)
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::from_config(&ValidationConfig::default())
    }
}
