//! Tolerance comparison of numeric answers

use super::extractor::AnswerExtractor;
use super::types::NumericEvaluation;
use crate::questions::{ExpectedAnswer, ToleranceKind};
use statbench_core::llm::ModelResponse;

/// Compares extracted numbers against single-value and range targets
pub struct NumericEvaluator;

impl NumericEvaluator {
    /// Extract a number from the response and compare it
    pub fn evaluate_response(response: &ModelResponse, expected: &ExpectedAnswer) -> NumericEvaluation {
        Self::evaluate(AnswerExtractor::extract_from_response(response), expected)
    }

    /// Compare an extracted value; answers that are not numeric are never correct
    pub fn evaluate(extracted: Option<f64>, expected: &ExpectedAnswer) -> NumericEvaluation {
        match expected {
            ExpectedAnswer::Numeric {
                value,
                tolerance,
                tolerance_type,
            } => Self::evaluate_value(extracted, *value, *tolerance, *tolerance_type),
            ExpectedAnswer::NumericRange { min, max } => Self::evaluate_range(extracted, *min, *max),
            ExpectedAnswer::Categorical { .. } | ExpectedAnswer::Boolean { .. } => NumericEvaluation {
                correct: false,
                extracted_value: extracted,
                expected_value: 0.0,
                difference: None,
                within_tolerance: false,
            },
        }
    }

    fn evaluate_value(
        extracted: Option<f64>,
        expected: f64,
        tolerance: f64,
        kind: ToleranceKind,
    ) -> NumericEvaluation {
        let Some(extracted) = extracted else {
            return missing(expected);
        };

        let difference = match kind {
            // Relative to zero is meaningless; fall back to the magnitude
            ToleranceKind::Relative if expected == 0.0 => extracted.abs(),
            ToleranceKind::Relative => (extracted - expected).abs() / expected.abs(),
            ToleranceKind::Absolute => (extracted - expected).abs(),
        };
        let within_tolerance = difference <= tolerance;

        NumericEvaluation {
            correct: within_tolerance,
            extracted_value: Some(extracted),
            expected_value: expected,
            difference: Some(difference),
            within_tolerance,
        }
    }

    fn evaluate_range(extracted: Option<f64>, min: f64, max: f64) -> NumericEvaluation {
        let midpoint = (min + max) / 2.0;
        let Some(extracted) = extracted else {
            return missing(midpoint);
        };

        let within_range = min <= extracted && extracted <= max;
        let difference = if within_range {
            0.0
        } else if extracted < min {
            min - extracted
        } else {
            extracted - max
        };

        NumericEvaluation {
            correct: within_range,
            extracted_value: Some(extracted),
            expected_value: midpoint,
            difference: Some(difference),
            within_tolerance: within_range,
        }
    }
}

fn missing(expected_value: f64) -> NumericEvaluation {
    NumericEvaluation {
        correct: false,
        extracted_value: None,
        expected_value,
        difference: None,
        within_tolerance: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relative(value: f64, tolerance: f64) -> ExpectedAnswer {
        ExpectedAnswer::Numeric {
            value,
            tolerance,
            tolerance_type: ToleranceKind::Relative,
        }
    }

    fn absolute(value: f64, tolerance: f64) -> ExpectedAnswer {
        ExpectedAnswer::Numeric {
            value,
            tolerance,
            tolerance_type: ToleranceKind::Absolute,
        }
    }

    #[test]
    fn test_relative_tolerance() {
        let result = NumericEvaluator::evaluate(Some(1.97), &relative(1.96, 0.01));
        assert!(result.correct);
        assert!((result.difference.unwrap() - 0.0051).abs() < 1e-4);

        let result = NumericEvaluator::evaluate(Some(2.0), &relative(1.96, 0.01));
        assert!(!result.correct);
        assert_eq!(result.correct, result.within_tolerance);
    }

    #[test]
    fn test_relative_tolerance_zero_target() {
        let result = NumericEvaluator::evaluate(Some(-0.004), &relative(0.0, 0.005));
        assert_eq!(result.difference, Some(0.004));
        assert!(result.correct);

        let result = NumericEvaluator::evaluate(Some(0.5), &relative(0.0, 0.005));
        assert!(!result.correct);
    }

    #[test]
    fn test_absolute_tolerance() {
        let result = NumericEvaluator::evaluate(Some(385.0), &absolute(384.0, 1.0));
        assert!(result.correct);
        assert_eq!(result.difference, Some(1.0));

        let result = NumericEvaluator::evaluate(Some(382.5), &absolute(384.0, 1.0));
        assert!(!result.correct);
        assert_eq!(result.expected_value, 384.0);
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let range = ExpectedAnswer::NumericRange { min: 30.0, max: 40.0 };
        for value in [30.0, 40.0] {
            let result = NumericEvaluator::evaluate(Some(value), &range);
            assert!(result.correct);
            assert_eq!(result.difference, Some(0.0));
        }
        assert_eq!(NumericEvaluator::evaluate(Some(35.0), &range).expected_value, 35.0);
    }

    #[test]
    fn test_range_distance_to_nearer_bound() {
        let range = ExpectedAnswer::NumericRange { min: 30.0, max: 40.0 };
        let above = NumericEvaluator::evaluate(Some(45.0), &range);
        assert!(!above.correct);
        assert_eq!(above.difference, Some(5.0));

        let below = NumericEvaluator::evaluate(Some(27.5), &range);
        assert_eq!(below.difference, Some(2.5));
    }

    #[test]
    fn test_missing_extraction() {
        for expected in [
            relative(1.0, 0.1),
            ExpectedAnswer::NumericRange { min: 1.0, max: 3.0 },
        ] {
            let result = NumericEvaluator::evaluate(None, &expected);
            assert!(!result.correct);
            assert!(!result.within_tolerance);
            assert_eq!(result.extracted_value, None);
            assert_eq!(result.difference, None);
        }
    }

    #[test]
    fn test_non_numeric_answer() {
        let expected = ExpectedAnswer::Boolean { value: true };
        let result = NumericEvaluator::evaluate(Some(1.0), &expected);
        assert!(!result.correct);
        assert_eq!(result.expected_value, 0.0);
    }

    #[test]
    fn test_evaluate_response_text() {
        let response = ModelResponse::new("After computing, n = 45", "m");
        let range = ExpectedAnswer::NumericRange { min: 30.0, max: 40.0 };
        let result = NumericEvaluator::evaluate_response(&response, &range);
        assert_eq!(result.extracted_value, Some(45.0));
        assert!(!result.correct);
        assert_eq!(result.difference, Some(5.0));
    }
}
