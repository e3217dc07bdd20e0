//! Checks learner answers against an exercise's ground truth.

use std::collections::BTreeMap;

use crate::exercise::{Exercise, Metric};

/// The default accepted relative error, in percent.
pub const DEFAULT_TOLERANCE_PERCENT: f64 = 5.0;

/// The range the tolerance can be configured within, in percent.
pub const MIN_TOLERANCE_PERCENT: f64 = 1.0;
pub const MAX_TOLERANCE_PERCENT: f64 = 20.0;

/// Below this a reference is treated as zero and compared absolutely.
const ZERO_REFERENCE_EPSILON: f64 = 1e-9;

/// Relative slack on the allowed error so that a value computed as `reference * (1 + tolerance)`
/// still lands inside the tolerance.
const ROUNDING_SLACK: f64 = 1e-12;

/// Whether `value` is within `tolerance_percent` of `reference`.
///
/// A zero reference has no relative scale, so it only accepts values within `1e-9` of zero.
pub fn within_tolerance(value: f64, reference: f64, tolerance_percent: f64) -> bool {
    let error = (value - reference).abs();
    if reference.abs() > 0.0 {
        let allowed = reference.abs() * (tolerance_percent / 100.0);
        error <= allowed + reference.abs() * ROUNDING_SLACK
    }
    else {
        error < ZERO_REFERENCE_EPSILON
    }
}

/// One raw answer, exactly as typed by the learner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Answer {
    pub value: String,
    pub unit: String,
}

impl Answer {
    /// An answer from its typed value and unit symbol, e.g. `("8", "ms")`.
    pub fn new(value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            unit: unit.into(),
        }
    }

    /// The answer in SI units, or `None` when the value is not a finite number.
    ///
    /// A comma is accepted as decimal separator.
    pub fn to_si(&self, metric: Metric) -> Option<f64> {
        let value: f64 = self.value.trim().replace(',', ".").parse().ok()?;
        let value = metric.category().to_si(value, &self.unit);
        value.is_finite().then_some(value)
    }
}

/// The learner's answers, by metric.
pub type AnswerSheet = BTreeMap<Metric, Answer>;

/// The verdict on one asked metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricResult {
    pub metric: Metric,
    pub passed: bool,
    /// The submitted answer in SI units, if it could be read.
    pub submitted: Option<f64>,
    pub expected: f64,
}

impl MetricResult {
    /// A feedback line such as `Um ✓` or `T ✗ (expected ≈ 0.008000 s)`.
    pub fn message(&self) -> String {
        if self.passed {
            format!("{} ✓", self.metric.symbol())
        }
        else {
            format!("{} ✗ (expected ≈ {})", self.metric.symbol(), self.metric.format_value(self.expected))
        }
    }
}

/// The verdict on a whole exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    /// True when at least one metric was asked and every asked metric passed.
    pub passed: bool,
    pub results: BTreeMap<Metric, MetricResult>,
}

impl Validation {
    /// All feedback lines joined into one.
    pub fn feedback(&self) -> String {
        self.results
            .values()
            .map(MetricResult::message)
            .collect::<Vec<_>>()
            .join(" • ")
    }
}

/// Validates answer sheets with a fixed tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Validator {
    tolerance_percent: f64,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            tolerance_percent: DEFAULT_TOLERANCE_PERCENT,
        }
    }
}

impl Validator {
    /// Create a validator accepting `tolerance_percent` relative error, clamped to
    /// [`MIN_TOLERANCE_PERCENT`, `MAX_TOLERANCE_PERCENT`].
    pub fn new(tolerance_percent: f64) -> Self {
        if tolerance_percent.is_nan() {
            return Self::default();
        }

        Self {
            tolerance_percent: tolerance_percent.clamp(MIN_TOLERANCE_PERCENT, MAX_TOLERANCE_PERCENT),
        }
    }

    /// The accepted relative error, in percent.
    pub fn tolerance_percent(&self) -> f64 {
        self.tolerance_percent
    }

    /// Check every asked metric of `exercise` against `answers`. Missing and unreadable answers
    /// fail their metric.
    pub fn validate(&self, exercise: &Exercise, answers: &AnswerSheet) -> Validation {
        let results: BTreeMap<Metric, MetricResult> = exercise
            .asked_metrics()
            .iter()
            .map(|&metric| {
                let expected = exercise.expected(metric);
                let submitted = answers.get(&metric).and_then(|answer| answer.to_si(metric));
                let passed = submitted
                    .map(|value| within_tolerance(value, expected, self.tolerance_percent))
                    .unwrap_or(false);

                (metric, MetricResult { metric, passed, submitted, expected })
            })
            .collect();

        // Nothing asked, nothing to pass.
        let passed = !results.is_empty() && results.values().all(|result| result.passed);
        log::info!(
            "Validated {} answer(s) at {}%: {}",
            results.len(),
            self.tolerance_percent,
            if passed { "passed" } else { "failed" }
        );

        Validation { passed, results }
    }
}
