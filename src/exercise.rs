//! Practice exercises: random but readable signals, the quantities to measure on them, and the
//! exact answers.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ScopeError;
use crate::oscillators::{Oscillator, WaveShape};
use crate::scale::DisplayScale;
use crate::signal::SignalModel;
use crate::types::Divisions;
use crate::units::UnitCategory;

/// Exercises pick their vertical scale among this many of the coarsest steps.
const COARSE_VERTICAL_STEPS: usize = 6;

/// Exercises pick their horizontal scale among this many of the coarsest steps.
const COARSE_HORIZONTAL_STEPS: usize = 8;

/// The furthest a generated signal reaches from the centre line: `|offset| + amplitude` never
/// exceeds this, in divisions.
pub const MAX_EXCURSION: Divisions = 3.6;

const EASY_AMPLITUDES: [i32; 3] = [1, 2, 3];
const EASY_PERIODS: [i32; 4] = [2, 4, 5, 10];

/// Medium and hard layouts are multiples of a fifth of a division.
const FIFTHS_PER_DIVISION: f64 = 5.0;
const MAX_EXCURSION_FIFTHS: i32 = 18;
const AMPLITUDE_RANGE: (Divisions, Divisions) = (0.4, 3.6);
const PERIOD_RANGE: (Divisions, Divisions) = (2.0, 8.0);

/// Duty ratios for randomized square waves are drawn from this range, in steps of 0.05.
const DUTY_RANGE: (f64, f64) = (0.2, 0.8);

/// A quantity the learner can be asked to read off the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    PeakAmplitude,
    PeakToPeak,
    DcOffset,
    Period,
    Frequency,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::PeakAmplitude,
        Metric::PeakToPeak,
        Metric::DcOffset,
        Metric::Period,
        Metric::Frequency,
    ];

    /// The short symbol used in feedback, e.g. `Upp`.
    pub fn symbol(self) -> &'static str {
        match self {
            Metric::PeakAmplitude => "Um",
            Metric::PeakToPeak => "Upp",
            Metric::DcOffset => "Ucc",
            Metric::Period => "T",
            Metric::Frequency => "f",
        }
    }

    /// The label of the answer field for this metric.
    pub fn label(self) -> &'static str {
        match self {
            Metric::PeakAmplitude => "Um (peak amplitude)",
            Metric::PeakToPeak => "Upp (peak to peak)",
            Metric::DcOffset => "Ucc (DC offset)",
            Metric::Period => "Period T",
            Metric::Frequency => "Frequency f",
        }
    }

    pub fn category(self) -> UnitCategory {
        match self {
            Metric::PeakAmplitude | Metric::PeakToPeak | Metric::DcOffset => UnitCategory::Voltage,
            Metric::Period => UnitCategory::Time,
            Metric::Frequency => UnitCategory::Frequency,
        }
    }

    /// Format an SI value of this metric with its base unit, e.g. `0.008000 s`.
    pub fn format_value(self, value: f64) -> String {
        let decimals = match self.category() {
            UnitCategory::Time => 6,
            UnitCategory::Voltage | UnitCategory::Frequency => 3,
        };
        format!("{value:.decimals$} {}", self.category().base_symbol())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Metric {
    type Err = ScopeError;

    /// Parse a metric from its symbol (any case) or its snake case name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "um" | "peak_amplitude" | "amplitude" => Ok(Metric::PeakAmplitude),
            "upp" | "peak_to_peak" => Ok(Metric::PeakToPeak),
            "ucc" | "dc_offset" | "offset" => Ok(Metric::DcOffset),
            "t" | "period" => Ok(Metric::Period),
            "f" | "frequency" => Ok(Metric::Frequency),
            _ => Err(ScopeError::UnknownMetric(s.to_string())),
        }
    }
}

/// How hard an exercise is to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Whole divisions and a single question.
    #[default]
    Easy,
    /// Fifths of a division and a single question.
    Medium,
    /// Fifths of a division and every question.
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ScopeError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Which metrics an exercise asks for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSelection {
    /// Decided by the difficulty: one random metric for easy and medium, all of them for hard.
    #[default]
    Tiered,
    /// Always the given metrics, whatever the difficulty. An empty list falls back to tiered.
    Chosen(Vec<Metric>),
}

/// The generated signal measured in screen divisions, before scaling to physical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivisionLayout {
    pub amplitude: Divisions,
    pub offset: Divisions,
    pub period: Divisions,
}

impl DivisionLayout {
    /// The exact value of every metric at the given scale, in SI units.
    pub fn ground_truth(&self, volts_per_division: f64, seconds_per_division: f64) -> BTreeMap<Metric, f64> {
        let amplitude = self.amplitude * volts_per_division;
        let period = self.period * seconds_per_division;

        BTreeMap::from([
            (Metric::PeakAmplitude, amplitude),
            (Metric::PeakToPeak, 2.0 * amplitude),
            (Metric::DcOffset, self.offset * volts_per_division),
            (Metric::Period, period),
            (Metric::Frequency, 1.0 / period),
        ])
    }
}

/// One exercise: the metrics asked and their exact answers. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    difficulty: Difficulty,
    asked: Vec<Metric>,
    ground_truth: BTreeMap<Metric, f64>,
    layout: DivisionLayout,
}

impl Exercise {
    /// Create an exercise asking `asked` about a signal laid out as `layout` on `scale`.
    ///
    /// Asked metrics are deduplicated and kept in [`Metric::ALL`] order. Callers should ask at least
    /// one metric: an exercise asking nothing can never be passed.
    pub fn new<I>(difficulty: Difficulty, asked: I, layout: DivisionLayout, scale: &DisplayScale) -> Self
    where
        I: IntoIterator<Item = Metric>,
    {
        let asked: BTreeSet<Metric> = asked.into_iter().collect();
        let ground_truth = layout.ground_truth(scale.volts_per_division(), scale.seconds_per_division());

        Self {
            difficulty,
            asked: asked.into_iter().collect(),
            ground_truth,
            layout,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The metrics the learner has to answer.
    pub fn asked_metrics(&self) -> &[Metric] {
        &self.asked
    }

    /// The exact answer for a metric, in SI units.
    pub fn expected(&self, metric: Metric) -> f64 {
        self.ground_truth[&metric]
    }

    /// The exact answers of every metric, asked or not.
    pub fn ground_truth(&self) -> &BTreeMap<Metric, f64> {
        &self.ground_truth
    }

    pub fn layout(&self) -> &DivisionLayout {
        &self.layout
    }

    /// The answers to the asked metrics, e.g. `Um = 2.000 V • T = 0.008000 s`.
    pub fn solution(&self) -> String {
        self.asked
            .iter()
            .map(|metric| format!("{} = {}", metric.symbol(), metric.format_value(self.expected(*metric))))
            .collect::<Vec<_>>()
            .join(" • ")
    }
}

/// Everything a new exercise replaces in a session.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedExercise {
    pub exercise: Exercise,
    pub signal: SignalModel,
    pub scale: DisplayScale,
}

/// Generates exercises from an injected random source.
#[derive(Debug, Clone)]
pub struct ExerciseGenerator<R: Rng> {
    rng: R,
    selection: MetricSelection,
    shape_randomization: bool,
}

impl<R: Rng> ExerciseGenerator<R> {
    /// Create a generator of sine-only exercises with tiered metrics.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            selection: MetricSelection::Tiered,
            shape_randomization: false,
        }
    }

    pub fn with_selection(mut self, selection: MetricSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Also draw square and triangle waves, and random duty ratios for square waves.
    pub fn with_shape_randomization(mut self, enabled: bool) -> Self {
        self.shape_randomization = enabled;
        self
    }

    /// Generate a new exercise of the given difficulty, together with the signal and scale to show.
    pub fn generate(&mut self, difficulty: Difficulty) -> GeneratedExercise {
        let scale = DisplayScale::new(
            self.rng.gen_range(0..COARSE_VERTICAL_STEPS),
            self.rng.gen_range(0..COARSE_HORIZONTAL_STEPS),
        );

        let asked = self.pick_metrics(difficulty);
        let layout = match difficulty {
            Difficulty::Easy => self.pick_whole_layout(),
            Difficulty::Medium | Difficulty::Hard => self.pick_fifths_layout(),
        };
        let exercise = Exercise::new(difficulty, asked, layout, &scale);

        let (shape, duty) = self.pick_shape();
        let signal = SignalModel {
            oscillator: Oscillator::new(
                shape,
                exercise.expected(Metric::PeakAmplitude),
                exercise.expected(Metric::Frequency),
            )
            .with_duty(duty),
            dc_offset: exercise.expected(Metric::DcOffset),
        };

        log::info!(
            "Generated {difficulty} exercise: {shape} at {} and {}, asking {:?}",
            scale.vertical_label(),
            scale.horizontal_label(),
            exercise.asked_metrics()
        );
        log::debug!("Exercise layout: {layout:?}");

        GeneratedExercise { exercise, signal, scale }
    }

    fn pick_metrics(&mut self, difficulty: Difficulty) -> Vec<Metric> {
        if let MetricSelection::Chosen(metrics) = &self.selection {
            if !metrics.is_empty() {
                return metrics.clone();
            }
        }

        match difficulty {
            Difficulty::Easy => vec![pick(&mut self.rng, &[Metric::PeakAmplitude, Metric::DcOffset, Metric::Period])],
            Difficulty::Medium => vec![pick(
                &mut self.rng,
                &[Metric::PeakAmplitude, Metric::DcOffset, Metric::Period, Metric::Frequency],
            )],
            Difficulty::Hard => Metric::ALL.to_vec(),
        }
    }

    /// Whole divisions, for easy exercises.
    fn pick_whole_layout(&mut self) -> DivisionLayout {
        let amplitude = pick(&mut self.rng, &EASY_AMPLITUDES);
        let period = pick(&mut self.rng, &EASY_PERIODS);

        let max_offset = f64::max(0.0, MAX_EXCURSION - f64::from(amplitude)).floor() as i32;
        let offset = self.rng.gen_range(-max_offset..=max_offset);

        DivisionLayout {
            amplitude: f64::from(amplitude),
            offset: f64::from(offset),
            period: f64::from(period),
        }
    }

    /// Fifths of a division, for medium and hard exercises.
    fn pick_fifths_layout(&mut self) -> DivisionLayout {
        let amplitude = self.pick_fifths(AMPLITUDE_RANGE.0, AMPLITUDE_RANGE.1);
        let period = self.pick_fifths(PERIOD_RANGE.0, PERIOD_RANGE.1);

        // Counted in whole fifths so the headroom check is exact.
        let headroom = (MAX_EXCURSION_FIFTHS - amplitude).max(0);
        let headroom_divisions = f64::from(headroom) / FIFTHS_PER_DIVISION;
        let offset = self
            .pick_fifths(-headroom_divisions, headroom_divisions)
            .clamp(-headroom, headroom);

        DivisionLayout {
            amplitude: f64::from(amplitude) / FIFTHS_PER_DIVISION,
            offset: f64::from(offset) / FIFTHS_PER_DIVISION,
            period: f64::from(period) / FIFTHS_PER_DIVISION,
        }
    }

    /// A uniform value in [min, max] divisions, rounded to the nearest fifth and returned as a
    /// count of fifths.
    fn pick_fifths(&mut self, min: Divisions, max: Divisions) -> i32 {
        let value = self.rng.gen_range(min..=max);
        (value * FIFTHS_PER_DIVISION).round() as i32
    }

    fn pick_shape(&mut self) -> (WaveShape, f64) {
        if !self.shape_randomization {
            return (WaveShape::Sine, 0.5);
        }

        let shape = pick(&mut self.rng, &WaveShape::ALL);
        let duty = match shape {
            WaveShape::Square => (self.rng.gen_range(DUTY_RANGE.0..=DUTY_RANGE.1) * 20.0).round() / 20.0,
            WaveShape::Sine | WaveShape::Triangle => 0.5,
        };
        (shape, duty)
    }
}

/// Pick one item uniformly. `items` must not be empty.
fn pick<R: Rng, T: Copy>(rng: &mut R, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}
