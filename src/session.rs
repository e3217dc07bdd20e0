//! A training session: the one place holding the signal, screen, coupling and active exercise.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SessionConfig;
use crate::exercise::{Difficulty, Exercise, ExerciseGenerator, GeneratedExercise};
use crate::sampler::{self, Trace};
use crate::scale::{DisplayScale, VERTICAL_PAN_STEP};
use crate::signal::{Coupling, SignalModel};
use crate::types::Divisions;
use crate::validator::{AnswerSheet, Validation, Validator};

/// Owns all mutable state of one learner's session.
///
/// Every operation runs to completion before returning; generating an exercise replaces the
/// signal, the scale and the exercise together.
#[derive(Debug)]
pub struct Session<R: Rng = StdRng> {
    signal: SignalModel,
    scale: DisplayScale,
    coupling: Coupling,
    difficulty: Difficulty,
    exercise: Option<Exercise>,
    generator: ExerciseGenerator<R>,
    validator: Validator,
}

impl Session<StdRng> {
    /// Create a session from a configuration, seeded from it when it has a seed.
    pub fn new(config: &SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Session<R> {
    /// Create a session drawing exercises from `rng`. No exercise is active yet.
    pub fn with_rng(config: &SessionConfig, rng: R) -> Self {
        log::info!("Starting session ({}% tolerance)", config.tolerance_percent);

        let generator = ExerciseGenerator::new(rng)
            .with_selection(config.metrics.clone())
            .with_shape_randomization(config.shape_randomization);

        Self {
            signal: SignalModel::default(),
            scale: DisplayScale::default(),
            coupling: Coupling::default(),
            difficulty: config.difficulty,
            exercise: None,
            generator,
            validator: Validator::new(config.tolerance_percent),
        }
    }

    /// The signal currently on screen.
    pub fn signal(&self) -> &SignalModel {
        &self.signal
    }

    /// The current knob and pan settings.
    pub fn scale(&self) -> &DisplayScale {
        &self.scale
    }

    /// The input coupling.
    pub fn coupling(&self) -> Coupling {
        self.coupling
    }

    /// The difficulty of the current (or next) exercise.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The active exercise, if one has been generated.
    pub fn exercise(&self) -> Option<&Exercise> {
        self.exercise.as_ref()
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Sample the current signal across `count` columns for display.
    pub fn render(&self, count: usize) -> Trace {
        sampler::sample(&self.signal, &self.scale, self.coupling, count)
    }

    /// Switch between AC and DC coupling. The coupling survives new exercises.
    pub fn toggle_coupling(&mut self) -> Coupling {
        self.coupling = self.coupling.toggled();
        log::debug!("Switched to {}", self.coupling);
        self.coupling
    }

    /// Move the vertical knob by `delta` steps; positive is finer. Returns whether it moved.
    pub fn step_vertical(&mut self, delta: isize) -> bool {
        let changed = self.scale.step_vertical(delta);
        if changed {
            log::debug!("Vertical scale set to {}", self.scale.vertical_label());
        }
        changed
    }

    /// Move the horizontal knob by `delta` steps; positive is finer. Returns whether it moved.
    pub fn step_horizontal(&mut self, delta: isize) -> bool {
        let changed = self.scale.step_horizontal(delta);
        if changed {
            log::debug!("Horizontal scale set to {}", self.scale.horizontal_label());
        }
        changed
    }

    /// Turn the vertical knob to step `step`, clamped to the table. Returns whether it moved.
    pub fn set_vertical_step(&mut self, step: usize) -> bool {
        let changed = self.scale.set_vertical_step(step);
        if changed {
            log::debug!("Vertical scale set to {}", self.scale.vertical_label());
        }
        changed
    }

    /// Turn the horizontal knob to step `step`, clamped to the table. Returns whether it moved.
    pub fn set_horizontal_step(&mut self, step: usize) -> bool {
        let changed = self.scale.set_horizontal_step(step);
        if changed {
            log::debug!("Horizontal scale set to {}", self.scale.horizontal_label());
        }
        changed
    }

    /// Drag the trace sideways by `delta` divisions.
    pub fn pan_horizontal(&mut self, delta: Divisions) {
        self.scale.pan_horizontal_by(delta);
    }

    /// Scroll the trace up or down by `notches` wheel steps.
    pub fn scroll_vertical(&mut self, notches: i32) {
        self.scale.pan_vertical_by(f64::from(notches) * VERTICAL_PAN_STEP);
    }

    /// Place time zero `pan` divisions from the left edge, clamped to the screen.
    pub fn set_horizontal_pan(&mut self, pan: Divisions) {
        self.scale.set_horizontal_pan(pan);
        log::debug!("Horizontal pan set to {}", self.scale.horizontal_pan());
    }

    /// Place the zero volt line `pan` divisions from the top edge, clamped to the screen.
    pub fn set_vertical_pan(&mut self, pan: Divisions) {
        self.scale.set_vertical_pan(pan);
        log::debug!("Vertical pan set to {}", self.scale.vertical_pan());
    }

    /// Recentre the horizontal pan only.
    pub fn reset_horizontal_pan(&mut self) {
        self.scale.reset_horizontal_pan();
        log::debug!("Horizontal pan reset");
    }

    /// Recentre the vertical pan only.
    pub fn reset_vertical_pan(&mut self) {
        self.scale.reset_vertical_pan();
        log::debug!("Vertical pan reset");
    }

    /// Recentre both pans.
    pub fn recentre(&mut self) {
        self.scale.recentre();
    }

    /// Generate a new exercise, replacing the signal, the scale and any previous exercise.
    pub fn new_exercise(&mut self, difficulty: Difficulty) -> &Exercise {
        let GeneratedExercise { exercise, signal, scale } = self.generator.generate(difficulty);

        self.difficulty = difficulty;
        self.signal = signal;
        self.scale = scale;
        self.exercise.insert(exercise)
    }

    /// Validate answers against the active exercise, if there is one.
    pub fn validate(&self, answers: &AnswerSheet) -> Option<Validation> {
        self.exercise
            .as_ref()
            .map(|exercise| self.validator.validate(exercise, answers))
    }

    /// The answers of the active exercise, if there is one.
    pub fn solution(&self) -> Option<String> {
        self.exercise.as_ref().map(Exercise::solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::Metric;
    use crate::validator::Answer;
    use approx::assert_relative_eq;

    fn session(seed: u64) -> Session {
        let config = SessionConfig {
            seed: Some(seed),
            ..Default::default()
        };
        Session::new(&config)
    }

    fn correct_answers(exercise: &Exercise) -> AnswerSheet {
        exercise
            .asked_metrics()
            .iter()
            .map(|&metric| {
                let unit = metric.category().base_symbol();
                (metric, Answer::new(exercise.expected(metric).to_string(), unit))
            })
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let session = session(1);
        assert!(session.exercise().is_none());
        assert_eq!(session.coupling(), Coupling::DC);
        assert_eq!(session.scale(), &DisplayScale::default());
        assert!(session.validate(&AnswerSheet::new()).is_none());
        assert!(session.solution().is_none());
    }

    #[test]
    fn test_new_exercise_replaces_state() {
        let mut session = session(2);
        let exercise = session.new_exercise(Difficulty::Hard).clone();

        assert_eq!(session.difficulty(), Difficulty::Hard);
        assert_eq!(session.exercise(), Some(&exercise));
        assert_eq!(session.signal().amplitude(), exercise.expected(Metric::PeakAmplitude));
        assert_relative_eq!(
            exercise.expected(Metric::PeakAmplitude),
            exercise.layout().amplitude * session.scale().volts_per_division()
        );

        let next = session.new_exercise(Difficulty::Easy).clone();
        assert_eq!(session.exercise(), Some(&next));
        assert_eq!(session.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn test_correct_answers_pass() {
        let mut session = session(3);
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let answers = correct_answers(session.new_exercise(difficulty));
            let validation = session.validate(&answers);
            assert!(validation.map(|validation| validation.passed).unwrap_or(false));
        }
    }

    #[test]
    fn test_empty_answers_fail() {
        let mut session = session(4);
        session.new_exercise(Difficulty::Hard);
        let validation = session.validate(&AnswerSheet::new());
        assert_eq!(validation.map(|validation| validation.passed), Some(false));
    }

    #[test]
    fn test_coupling_persists_across_exercises() {
        let mut session = session(5);
        assert_eq!(session.toggle_coupling(), Coupling::AC);
        session.new_exercise(Difficulty::Medium);
        assert_eq!(session.coupling(), Coupling::AC);

        let trace = session.render(64);
        assert_eq!(trace.coupling, Coupling::AC);
        assert_eq!(trace.dc_marker(), None);
        assert_eq!(session.toggle_coupling(), Coupling::DC);
    }

    #[test]
    fn test_render_follows_controls() {
        let mut session = session(6);
        let before = session.render(100);
        assert_eq!(before.points.len(), 100);
        assert_eq!(before.volts_per_division, 1.0);

        assert!(session.step_vertical(1));
        assert_eq!(session.render(100).volts_per_division, 0.5);

        session.pan_horizontal(1.0);
        session.scroll_vertical(-2);
        assert_eq!(session.scale().horizontal_pan(), 6.0);
        assert_relative_eq!(session.scale().vertical_pan(), 3.6);
        assert_ne!(session.render(100).points, before.points);

        session.recentre();
        assert_eq!(session.scale().horizontal_pan(), 5.0);
        assert_eq!(session.scale().vertical_pan(), 4.0);

        assert!(session.step_horizontal(-100));
        assert!(!session.step_horizontal(-1));
    }

    #[test]
    fn test_solution_after_exercise() {
        let mut session = session(8);
        session.new_exercise(Difficulty::Easy);
        let solution = session.solution().unwrap_or_default();
        assert!(solution.contains(" = "));
        assert!(!solution.contains('•'));
    }

    #[test]
    fn test_pans_reset_independently() {
        let mut session = session(9);
        session.scroll_vertical(-5);
        session.pan_horizontal(3.0);

        // Resetting one axis leaves the other where it was.
        session.reset_horizontal_pan();
        assert_eq!(session.scale().horizontal_pan(), 5.0);
        assert_relative_eq!(session.scale().vertical_pan(), 3.0);

        session.pan_horizontal(-2.0);
        session.reset_vertical_pan();
        assert_eq!(session.scale().vertical_pan(), 4.0);
        assert_eq!(session.scale().horizontal_pan(), 3.0);
    }

    #[test]
    fn test_absolute_controls() {
        let mut session = session(10);

        assert!(session.set_vertical_step(0));
        assert_eq!(session.scale().volts_per_division(), 5.0);
        assert!(!session.set_vertical_step(0));
        assert!(session.set_horizontal_step(99));
        assert_eq!(session.scale().seconds_per_division(), 0.0001);

        session.set_horizontal_pan(12.0);
        assert_eq!(session.scale().horizontal_pan(), 10.0);
        session.set_vertical_pan(1.5);
        assert_eq!(session.scale().vertical_pan(), 1.5);
        assert_eq!(session.render(16).zero_line, 1.5);
    }
}
