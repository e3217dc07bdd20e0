//! Core of an analog oscilloscope training simulator.
//!
//! A [`session::Session`] holds the signal shown on a simulated screen, the scale controls and the
//! coupling switch. It samples the signal for a renderer, generates measuring exercises at three
//! difficulties and checks the learner's answers within a tolerance.

pub mod config;
pub mod error;
pub mod exercise;
pub mod functions;
pub mod oscillators;
pub mod sampler;
pub mod scale;
pub mod session;
pub mod signal;
pub mod types;
pub mod units;
pub mod validator;

pub use config::SessionConfig;
pub use error::{ScopeError, ScopeResult};
pub use exercise::{Difficulty, Exercise, Metric, MetricSelection};
pub use session::Session;
pub use signal::Coupling;
pub use validator::{Answer, AnswerSheet, Validation};
