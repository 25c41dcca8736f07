//! Spin planning and the calculation-phase state machine.
//!
//! The host drives time: it animates the pointer along a [`SpinPlan`], calls
//! [`SpinController::track`] on every poll while the pointer moves, then
//! [`SpinController::settle`] when the animation ends and
//! [`SpinController::commit`] with the precise resolution once the drama
//! delay has also elapsed.

use crate::config::{
    DRAMA_DURATION_MS, DRUM_ROLL_SHARE, ERROR_DISMISS_MS, HINT_CYCLE_MS, HINT_DISPLAY_MS,
    MIN_PARTICIPANTS, POWER_BASE_MULTIPLIER, POWER_DURATION_DIVISOR, POWER_RANDOM_VARIANCE,
    RESULT_DISPLAY_MS, SPIN_MAX_SECONDS, SPIN_MIN_SECONDS,
};
use crate::{resolve_lightweight, Participant, ResolveError};
use log::{debug, error, info, warn};
use rand::Rng;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinError {
    AlreadySpinning,
    /// A result or error overlay is still showing.
    Busy,
    NotEnoughParticipants { required: usize, found: usize },
}

impl fmt::Display for SpinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpinError::AlreadySpinning => write!(f, "A spin is already in progress"),
            SpinError::Busy => write!(f, "The previous result is still being shown"),
            SpinError::NotEnoughParticipants { required, found } => write!(
                f,
                "Need at least {} participants to spin, found {}",
                required, found
            ),
        }
    }
}

impl std::error::Error for SpinError {}

/// Overlay state after the wheel stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalculationPhase {
    #[default]
    Idle,
    DrumRoll,
    Calculating,
    Result,
    Error,
}

impl CalculationPhase {
    pub fn is_idle(self) -> bool {
        self == CalculationPhase::Idle
    }

    /// How long this phase stays up before returning to idle, if it does so on its own.
    pub fn auto_dismiss_ms(self) -> Option<u32> {
        match self {
            CalculationPhase::Result => Some(RESULT_DISPLAY_MS),
            CalculationPhase::Error => Some(ERROR_DISMISS_MS),
            _ => None,
        }
    }
}

/// Time spent in the drum roll once the pointer stops.
pub fn drum_roll_ms() -> u32 {
    (DRAMA_DURATION_MS as f64 * DRUM_ROLL_SHARE).round() as u32
}

/// Time spent "calculating" after the drum roll, before the result shows.
pub fn calculating_ms() -> u32 {
    DRAMA_DURATION_MS.saturating_sub(drum_roll_ms())
}

/// Whether the idle hint is showing `elapsed_ms` after the wheel became idle.
///
/// The hint shows for the first `HINT_DISPLAY_MS` of every `HINT_CYCLE_MS`,
/// and never while `active` is false.
pub fn hint_visible(active: bool, elapsed_ms: u64) -> bool {
    active && elapsed_ms % u64::from(HINT_CYCLE_MS) < u64::from(HINT_DISPLAY_MS)
}

/// One spin: a duration and the rotation to ease toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub duration_secs: f64,
    pub start_rotation: f64,
    pub target_rotation: f64,
}

impl SpinPlan {
    /// Total rotation added by this spin, in degrees.
    pub fn power(&self) -> f64 {
        self.target_rotation - self.start_rotation
    }

    pub fn progress(&self, elapsed_secs: f64) -> f64 {
        if self.duration_secs <= 0.0 {
            return 1.0;
        }
        (elapsed_secs / self.duration_secs).clamp(0.0, 1.0)
    }

    pub fn rotation_at(&self, elapsed_secs: f64) -> f64 {
        self.start_rotation + self.power() * ease_out(self.progress(elapsed_secs))
    }

    pub fn is_finished(&self, elapsed_secs: f64) -> bool {
        elapsed_secs >= self.duration_secs
    }
}

/// Draw a random duration and derive how far the pointer travels.
///
/// The target always lies ahead of `current_rotation`, so consecutive spins
/// keep turning the same way.
pub fn plan_spin<R: Rng + ?Sized>(rng: &mut R, current_rotation: f64) -> SpinPlan {
    let duration_secs = rng.random_range(SPIN_MIN_SECONDS..=SPIN_MAX_SECONDS);
    let jitter = rng.random::<f64>() * POWER_RANDOM_VARIANCE;
    let power = duration_secs / POWER_DURATION_DIVISOR * POWER_BASE_MULTIPLIER + jitter;
    SpinPlan {
        duration_secs,
        start_rotation: current_rotation,
        target_rotation: current_rotation + power,
    }
}

/// CSS `ease-out` timing, `cubic-bezier(0, 0, 0.58, 1)`.
pub fn ease_out(t: f64) -> f64 {
    cubic_bezier(0.0, 0.0, 0.58, 1.0, t)
}

/// Evaluate a unit cubic Bézier timing curve at time `t`.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;
    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample_x = |s: f64| ((ax * s + bx) * s + cx) * s;
    let sample_y = |s: f64| ((ay * s + by) * s + cy) * s;
    let slope_x = |s: f64| (3.0 * ax * s + 2.0 * bx) * s + cx;

    const EPSILON: f64 = 1e-7;

    // Newton-Raphson first, it converges in a few steps away from flat spots
    let mut s = t;
    for _ in 0..8 {
        let err = sample_x(s) - t;
        if err.abs() < EPSILON {
            return sample_y(s);
        }
        let d = slope_x(s);
        if d.abs() < 1e-6 {
            break;
        }
        s -= err / d;
    }

    // Bisection fallback
    let (mut lo, mut hi) = (0.0, 1.0);
    s = t;
    while lo < hi {
        let x = sample_x(s);
        if (x - t).abs() < EPSILON {
            break;
        }
        if t > x {
            lo = s;
        } else {
            hi = s;
        }
        let next = (lo + hi) / 2.0;
        if next == s {
            break;
        }
        s = next;
    }
    sample_y(s)
}

/// Spin lifecycle: idle → spinning → drum roll → calculating → result | error → idle.
#[derive(Debug, Clone, Default)]
pub struct SpinController {
    spinning: bool,
    phase: CalculationPhase,
    /// Id of the last pending payer published during the current spin.
    pending: Option<String>,
}

impl SpinController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    pub fn phase(&self) -> CalculationPhase {
        self.phase
    }

    /// Start a spin from `current_rotation`.
    pub fn begin<R: Rng + ?Sized>(
        &mut self,
        participant_count: usize,
        current_rotation: f64,
        rng: &mut R,
    ) -> Result<SpinPlan, SpinError> {
        if self.spinning {
            return Err(SpinError::AlreadySpinning);
        }
        if !self.phase.is_idle() {
            return Err(SpinError::Busy);
        }
        if participant_count < MIN_PARTICIPANTS {
            return Err(SpinError::NotEnoughParticipants {
                required: MIN_PARTICIPANTS,
                found: participant_count,
            });
        }

        let plan = plan_spin(rng, current_rotation);
        info!(
            "Spin started: {:.2}s, {:.1}° -> {:.1}°",
            plan.duration_secs, plan.start_rotation, plan.target_rotation
        );
        self.spinning = true;
        self.pending = None;
        Ok(plan)
    }

    /// Lightweight resolution for live feedback.
    ///
    /// Returns the pending payer only when it changed since the last call, and
    /// only while the pointer is still moving.
    pub fn track<'a>(
        &mut self,
        participants: &'a [Participant],
        rotation: f64,
    ) -> Option<&'a Participant> {
        if !self.spinning || !self.phase.is_idle() {
            return None;
        }
        let payer = resolve_lightweight(participants, rotation)?;
        if self.pending.as_deref() == Some(payer.id.as_str()) {
            return None;
        }
        debug!("Current payer updated (lightweight): {}", payer.name);
        self.pending = Some(payer.id.clone());
        Some(payer)
    }

    /// The pointer stopped moving. Stops tracking and starts the drum roll.
    pub fn settle(&mut self) -> bool {
        if !self.spinning {
            warn!("settle() called without a spin in progress");
            return false;
        }
        self.spinning = false;
        self.pending = None;
        self.phase = CalculationPhase::DrumRoll;
        true
    }

    pub fn advance_drama(&mut self) {
        if self.phase == CalculationPhase::DrumRoll {
            self.phase = CalculationPhase::Calculating;
        }
    }

    /// Record the precise resolution. Only this value ever becomes the winner.
    pub fn commit(&mut self, outcome: Result<Participant, ResolveError>) -> Option<Participant> {
        if !matches!(
            self.phase,
            CalculationPhase::DrumRoll | CalculationPhase::Calculating
        ) {
            warn!("commit() ignored in phase {:?}", self.phase);
            return None;
        }
        match outcome {
            Ok(winner) => {
                info!("Payer decided: {}", winner.name);
                self.phase = CalculationPhase::Result;
                Some(winner)
            }
            Err(e) => {
                error!("Failed to determine payer: {}", e);
                self.phase = CalculationPhase::Error;
                None
            }
        }
    }

    /// Return to idle once the result or error overlay has been shown.
    pub fn finish(&mut self) {
        self.phase = CalculationPhase::Idle;
    }

    /// Drop any in-flight spin without producing a result.
    pub fn abort(&mut self) {
        self.spinning = false;
        self.pending = None;
        self.phase = CalculationPhase::Idle;
    }
}
