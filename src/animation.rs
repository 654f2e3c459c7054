//! Stepped animation of the displayed value toward the requested target.
//!
//! The driver is a two-state machine (`Idle`, `Animating`). Each request
//! starts a [`StepLoop`]: a cancelable repeating task that moves the displayed
//! value one step every [`STEP_PERIOD_MS`] and asks the host to redraw after
//! every step. A newer request cancels the running loop and starts a fresh
//! one from wherever the displayed value currently is, so only one loop ever
//! moves the value.
//!
//! Time is injected: hosts call [`AnimationDriver::tick`] with the current
//! time from their event loop.
//!
//! # Example
//!
//! ```rust
//! use speedometer::animation::{AnimationDriver, RedrawCounter, STEP_PERIOD_MS};
//! use speedometer::GaugeConfig;
//!
//! let config = GaugeConfig::default();
//! let mut driver = AnimationDriver::new(&config).unwrap();
//! let mut redraw = RedrawCounter::default();
//!
//! driver.request_value(3, 0, &mut redraw);
//! driver.tick(3 * STEP_PERIOD_MS, &mut redraw);
//! assert_eq!(driver.displayed_value(), 3);
//! assert!(!driver.is_animating());
//! ```

use tracing::{debug, info, trace};

use crate::config::GaugeConfig;
use crate::error::Result;

/// Delay between two animation steps, in milliseconds.
pub const STEP_PERIOD_MS: u64 = 15;

/// Receiver of redraw requests.
pub trait Invalidate {
    /// The displayed value changed; the gauge must be drawn again.
    fn invalidate(&mut self);
}

/// Counts redraw requests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RedrawCounter {
    pub count: usize,
}

impl Invalidate for RedrawCounter {
    fn invalidate(&mut self) {
        self.count += 1;
    }
}

/// Observable state of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Animating { target: i64 },
}

/// A scheduled, cancelable repeating step task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepLoop {
    id: u64,
    target: i64,
    /// Signed: positive when counting up.
    step: i64,
    period_ms: u64,
    next_due_ms: u64,
    cancelled: bool,
}

impl StepLoop {
    fn start(id: u64, from: i64, target: i64, step_size: i64, now_ms: u64) -> Self {
        let step = if target >= from { step_size } else { -step_size };
        Self {
            id,
            target,
            step,
            period_ms: STEP_PERIOD_MS,
            next_due_ms: now_ms + STEP_PERIOD_MS,
            cancelled: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    pub fn next_due_ms(&self) -> u64 {
        self.next_due_ms
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Stops the loop. Returns `true` only for the call that actually cancelled it.
    pub fn cancel(&mut self) -> bool {
        !std::mem::replace(&mut self.cancelled, true)
    }

    fn is_due(&self, now_ms: u64) -> bool {
        !self.cancelled && self.next_due_ms <= now_ms
    }

    /// Next value after `current`, never past the target.
    fn advance(&mut self, current: i64) -> i64 {
        self.next_due_ms += self.period_ms;
        let next = current.saturating_add(self.step);
        if self.step > 0 {
            next.min(self.target)
        } else {
            next.max(self.target)
        }
    }
}

/// Owns the displayed value and moves it toward the latest requested target.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    min_value: i64,
    max_value: i64,
    step_size: i64,
    displayed: i64,
    target: i64,
    active: Option<StepLoop>,
    next_loop_id: u64,
}

impl AnimationDriver {
    /// Starts idle at the bottom of the range.
    pub fn new(config: &GaugeConfig) -> Result<Self> {
        Self::with_initial(config, config.min_value)
    }

    /// Starts idle at `initial`, clamped to the range. Fails on an invalid config.
    pub fn with_initial(config: &GaugeConfig, initial: i64) -> Result<Self> {
        config.validate()?;
        let initial = config.clamp(initial);
        Ok(Self {
            min_value: config.min_value,
            max_value: config.max_value,
            step_size: config.variant.step(),
            displayed: initial,
            target: initial,
            active: None,
            next_loop_id: 0,
        })
    }

    pub fn displayed_value(&self) -> i64 {
        self.displayed
    }

    pub fn target_value(&self) -> i64 {
        self.target
    }

    pub fn state(&self) -> DriverState {
        match self.active {
            Some(ref active) => DriverState::Animating {
                target: active.target(),
            },
            None => DriverState::Idle,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// When the next step is due, if animating.
    pub fn next_step_due(&self) -> Option<u64> {
        self.active.as_ref().map(StepLoop::next_due_ms)
    }

    /// Points the gauge at `value`. Out-of-range values are clamped.
    ///
    /// A running animation is superseded: its loop is cancelled and a new one
    /// starts from the current displayed value.
    pub fn request_value(
        &mut self,
        value: i64,
        now_ms: u64,
        redraw: &mut impl Invalidate,
    ) -> DriverState {
        let clamped = value.clamp(self.min_value, self.max_value);
        if clamped != value {
            debug!(requested = value, clamped, "value outside gauge range");
        }
        self.target = clamped;

        let superseded = self.active.take().map(|mut previous| {
            if previous.cancel() {
                debug!(
                    loop_id = previous.id(),
                    previous_target = previous.target(),
                    new_target = clamped,
                    "animation superseded"
                );
            }
            previous
        });

        if clamped == self.displayed {
            if superseded.is_some() {
                redraw.invalidate();
                info!(value = self.displayed, "animation stopped at requested value");
            }
            return DriverState::Idle;
        }

        let id = self.next_loop_id;
        self.next_loop_id += 1;
        self.active = Some(StepLoop::start(
            id,
            self.displayed,
            clamped,
            self.step_size,
            now_ms,
        ));
        info!(loop_id = id, from = self.displayed, to = clamped, "animation started");
        self.state()
    }

    /// Runs every step that is due at `now_ms`. Returns the number of steps taken.
    pub fn tick(&mut self, now_ms: u64, redraw: &mut impl Invalidate) -> usize {
        let mut steps = 0;
        while let Some(active) = self.active.as_mut() {
            if !active.is_due(now_ms) {
                break;
            }
            self.displayed = active.advance(self.displayed);
            steps += 1;
            trace!(loop_id = active.id(), value = self.displayed, "animation step");
            redraw.invalidate();

            if self.displayed == active.target() {
                active.cancel();
                let id = active.id();
                self.active = None;
                redraw.invalidate();
                info!(loop_id = id, value = self.displayed, "animation finished");
            }
        }
        steps
    }
}
