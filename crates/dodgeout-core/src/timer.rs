//! Countdown timers measured in microseconds.
//!
//! - [`Timer`]: elapsed time against a target duration
//! - [`ActionTimer`]: a [`Timer`] that releases registered actions once as
//!   the elapsed fraction of the target passes each action's threshold
//!
//! Actions are plain values rather than stored callbacks. [`ActionTimer::update`]
//! returns the payloads that fired and the owner decides what each one means,
//! which keeps the owner free to mutate itself in response.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Signed microsecond count.
pub type Micros = i64;

// =============================================================================
// Timer
// =============================================================================

/// Elapsed time against a target.
///
/// # Example
///
/// ```
/// use dodgeout_core::timer::Timer;
///
/// let mut timer = Timer::new(1_000);
/// timer.update(400);
/// assert_eq!(timer.time_remaining(), 600);
/// timer.update(600);
/// assert!(timer.is_over());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timer {
    time_to_reach: Micros,
    elapsed: Micros,
}

impl Timer {
    /// Creates a timer with the given target.
    #[must_use]
    pub const fn new(time_to_reach: Micros) -> Self {
        Self {
            time_to_reach,
            elapsed: 0,
        }
    }

    /// Advances elapsed time.
    pub fn update(&mut self, dt: Micros) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    /// Returns true once elapsed time has reached the target.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.elapsed >= self.time_to_reach
    }

    /// Rewinds elapsed time to zero.
    pub fn reset(&mut self) {
        self.elapsed = 0;
    }

    /// Changes the target. Non-positive targets are ignored.
    pub fn set_time_to_reach(&mut self, time_to_reach: Micros) {
        if time_to_reach <= 0 {
            return;
        }
        self.time_to_reach = time_to_reach;
    }

    /// The target duration.
    #[must_use]
    pub const fn time_to_reach(&self) -> Micros {
        self.time_to_reach
    }

    /// Elapsed time so far.
    #[must_use]
    pub const fn elapsed(&self) -> Micros {
        self.elapsed
    }

    /// Target minus elapsed; negative once overshot.
    #[must_use]
    pub const fn time_remaining(&self) -> Micros {
        self.time_to_reach - self.elapsed
    }

    /// `elapsed / target`, or 1.0 for a zero target.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn proportion_elapsed(&self) -> f64 {
        if self.time_to_reach <= 0 {
            return 1.0;
        }
        self.elapsed as f64 / self.time_to_reach as f64
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(1_000_000)
    }
}

// =============================================================================
// ActionTimer
// =============================================================================

/// A registered action and its activation point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedAction<A> {
    /// Payload handed back when the action fires.
    pub action: A,
    /// Fraction of the target duration, in `[0, 1]`.
    pub fraction: f64,
    /// Whether the action already fired this cycle.
    pub fired: bool,
}

/// A [`Timer`] that releases each registered action once per cycle.
///
/// An action fires on the first [`ActionTimer::update`] where
/// `elapsed / target >= fraction`, however far that update overshoots the
/// threshold. It does not fire again until [`ActionTimer::reset`].
///
/// Actions are kept in name order; that is also the order in which several
/// actions crossing their threshold in the same update are returned.
///
/// # Example
///
/// ```
/// use dodgeout_core::timer::ActionTimer;
///
/// let mut timer = ActionTimer::new(100);
/// timer.add_action("halfway", 'h', 0.5);
///
/// assert!(timer.update(40).is_empty());
/// assert_eq!(timer.update(20), vec!['h']);
/// assert!(timer.update(20).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionTimer<A> {
    timer: Timer,
    actions: BTreeMap<String, TimedAction<A>>,
}

impl<A: Clone> ActionTimer<A> {
    /// Creates an action timer with no actions.
    #[must_use]
    pub fn new(time_to_reach: Micros) -> Self {
        Self {
            timer: Timer::new(time_to_reach),
            actions: BTreeMap::new(),
        }
    }

    /// Registers `action` under `name` at `fraction` of the target.
    ///
    /// Fractions outside `[0, 1]` are ignored. An existing action with the
    /// same name is replaced.
    pub fn add_action(&mut self, name: impl Into<String>, action: A, fraction: f64) {
        if !(0.0..=1.0).contains(&fraction) {
            return;
        }
        self.actions.insert(
            name.into(),
            TimedAction {
                action,
                fraction,
                fired: false,
            },
        );
    }

    /// Removes the action registered under `name`.
    pub fn remove_action(&mut self, name: &str) -> Option<A> {
        self.actions.remove(name).map(|entry| entry.action)
    }

    /// Removes every action registered at exactly `fraction`.
    ///
    /// Returns how many were removed.
    #[allow(clippy::float_cmp)]
    pub fn remove_actions_at(&mut self, fraction: f64) -> usize {
        let before = self.actions.len();
        self.actions.retain(|_, entry| entry.fraction != fraction);
        before - self.actions.len()
    }

    /// Removes every action permanently.
    pub fn clear_actions(&mut self) {
        self.actions.clear();
    }

    /// Advances time and returns the payloads of actions that fired.
    pub fn update(&mut self, dt: Micros) -> Vec<A> {
        self.timer.update(dt);
        let progress = self.timer.proportion_elapsed();

        self.actions
            .values_mut()
            .filter(|entry| !entry.fired && entry.fraction <= progress)
            .map(|entry| {
                entry.fired = true;
                entry.action.clone()
            })
            .collect()
    }

    /// Rewinds the timer and re-arms every action.
    pub fn reset(&mut self) {
        self.timer.reset();
        for entry in self.actions.values_mut() {
            entry.fired = false;
        }
    }

    /// Returns true once elapsed time has reached the target.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.timer.is_over()
    }

    /// Changes the target. Non-positive targets are ignored.
    pub fn set_time_to_reach(&mut self, time_to_reach: Micros) {
        self.timer.set_time_to_reach(time_to_reach);
    }

    /// The underlying timer.
    #[must_use]
    pub const fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Number of registered actions.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Whether the named action fired this cycle. `None` if unknown.
    #[must_use]
    pub fn has_fired(&self, name: &str) -> Option<bool> {
        self.actions.get(name).map(|entry| entry.fired)
    }
}
