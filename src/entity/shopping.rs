//! Shopping sub-record carried by every autonomous pedestrian

use crate::core::types::GridCoord;
use serde::{Deserialize, Serialize};

/// Progress below this is browsing
pub const BROWSING_END: f32 = 0.3;
/// Progress below this (and at or above `BROWSING_END`) is paying
pub const PAYING_END: f32 = 0.7;

/// Satisfaction a fresh or legacy record starts with
pub const DEFAULT_SATISFACTION: f32 = 0.5;

/// Where a pedestrian is in the shopping cycle
///
/// A single enum so that "not shopping" and each active band are mutually
/// exclusive by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShoppingPhase {
    #[default]
    None,
    Browsing,
    Paying,
    Leaving,
}

impl ShoppingPhase {
    /// Active band for a point on the progress ramp
    pub fn from_progress(progress: f32) -> Self {
        if progress < BROWSING_END {
            ShoppingPhase::Browsing
        } else if progress < PAYING_END {
            ShoppingPhase::Paying
        } else {
            ShoppingPhase::Leaving
        }
    }

    pub fn is_active(&self) -> bool {
        *self != ShoppingPhase::None
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShoppingPhase::None => "none",
            ShoppingPhase::Browsing => "browsing",
            ShoppingPhase::Paying => "paying",
            ShoppingPhase::Leaving => "leaving",
        }
    }
}

/// Budget, satisfaction and the current trip of one pedestrian
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoppingState {
    pub phase: ShoppingPhase,
    /// 0.0 at trip start, trip completes at 1.0
    pub progress: f32,
    /// Trip length in seconds
    pub duration: f32,
    /// Display-only destination; trips complete on time, not arrival
    pub target_shop: Option<GridCoord>,
    pub budget: f32,
    pub items_bought: u32,
    pub visits_today: u32,
    pub last_visit_time: f32,
    /// 0.0 = miserable, 1.0 = content
    pub satisfaction: f32,
    pub total_spent: f32,
}

impl Default for ShoppingState {
    fn default() -> Self {
        Self {
            phase: ShoppingPhase::None,
            progress: 0.0,
            duration: 0.0,
            target_shop: None,
            budget: 0.0,
            items_bought: 0,
            visits_today: 0,
            last_visit_time: 0.0,
            satisfaction: DEFAULT_SATISFACTION,
            total_spent: 0.0,
        }
    }
}

impl ShoppingState {
    pub fn with_budget(budget: f32) -> Self {
        let mut state = Self {
            budget,
            ..Self::default()
        };
        state.hydrate();
        state
    }

    #[inline]
    pub fn is_shopping(&self) -> bool {
        self.phase.is_active()
    }

    /// Adjust satisfaction, keeping it within [0, 1]
    ///
    /// A NaN result keeps the previous value (or the default if that was
    /// not a number either).
    pub fn add_satisfaction(&mut self, delta: f32) {
        let next = self.satisfaction + delta;
        if !next.is_nan() {
            self.satisfaction = next.clamp(0.0, 1.0);
        } else if self.satisfaction.is_nan() {
            self.satisfaction = DEFAULT_SATISFACTION;
        }
    }

    /// Normalize a record after load or construction.
    ///
    /// Non-finite or out-of-range values fall back to their defaults and an
    /// active trip that cannot run (no usable duration) is closed. Returns
    /// true if anything was changed.
    pub fn hydrate(&mut self) -> bool {
        let before = self.clone();

        if !self.satisfaction.is_finite() {
            self.satisfaction = DEFAULT_SATISFACTION;
        }
        self.satisfaction = self.satisfaction.clamp(0.0, 1.0);

        if !self.budget.is_finite() || self.budget < 0.0 {
            self.budget = 0.0;
        }
        if !self.total_spent.is_finite() || self.total_spent < 0.0 {
            self.total_spent = 0.0;
        }
        if !self.last_visit_time.is_finite() {
            self.last_visit_time = 0.0;
        }

        if self.is_shopping() {
            if !self.duration.is_finite() || self.duration <= 0.0 {
                self.close_trip();
            } else {
                if !(0.0..1.0).contains(&self.progress) {
                    self.progress = 0.0;
                }
                self.phase = ShoppingPhase::from_progress(self.progress);
            }
        } else {
            self.progress = 0.0;
            self.target_shop = None;
            if !self.duration.is_finite() || self.duration < 0.0 {
                self.duration = 0.0;
            }
        }

        *self != before
    }

    /// Leave the active phase and reset the ramp
    pub(crate) fn close_trip(&mut self) {
        self.phase = ShoppingPhase::None;
        self.progress = 0.0;
        self.target_shop = None;
    }
}
