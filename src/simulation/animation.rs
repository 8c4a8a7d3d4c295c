//! Presentation offsets for shopping pedestrians
//!
//! Stateless: the offset is a function of phase and progress only, plus a
//! small random jitter while paying (shuffling at the till).

use crate::core::types::Vec2;
use crate::entity::shopping::{ShoppingPhase, BROWSING_END, PAYING_END};
use rand::Rng;
use std::f32::consts::{PI, TAU};

const BROWSE_SWAY: f32 = 0.25;
const PAY_JITTER: f32 = 0.04;
const LEAVE_DRIFT: f32 = 0.35;

/// Largest offset any phase can produce (tiles)
pub const MAX_OFFSET: f32 = 0.5;

/// Small oscillating offset (in tiles) for the renderer
pub fn animation_offset<R: Rng + ?Sized>(phase: ShoppingPhase, progress: f32, rng: &mut R) -> Vec2 {
    let progress = if progress.is_finite() { progress.clamp(0.0, 1.0) } else { 0.0 };

    match phase {
        ShoppingPhase::None => Vec2::ZERO,
        ShoppingPhase::Browsing => {
            // Wander between shelves
            let t = progress / BROWSING_END;
            Vec2::new((t * TAU * 2.0).sin() * BROWSE_SWAY, (t * TAU).cos() * BROWSE_SWAY * 0.3)
        }
        ShoppingPhase::Paying => {
            let t = (progress - BROWSING_END) / (PAYING_END - BROWSING_END);
            let bob = (t * TAU * 4.0).sin() * PAY_JITTER * 0.5;
            Vec2::new(
                rng.gen_range(-PAY_JITTER..=PAY_JITTER),
                bob + rng.gen_range(-PAY_JITTER..=PAY_JITTER),
            )
        }
        ShoppingPhase::Leaving => {
            let t = ((progress - PAYING_END) / (1.0 - PAYING_END)).clamp(0.0, 1.0);
            Vec2::new((t * PI).sin() * LEAVE_DRIFT * 0.5, -t * LEAVE_DRIFT)
        }
    }
}
