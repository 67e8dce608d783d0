//! Charging-dot pulse animation for the circle meter.
//!
//! While the battery is charging, the dot in the middle of the circle pulses
//! between a dim floor and full brightness. The pulse is an asymmetric
//! triangle wave: fast steps in the dim half, slow steps in the bright half,
//! which reads as an ease-in/ease-out to the eye.
//!
//! ```text
//! alpha
//!  255 |            /\
//!      |          /    \          slow (5 per frame)
//!  105 |--------/--------\--------
//!      |      /            \      fast (10 per frame)
//!   25 |    /                \/
//!    5 |  /
//!    0 +---------------------------> frames
//! ```
//!
//! # Scheduling
//!
//! The animator never sleeps or owns a timer. Each frame that moves the
//! alpha records a wakeup request of [`CHARGE_WAKEUP_MS`](crate::config::CHARGE_WAKEUP_MS);
//! the host reads it via [`ChargeAnimator::next_wakeup_delay_ms`] and calls
//! `render()` again when it fires. Cancelling clears the request so a stale
//! callback never triggers another frame.

use log::trace;

use crate::battery::BatteryState;

// =============================================================================
// Alpha Animation Constants
// =============================================================================

/// Peak alpha. Held here once the battery is full.
pub const MAX_ALPHA: u8 = 255;

/// Floor of the pulse after the first cycle.
pub const MIN_ALPHA: u8 = 25;

/// Step used in the dim half of the wave.
pub const ALPHA_FAST_INCREMENT: u8 = 10;

/// Step used in the bright half of the wave, and for the very first frame.
pub const ALPHA_SLOW_INCREMENT: u8 = 5;

/// Alpha where the step size changes.
pub const SPEED_SWITCH_VALUE: u8 = 105;

// The wave must land exactly on its turning points
const _: () = assert!((SPEED_SWITCH_VALUE - ALPHA_SLOW_INCREMENT) % ALPHA_FAST_INCREMENT == 0);
const _: () = assert!((MAX_ALPHA - SPEED_SWITCH_VALUE) % ALPHA_SLOW_INCREMENT == 0);
const _: () = assert!((SPEED_SWITCH_VALUE - MIN_ALPHA) % ALPHA_FAST_INCREMENT == 0);

// =============================================================================
// Charge Animator
// =============================================================================

/// Alpha oscillator plus its pending redraw request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChargeAnimator {
    /// Alpha used for the most recent frame. 0 means idle.
    last_alpha: u8,

    /// Direction of travel.
    increasing: bool,

    /// Delay requested after each animated frame.
    wakeup_delay_ms: u32,

    /// Outstanding "render again in N ms" request.
    pending_wakeup: Option<u32>,
}

impl ChargeAnimator {
    pub const fn new(wakeup_delay_ms: u32) -> Self {
        Self {
            last_alpha: 0,
            increasing: true,
            wakeup_delay_ms,
            pending_wakeup: None,
        }
    }

    #[inline]
    pub const fn alpha(&self) -> u8 { self.last_alpha }

    #[inline]
    pub const fn is_increasing(&self) -> bool { self.increasing }

    /// Pending wakeup delay, if the pulse wants another frame.
    #[inline]
    pub const fn next_wakeup_delay_ms(&self) -> Option<u32> { self.pending_wakeup }

    /// Drop any pending wakeup request.
    #[inline]
    pub fn cancel(&mut self) { self.pending_wakeup = None; }

    /// Restart the wave from alpha 0 without touching the pending wakeup.
    pub fn restart_alpha(&mut self) {
        self.last_alpha = 0;
        self.increasing = true;
    }

    /// Back to idle: alpha 0, rising, nothing scheduled.
    pub fn reset(&mut self) {
        self.last_alpha = 0;
        self.increasing = true;
        self.cancel();
    }

    /// Run one animation frame for `battery` and return the dot alpha.
    ///
    /// Returns 0 (and resets) when the battery should not indicate charging.
    pub fn tick(
        &mut self,
        battery: &BatteryState,
    ) -> u8 {
        if !battery.should_indicate_charging() {
            self.reset();
            return 0;
        }

        let hold_at_max = battery.is_full() || battery.is_level_100();
        if self.advance(hold_at_max) {
            self.pending_wakeup = Some(self.wakeup_delay_ms);
        } else {
            // Frozen at full brightness, nothing left to animate
            self.cancel();
        }
        self.last_alpha
    }

    /// Step the alpha once. Returns `false` when held at [`MAX_ALPHA`].
    pub fn advance(
        &mut self,
        hold_at_max: bool,
    ) -> bool {
        let alpha = self.last_alpha;
        self.last_alpha = match alpha {
            0 => {
                self.increasing = true;
                ALPHA_SLOW_INCREMENT
            }
            MAX_ALPHA => {
                if hold_at_max {
                    return false;
                }
                self.increasing = false;
                MAX_ALPHA - ALPHA_SLOW_INCREMENT
            }
            MIN_ALPHA => {
                self.increasing = true;
                MIN_ALPHA + ALPHA_FAST_INCREMENT
            }
            _ if self.increasing => {
                if alpha < SPEED_SWITCH_VALUE {
                    alpha.saturating_add(ALPHA_FAST_INCREMENT)
                } else {
                    alpha.saturating_add(ALPHA_SLOW_INCREMENT)
                }
            }
            _ => {
                if alpha > SPEED_SWITCH_VALUE {
                    alpha.saturating_sub(ALPHA_SLOW_INCREMENT)
                } else {
                    alpha.saturating_sub(ALPHA_FAST_INCREMENT)
                }
            }
        };
        trace!("charge dot alpha {alpha} -> {}", self.last_alpha);
        true
    }
}

impl Default for ChargeAnimator {
    fn default() -> Self { Self::new(crate::config::CHARGE_WAKEUP_MS) }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battery::{BatteryStatus, PluggedType};

    fn charging(level: i32) -> BatteryState { BatteryState::with_level(level, PluggedType::Ac, BatteryStatus::Charging) }

    fn trace_from_reset(frames: usize) -> std::vec::Vec<u8> {
        let mut anim = ChargeAnimator::default();
        (0..frames)
            .map(|_| {
                anim.advance(false);
                anim.alpha()
            })
            .collect()
    }

    #[test]
    fn test_initial_ramp_fast_then_slow() {
        let trace = trace_from_reset(14);
        assert_eq!(
            &trace[..],
            &[5, 15, 25, 35, 45, 55, 65, 75, 85, 95, 105, 110, 115, 120],
            "ramp should be fast below 105 and slow above"
        );
    }

    #[test]
    fn test_reaches_max_then_descends_mirrored() {
        let trace = trace_from_reset(80);
        let peak = trace.iter().position(|&a| a == MAX_ALPHA).expect("should reach 255");
        // 5..105 takes 11 frames, 105..255 takes 30 more
        assert_eq!(peak, 40);
        assert_eq!(trace[peak + 1], 250);
        // Descent mirrors the ascent: slow down to 105, fast below it
        let at_105 = peak + 30;
        assert_eq!(trace[at_105], SPEED_SWITCH_VALUE);
        assert_eq!(trace[at_105 + 1], 95);
        assert_eq!(trace[at_105 + 8], MIN_ALPHA);
        assert_eq!(trace[at_105 + 9], 35, "floor should flip back to rising");
    }

    #[test]
    fn test_cycle_is_periodic_and_bounded() {
        let trace = trace_from_reset(400);
        // Everything after the initial 0 -> 5 -> 15 ramp stays in [25, 255]
        for (i, &a) in trace.iter().enumerate().skip(2) {
            assert!((MIN_ALPHA..=MAX_ALPHA).contains(&a), "frame {i}: alpha {a} out of range");
        }
        let floors: std::vec::Vec<usize> =
            trace.iter().enumerate().filter(|&(_, &a)| a == MIN_ALPHA).map(|(i, _)| i).collect();
        assert!(floors.len() >= 4);
        let period = floors[2] - floors[1];
        assert_eq!(floors[3] - floors[2], period, "pulse should be periodic");
        assert_eq!(period, 2 * (8 + 30), "period is 8 fast + 30 slow frames each way");
    }

    #[test]
    fn test_holds_at_max_when_full() {
        let mut anim = ChargeAnimator::default();
        while anim.alpha() != MAX_ALPHA {
            anim.advance(true);
        }
        assert!(!anim.advance(true), "should freeze at 255");
        assert_eq!(anim.alpha(), MAX_ALPHA);
        assert!(anim.advance(false), "should resume once no longer full");
        assert_eq!(anim.alpha(), 250);
    }

    #[test]
    fn test_tick_schedules_wakeup_while_charging() {
        let mut anim = ChargeAnimator::default();
        assert_eq!(anim.next_wakeup_delay_ms(), None);

        let alpha = anim.tick(&charging(50));
        assert_eq!(alpha, 5);
        assert_eq!(anim.next_wakeup_delay_ms(), Some(50));
    }

    #[test]
    fn test_tick_resets_when_not_charging() {
        let mut anim = ChargeAnimator::default();
        for _ in 0..10 {
            anim.tick(&charging(50));
        }
        assert!(anim.alpha() > 0);

        let unplugged = BatteryState::with_level(50, PluggedType::None, BatteryStatus::Discharging);
        assert_eq!(anim.tick(&unplugged), 0);
        assert_eq!(anim.alpha(), 0);
        assert!(anim.is_increasing());
        assert_eq!(anim.next_wakeup_delay_ms(), None, "wakeup should be cancelled");
    }

    #[test]
    fn test_tick_full_stops_scheduling_at_max() {
        let mut anim = ChargeAnimator::default();
        let full = BatteryState::with_level(100, PluggedType::Ac, BatteryStatus::Full);
        for _ in 0..41 {
            anim.tick(&full);
        }
        assert_eq!(anim.alpha(), MAX_ALPHA);
        assert_eq!(anim.next_wakeup_delay_ms(), Some(50), "the frame that reached 255 still stepped");

        anim.tick(&full);
        assert_eq!(anim.alpha(), MAX_ALPHA);
        assert_eq!(anim.next_wakeup_delay_ms(), None, "frozen dot needs no more frames");
    }

    #[test]
    fn test_restart_alpha_keeps_wakeup() {
        let mut animator = ChargeAnimator::new(50);
        let battery = BatteryState::with_level(40, PluggedType::Ac, BatteryStatus::Charging);
        animator.tick(&battery);
        animator.tick(&battery);

        animator.restart_alpha();
        assert_eq!(animator.alpha(), 0);
        assert!(animator.is_increasing());
        assert_eq!(animator.next_wakeup_delay_ms(), Some(50), "scheduled frame survives");
    }

    #[test]
    fn test_reset_clears_state() {
        let mut anim = ChargeAnimator::default();
        anim.tick(&charging(30));
        anim.reset();
        assert_eq!(anim, ChargeAnimator::default());
    }
}
