//! Demo mode and level-test drivers.
//!
//! # Demo Override
//!
//! Screenshot tooling drives the meter with `enter` / `battery` / `exit`
//! commands. While active, a [`DemoOverride`] shadows the live telemetry:
//! it is seeded from the live level and plug state on entry, edited by
//! `battery` commands, and dropped on exit.
//!
//! # Level Sweep
//!
//! [`LevelSweep`] replays a full charge/discharge cycle (0 -> 100 plugged,
//! then 100 -> 0 unplugged) one step every [`LevelSweep::STEP_MS`], then
//! hands back the saved live state so the host can restore it.

use log::debug;

use crate::battery::{BatteryState, BatteryStatus, LEVEL_MAX, PluggedType, clamp_level};
use crate::error::{MeterError, Result};

// =============================================================================
// Demo Override
// =============================================================================

/// Substitute battery values shown while demo mode is active.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DemoOverride {
    pub level: Option<u8>,
    pub plugged: bool,
}

impl DemoOverride {
    /// Seed from the live state at the moment demo mode is entered.
    pub fn seeded_from(live: &BatteryState) -> Self {
        Self {
            level: live.level,
            plugged: live.plugged(),
        }
    }

    /// Apply a `battery` command. Missing fields keep their current value.
    pub fn apply(
        &mut self,
        level: Option<i32>,
        plugged: Option<bool>,
    ) {
        if let Some(level) = level {
            self.level = Some(clamp_level(level));
        }
        if let Some(plugged) = plugged {
            self.plugged = plugged;
        }
    }

    /// Battery state to render while this override is active.
    ///
    /// Level and plug state come from the override; status is derived from
    /// them so the circle's charging dot behaves as it would for real
    /// telemetry. Remaining fields are taken from `live`.
    pub fn battery_state(
        &self,
        live: &BatteryState,
    ) -> BatteryState {
        let plugged_type = match (self.plugged, live.plugged_type) {
            (false, _) => PluggedType::None,
            (true, PluggedType::None) => PluggedType::Ac,
            (true, live_type) => live_type,
        };
        let status = match (self.plugged, self.level) {
            (true, Some(LEVEL_MAX)) => BatteryStatus::Full,
            (true, _) => BatteryStatus::Charging,
            (false, _) => BatteryStatus::Discharging,
        };
        BatteryState {
            present: true,
            level: self.level,
            plugged_type,
            status,
            ..live.clone()
        }
    }
}

// =============================================================================
// Demo Commands
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DemoCommand {
    Enter,
    Exit,
    Battery { level: Option<i32>, plugged: Option<bool> },
}

impl DemoCommand {
    /// Parse a demo command with its optional string arguments.
    ///
    /// `level` must be an integer and `plugged` must be `true` or `false`
    /// (any case). Out-of-range levels parse fine and are clamped later.
    pub fn parse(
        command: &str,
        level: Option<&str>,
        plugged: Option<&str>,
    ) -> Result<Self> {
        match command {
            "enter" => Ok(Self::Enter),
            "exit" => Ok(Self::Exit),
            "battery" => {
                let level = level
                    .map(|s| s.trim().parse::<i32>())
                    .transpose()
                    .map_err(|_| MeterError::InvalidDemoPayload("level"))?;
                let plugged = plugged.map(parse_bool).transpose()?;
                debug!("demo battery command level={level:?} plugged={plugged:?}");
                Ok(Self::Battery { level, plugged })
            }
            _ => Err(MeterError::UnknownDemoCommand),
        }
    }
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if s.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(MeterError::InvalidDemoPayload("plugged"))
    }
}

// =============================================================================
// Level Sweep
// =============================================================================

/// Synthetic charge/discharge cycle for eyeballing every level.
#[derive(Clone, Debug)]
pub struct LevelSweep {
    current: i32,
    step: i32,
    saved: Option<BatteryState>,
}

impl LevelSweep {
    /// Delay between sweep steps.
    pub const STEP_MS: u32 = 200;

    /// Start a sweep, remembering `live` for the final restore step.
    pub fn new(live: &BatteryState) -> Self {
        Self {
            current: 0,
            step: 1,
            saved: Some(live.clone()),
        }
    }
}

impl Iterator for LevelSweep {
    type Item = BatteryState;

    fn next(&mut self) -> Option<BatteryState> {
        if self.current < 0 {
            // Sweep finished: hand back the live state once, then stop
            return self.saved.take();
        }

        let plugged = self.step > 0;
        let state = BatteryState::with_level(
            self.current,
            if plugged { PluggedType::Ac } else { PluggedType::None },
            if plugged { BatteryStatus::Charging } else { BatteryStatus::Discharging },
        );

        self.current += self.step;
        if self.current == i32::from(LEVEL_MAX) {
            self.step = -self.step;
        }
        Some(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live() -> BatteryState { BatteryState::with_level(64, PluggedType::Usb, BatteryStatus::Charging) }

    #[test]
    fn test_seeded_from_live() {
        let demo = DemoOverride::seeded_from(&live());
        assert_eq!(demo.level, Some(64));
        assert!(demo.plugged);
    }

    #[test]
    fn test_apply_clamps_level() {
        let mut demo = DemoOverride::seeded_from(&live());
        demo.apply(Some(150), None);
        assert_eq!(demo.level, Some(100));
        assert!(demo.plugged, "missing plugged should keep previous value");

        demo.apply(Some(-20), Some(false));
        assert_eq!(demo.level, Some(0));
        assert!(!demo.plugged);
    }

    #[test]
    fn test_battery_state_derives_status() {
        let live = live();
        let demo = DemoOverride { level: Some(100), plugged: true };
        let state = demo.battery_state(&live);
        assert_eq!(state.status, BatteryStatus::Full);
        assert_eq!(state.plugged_type, PluggedType::Usb, "keeps the live charger type");

        let demo = DemoOverride { level: Some(30), plugged: false };
        let state = demo.battery_state(&live);
        assert_eq!(state.status, BatteryStatus::Discharging);
        assert!(!state.plugged());
        assert_eq!(state.level, Some(30));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(DemoCommand::parse("enter", None, None), Ok(DemoCommand::Enter));
        assert_eq!(DemoCommand::parse("exit", None, None), Ok(DemoCommand::Exit));
        assert_eq!(
            DemoCommand::parse("battery", Some("42"), Some("TRUE")),
            Ok(DemoCommand::Battery { level: Some(42), plugged: Some(true) })
        );
        assert_eq!(
            DemoCommand::parse("battery", None, Some("false")),
            Ok(DemoCommand::Battery { level: None, plugged: Some(false) })
        );
    }

    #[test]
    fn test_parse_rejects_bad_payloads() {
        assert_eq!(
            DemoCommand::parse("battery", Some("lots"), None),
            Err(MeterError::InvalidDemoPayload("level"))
        );
        assert_eq!(
            DemoCommand::parse("battery", None, Some("maybe")),
            Err(MeterError::InvalidDemoPayload("plugged"))
        );
        assert_eq!(DemoCommand::parse("network", None, None), Err(MeterError::UnknownDemoCommand));
    }

    #[test]
    fn test_level_sweep_cycle() {
        let frames: std::vec::Vec<BatteryState> = LevelSweep::new(&live()).collect();
        // 0..=99 plugged, 100..=0 unplugged, then the restore
        assert_eq!(frames.len(), 100 + 101 + 1);

        assert_eq!(frames[0].level, Some(0));
        assert!(frames[0].plugged());
        assert_eq!(frames[99].level, Some(99));
        assert!(frames[99].plugged());

        assert_eq!(frames[100].level, Some(100));
        assert!(!frames[100].plugged(), "direction flips before 100 is emitted");
        assert_eq!(frames[200].level, Some(0));

        assert_eq!(frames[201], live(), "last frame restores live state");
    }
}
