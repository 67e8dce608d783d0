//! Keyboard-driven stand-in for the battery service.
//!
//! Produces raw telemetry (level/scale, plug code, status code) the way a
//! platform battery broadcast would, and lets the engine normalise it.

use battery_meter::BatteryState;

/// Raw scale reported alongside the level.
const SCALE: i32 = 100;

const PLUGGED_AC: i32 = 1;

const STATUS_UNKNOWN: i32 = 1;
const STATUS_CHARGING: i32 = 2;
const STATUS_DISCHARGING: i32 = 3;
const STATUS_FULL: i32 = 5;

pub struct SyntheticBattery {
    level: i32,
    plugged: bool,
    unknown_status: bool,
}

impl SyntheticBattery {
    pub fn new(level: i32) -> Self {
        Self {
            level: level.clamp(0, SCALE),
            plugged: false,
            unknown_status: false,
        }
    }

    pub fn level(&self) -> i32 { self.level }

    pub fn adjust(
        &mut self,
        delta: i32,
    ) {
        self.level = (self.level + delta).clamp(0, SCALE);
    }

    pub fn toggle_plugged(&mut self) { self.plugged = !self.plugged; }

    pub fn toggle_unknown_status(&mut self) { self.unknown_status = !self.unknown_status; }

    /// One step of the auto-drain cycle: charge while plugged, drain while not,
    /// flipping the plug at the ends.
    pub fn drain_step(&mut self) {
        if self.plugged {
            self.adjust(1);
            if self.level >= SCALE {
                self.plugged = false;
            }
        } else {
            self.adjust(-1);
            if self.level <= 0 {
                self.plugged = true;
            }
        }
    }

    pub fn to_state(&self) -> BatteryState {
        let status = match (self.unknown_status, self.plugged) {
            (true, _) => STATUS_UNKNOWN,
            (false, true) if self.level >= SCALE => STATUS_FULL,
            (false, true) => STATUS_CHARGING,
            (false, false) => STATUS_DISCHARGING,
        };
        let plugged = if self.plugged { PLUGGED_AC } else { 0 };
        BatteryState::from_raw(self.level, SCALE, plugged, status)
    }
}
