//! Battery snapshot value types.
//!
//! A [`BatteryState`] is replaced wholesale on every telemetry update; nothing
//! in the engine mutates one in place.
//!
//! # Level Normalisation
//!
//! Telemetry reports a raw level and a scale. The percentage is computed as
//! `100 * level / scale` and clamped to `0..=100`. A scale of zero yields an
//! unknown level rather than a division fault.

use log::warn;

/// Maximum battery percentage.
pub const LEVEL_MAX: u8 = 100;

/// Charger source.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum PluggedType {
    #[default]
    None,
    Ac,
    Usb,
    Wireless,
}

impl PluggedType {
    /// Map the platform plugged bitmask (1 = AC, 2 = USB, 4 = wireless).
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Ac,
            2 => Self::Usb,
            4 => Self::Wireless,
            // Unrecognised non-zero codes still mean "something is plugged in"
            _ => Self::Ac,
        }
    }

    #[inline]
    pub const fn is_plugged(self) -> bool { !matches!(self, Self::None) }
}

/// Charging status as reported by the battery service.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum BatteryStatus {
    #[default]
    Unknown,
    Charging,
    Discharging,
    NotCharging,
    Full,
}

impl BatteryStatus {
    /// Map the platform status code (1 = unknown .. 5 = full).
    pub const fn from_code(code: i32) -> Self {
        match code {
            2 => Self::Charging,
            3 => Self::Discharging,
            4 => Self::NotCharging,
            5 => Self::Full,
            _ => Self::Unknown,
        }
    }
}

/// Battery health. Carried through for completeness, not used for drawing.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum BatteryHealth {
    #[default]
    Unknown,
    Good,
    Overheat,
    Dead,
    OverVoltage,
    Failure,
    Cold,
}

impl BatteryHealth {
    pub const fn from_code(code: i32) -> Self {
        match code {
            2 => Self::Good,
            3 => Self::Overheat,
            4 => Self::Dead,
            5 => Self::OverVoltage,
            6 => Self::Failure,
            7 => Self::Cold,
            _ => Self::Unknown,
        }
    }
}

/// Immutable battery snapshot.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BatteryState {
    pub present: bool,
    /// Percentage in `0..=100`, `None` until the first telemetry arrives.
    pub level: Option<u8>,
    pub plugged_type: PluggedType,
    pub status: BatteryStatus,
    pub health: BatteryHealth,
    pub technology: heapless::String<16>,
    /// Millivolts.
    pub voltage: i32,
    /// Tenths of a degree Celsius.
    pub temperature: i32,
}

impl BatteryState {
    /// State before any telemetry: present, level unknown.
    pub const fn unknown() -> Self {
        Self {
            present: true,
            level: None,
            plugged_type: PluggedType::None,
            status: BatteryStatus::Unknown,
            health: BatteryHealth::Unknown,
            technology: heapless::String::new(),
            voltage: 0,
            temperature: 0,
        }
    }

    /// Snapshot with a known level, clamped to `0..=100`.
    pub fn with_level(
        level: i32,
        plugged_type: PluggedType,
        status: BatteryStatus,
    ) -> Self {
        Self {
            level: Some(clamp_level(level)),
            plugged_type,
            status,
            ..Self::unknown()
        }
    }

    /// Build a snapshot from raw telemetry fields.
    ///
    /// `level` is scaled by `scale` into a percentage; a zero or negative
    /// scale leaves the level unknown.
    pub fn from_raw(
        level: i32,
        scale: i32,
        plugged_code: i32,
        status_code: i32,
    ) -> Self {
        let level = if scale > 0 {
            Some(clamp_level((100 * i64::from(level) / i64::from(scale)) as i32))
        } else {
            None
        };
        Self {
            level,
            plugged_type: PluggedType::from_code(plugged_code),
            status: BatteryStatus::from_code(status_code),
            ..Self::unknown()
        }
    }

    #[inline]
    pub const fn plugged(&self) -> bool { self.plugged_type.is_plugged() }

    #[inline]
    pub const fn is_full(&self) -> bool { matches!(self.status, BatteryStatus::Full) }

    #[inline]
    pub fn is_level_100(&self) -> bool { self.level == Some(LEVEL_MAX) }

    /// Whether the charging indicator should be shown.
    ///
    /// True while actively charging, or while plugged in and either reported
    /// full or sitting at 100%.
    pub fn should_indicate_charging(&self) -> bool {
        if self.status == BatteryStatus::Charging {
            return true;
        }
        self.plugged() && (self.is_full() || self.is_level_100())
    }
}

impl Default for BatteryState {
    fn default() -> Self { Self::unknown() }
}

/// Clamp an incoming level to `0..=100`, logging when the producer misbehaves.
pub fn clamp_level(level: i32) -> u8 {
    if !(0..=i32::from(LEVEL_MAX)).contains(&level) {
        warn!("battery level {level} out of range, clamping");
    }
    level.clamp(0, i32::from(LEVEL_MAX)) as u8
}
