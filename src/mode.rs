//! Meter display modes.
//!
//! - [`MeterMode::Gone`]: nothing shown
//! - [`MeterMode::IconPortrait`]: rectangular battery icon with bolt cutout
//! - [`MeterMode::Circle`]: arc meter with pulsing charging dot
//! - [`MeterMode::Text`]: percentage shown by the host as plain text; no meter drawn here

/// Which visual style represents battery state.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum MeterMode {
    Gone,
    #[default]
    IconPortrait,
    Circle,
    Text,
}

impl MeterMode {
    /// Map the user's battery style setting.
    ///
    /// 2 selects the circle, 4 hides the meter, 5 is text-only. Any other
    /// value falls back to the portrait icon.
    pub const fn from_style_setting(style: i32) -> Self {
        match style {
            2 => Self::Circle,
            4 => Self::Gone,
            5 => Self::Text,
            _ => Self::IconPortrait,
        }
    }

    /// Whether this mode has a geometry builder.
    #[inline]
    pub const fn draws_meter(self) -> bool { matches!(self, Self::IconPortrait | Self::Circle) }

    /// Whether the inside-percentage option is meaningful for this mode.
    #[inline]
    pub const fn allows_percent(self) -> bool { self.draws_meter() }

    /// Cycle: Icon -> Circle -> Text -> Gone -> Icon
    pub const fn next(self) -> Self {
        match self {
            Self::IconPortrait => Self::Circle,
            Self::Circle => Self::Text,
            Self::Text => Self::Gone,
            Self::Gone => Self::IconPortrait,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Gone => "GONE",
            Self::IconPortrait => "ICON",
            Self::Circle => "CIRCLE",
            Self::Text => "TEXT",
        }
    }
}
