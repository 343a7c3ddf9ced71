use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::domain::market_data::{Candle, Timestamp};

/// Value Object - time window shown by every panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: Timestamp,
    pub to: Timestamp,
}

impl TimeRange {
    /// Bounds are swapped when given in reverse.
    pub fn new(from: Timestamp, to: Timestamp) -> Self {
        if from <= to { Self { from, to } } else { Self { from: to, to: from } }
    }

    pub fn span_ms(&self) -> u64 {
        self.to.value() - self.from.value()
    }

    pub fn contains(&self, time: Timestamp) -> bool {
        self.from <= time && time <= self.to
    }
}

/// One indicator reading under the crosshair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrosshairValue {
    pub indicator_id: String,
    pub column: String,
    pub value: f64,
}

/// Value Object - what the crosshair points at. Display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosshairData {
    pub time: Timestamp,
    pub candle: Option<Candle>,
    pub values: Vec<CrosshairValue>,
}

/// Value Object - Color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::new(r, g, b, 1.0)
    }

    pub fn to_hex(&self) -> u32 {
        let r = (self.r * 255.0).round() as u32;
        let g = (self.g * 255.0).round() as u32;
        let b = (self.b * 255.0).round() as u32;
        (r << 16) | (g << 8) | b
    }

    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self { a: alpha, ..*self }
    }

    /// CSS `rgba(...)` string for inline styles
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.2})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            self.a
        )
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

/// Value Object - color theme
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ChartTheme {
    #[default]
    #[display(fmt = "dark")]
    #[strum(serialize = "dark")]
    Dark,
    #[display(fmt = "light")]
    #[strum(serialize = "light")]
    Light,
}

/// Colors the panel chrome is painted with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemePalette {
    pub background: Color,
    pub panel_border: Color,
    pub resizer: Color,
    pub resizer_active: Color,
    pub text: Color,
    pub crosshair: Color,
}

impl ChartTheme {
    pub fn palette(&self) -> ThemePalette {
        match self {
            ChartTheme::Dark => ThemePalette {
                background: Color::from_hex(0x131722),
                panel_border: Color::from_hex(0x2a2e39),
                resizer: Color::from_hex(0x363a45),
                resizer_active: Color::from_hex(0x2962ff),
                text: Color::from_hex(0xd1d4dc),
                crosshair: Color::from_hex(0x758696),
            },
            ChartTheme::Light => ThemePalette {
                background: Color::from_hex(0xffffff),
                panel_border: Color::from_hex(0xe0e3eb),
                resizer: Color::from_hex(0xd1d4dc),
                resizer_active: Color::from_hex(0x2962ff),
                text: Color::from_hex(0x131722),
                crosshair: Color::from_hex(0x9598a1),
            },
        }
    }
}
