use bon::Builder;
use tracing::warn;

use crate::error::{GaugeError, Result};
use crate::geometry::MAX_SCALE_LABELS;

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Parses `#RRGGBB` or `#AARRGGBB` (alpha is ignored). The leading `#` is optional.
    pub fn from_hex(text: &str) -> Result<Self> {
        let digits = text.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(GaugeError::InvalidColor(text.to_string()));
        }
        let rgb = match digits.len() {
            6 => digits,
            8 => &digits[2..],
            _ => return Err(GaugeError::InvalidColor(text.to_string())),
        };
        let channel = |range: std::ops::Range<usize>| {
            rgb.get(range)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| GaugeError::InvalidColor(text.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl std::str::FromStr for Color {
    type Err = GaugeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// How the gauge interprets and animates its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GaugeVariant {
    /// Raw value on the readout, one unit per animation step.
    #[default]
    Linear,
    /// Readout in thousands (e.g. rpm), [`SCALED_STEP`] units per animation step.
    Scaled,
}

/// Animation step used by [`GaugeVariant::Scaled`].
pub const SCALED_STEP: i64 = 25;

impl GaugeVariant {
    /// Units the displayed value moves per animation step.
    pub const fn step(self) -> i64 {
        match self {
            GaugeVariant::Linear => 1,
            GaugeVariant::Scaled => SCALED_STEP,
        }
    }

    /// Text shown for `value` on the readout and the scale labels.
    ///
    /// Scaled values are shown in thousands: whole thousands without a
    /// fraction, everything else with one decimal.
    pub fn format_value(self, value: i64) -> String {
        match self {
            GaugeVariant::Linear => value.to_string(),
            GaugeVariant::Scaled if value % 1000 == 0 => (value / 1000).to_string(),
            GaugeVariant::Scaled => format!("{:.1}", value as f64 / 1000.0),
        }
    }
}

/// Pixel lengths for every element of the gauge face.
///
/// The defaults describe a gauge of radius 450 and fit a 1000x1000 surface.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeLayout {
    pub radius: f32,
    pub progress_radius: f32,
    pub arc_stroke: f32,
    pub tick_stroke: f32,
    pub tick_inset: f32,
    pub tick_length: f32,
    pub major_tick_extra: f32,
    pub disc_divisor: f32,
    pub label_ring_divisor: f32,
    pub unit_offset: f32,
    pub unit_font_size: f32,
    pub value_font_size: f32,
    pub label_font_size: f32,
}

/// Surface edge length the default layout is designed for.
pub const REFERENCE_SIZE: f32 = 1000.0;

impl Default for GaugeLayout {
    fn default() -> Self {
        Self {
            radius: 450.0,
            progress_radius: 450.0,
            arc_stroke: 20.0,
            tick_stroke: 8.0,
            tick_inset: 30.0,
            tick_length: 60.0,
            major_tick_extra: 45.0,
            disc_divisor: 2.5,
            label_ring_divisor: 1.75,
            unit_offset: 50.0,
            unit_font_size: 45.0,
            value_font_size: 120.0,
            label_font_size: 50.0,
        }
    }
}

impl GaugeLayout {
    /// Multiplies every length by `factor`. Divisors are ratios and stay unchanged.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            radius: self.radius * factor,
            progress_radius: self.progress_radius * factor,
            arc_stroke: self.arc_stroke * factor,
            tick_stroke: self.tick_stroke * factor,
            tick_inset: self.tick_inset * factor,
            tick_length: self.tick_length * factor,
            major_tick_extra: self.major_tick_extra * factor,
            disc_divisor: self.disc_divisor,
            label_ring_divisor: self.label_ring_divisor,
            unit_offset: self.unit_offset * factor,
            unit_font_size: self.unit_font_size * factor,
            value_font_size: self.value_font_size * factor,
            label_font_size: self.label_font_size * factor,
        }
    }

    /// Default layout scaled to the smaller edge of a `width` x `height` surface.
    pub fn fit(width: usize, height: usize) -> Self {
        let edge = width.min(height).max(1) as f32;
        Self::default().scaled(edge / REFERENCE_SIZE)
    }

    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("radius", self.radius),
            ("progress_radius", self.progress_radius),
            ("arc_stroke", self.arc_stroke),
            ("tick_stroke", self.tick_stroke),
            ("tick_length", self.tick_length),
            ("disc_divisor", self.disc_divisor),
            ("label_ring_divisor", self.label_ring_divisor),
            ("unit_font_size", self.unit_font_size),
            ("value_font_size", self.value_font_size),
            ("label_font_size", self.label_font_size),
        ];
        for (name, value) in lengths {
            if !(value.is_finite() && value > 0.0) {
                return Err(GaugeError::InvalidLayout(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.tick_inset.is_finite() && self.tick_inset >= 0.0) {
            return Err(GaugeError::InvalidLayout(format!(
                "tick_inset must not be negative, got {}",
                self.tick_inset
            )));
        }
        if !(self.major_tick_extra.is_finite() && self.major_tick_extra >= 0.0) {
            return Err(GaugeError::InvalidLayout(format!(
                "major_tick_extra must not be negative, got {}",
                self.major_tick_extra
            )));
        }
        Ok(())
    }
}

/// Gauge configuration. Immutable once the gauge is built.
///
/// `GaugeConfig::builder()...build()` validates and returns a [`Result`].
#[derive(Debug, Clone, Builder)]
#[builder(finish_fn(name = build_unchecked, vis = ""))]
pub struct GaugeConfig {
    #[builder(default = 0)]
    pub min_value: i64,
    #[builder(default = 180)]
    pub max_value: i64,
    /// Spacing of the numeric scale labels.
    #[builder(default = 20)]
    pub tick_interval: i64,
    #[builder(default)]
    pub variant: GaugeVariant,

    // Colors
    #[builder(default = Color::new(0x24, 0xec, 0xce))]
    pub primary_color: Color,
    #[builder(default = Color::new(0x65, 0x65, 0x65))]
    pub track_color: Color,
    #[builder(default = Color::BLACK)]
    pub background_color: Color,
    #[builder(default = Color::WHITE)]
    pub text_color: Color,

    #[builder(default = "mph".to_string())]
    pub unit_label: String,
    #[builder(default)]
    pub layout: GaugeLayout,
}

impl<S: gauge_config_builder::IsComplete> GaugeConfigBuilder<S> {
    /// Finishes the config, rejecting anything the gauge cannot draw.
    pub fn build(self) -> Result<GaugeConfig> {
        let config = self.build_unchecked();
        config.validate()?;
        let gaps = config.span() / config.tick_interval;
        if gaps >= MAX_SCALE_LABELS as i64 {
            warn!(
                labels = gaps.saturating_add(1),
                max = MAX_SCALE_LABELS,
                "tick interval too fine, scale labels will be truncated"
            );
        }
        Ok(config)
    }
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build_unchecked()
    }
}

impl GaugeConfig {
    /// Checks the construction-time contract: `min < max`, positive interval, usable layout.
    pub fn validate(&self) -> Result<()> {
        if self.min_value >= self.max_value || self.max_value.checked_sub(self.min_value).is_none() {
            return Err(GaugeError::InvalidRange {
                min: self.min_value,
                max: self.max_value,
            });
        }
        if self.tick_interval <= 0 {
            return Err(GaugeError::InvalidTickInterval(self.tick_interval));
        }
        self.layout.validate()
    }

    /// `value` limited to the configured range.
    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min_value, self.max_value)
    }

    pub fn span(&self) -> i64 {
        self.max_value - self.min_value
    }
}
