// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

//! Animated arc gauge (speedometer / tachometer).
//!
//! A [`Gauge`] maps a bounded integer value onto a 260° arc with 46 tick
//! marks, animates the displayed value toward each requested target in
//! fixed steps, and renders every frame as an ordered [`Scene`] of draw
//! commands that can be replayed onto any [`Surface`].
//!
//! ```rust
//! use speedometer::{Gauge, GaugeConfig, RedrawCounter, STEP_PERIOD_MS};
//!
//! let mut gauge = Gauge::new(GaugeConfig::default()).unwrap();
//! let mut redraw = RedrawCounter::default();
//!
//! gauge.request_value(90, 0, &mut redraw);
//! gauge.tick(90 * STEP_PERIOD_MS, &mut redraw);
//!
//! let geometry = gauge.geometry();
//! assert_eq!(gauge.displayed_value(), 90);
//! assert_eq!(geometry.progress_sweep_angle, 130.0);
//! assert_eq!(geometry.active_tick_count, 23);
//! ```

pub mod animation;
pub mod canvas;
pub mod config;
pub mod error;
pub mod gauge;
pub mod geometry;
pub mod scene;
pub mod window;

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

pub use animation::{AnimationDriver, DriverState, Invalidate, RedrawCounter, STEP_PERIOD_MS};
pub use canvas::{load_font, load_font_file, system_font, PixelCanvas};
pub use config::{Color, GaugeConfig, GaugeLayout, GaugeVariant};
pub use error::{GaugeError, Result};
pub use gauge::Gauge;
pub use geometry::{DerivedGeometry, GaugeModel};
pub use scene::{render_frame, DrawCommand, Rect, Scene, Style, StyleRole, StyleSheet, Surface};
pub use window::{show, show_with_commands, GaugeCommand, WindowOptions};

/// Installs a `tracing` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
