use crate::animation::{AnimationDriver, DriverState, Invalidate};
use crate::config::GaugeConfig;
use crate::error::Result;
use crate::geometry::{DerivedGeometry, GaugeModel};
use crate::scene::{compose_frame, Scene, StyleSheet, Surface};

/// Main gauge struct - the primary public interface.
///
/// Owns the immutable configuration, the style sheet built from it and the
/// animation driver. Hosts feed it requests and clock ticks and draw whatever
/// [`Gauge::render`] returns whenever they are asked to redraw.
#[derive(Debug, Clone)]
pub struct Gauge {
    config: GaugeConfig,
    styles: StyleSheet,
    model: GaugeModel,
    driver: AnimationDriver,
}

impl Gauge {
    /// Validates `config` and builds an idle gauge showing the minimum.
    pub fn new(config: GaugeConfig) -> Result<Self> {
        let initial = config.min_value;
        Self::with_initial(config, initial)
    }

    /// Like [`Gauge::new`], but starts idle at `initial` (clamped).
    pub fn with_initial(config: GaugeConfig, initial: i64) -> Result<Self> {
        let model = GaugeModel::new(&config)?;
        let driver = AnimationDriver::with_initial(&config, initial)?;
        Ok(Self {
            styles: StyleSheet::new(&config),
            model,
            driver,
            config,
        })
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    pub fn model(&self) -> &GaugeModel {
        &self.model
    }

    pub fn request_value(
        &mut self,
        value: i64,
        now_ms: u64,
        redraw: &mut impl Invalidate,
    ) -> DriverState {
        self.driver.request_value(value, now_ms, redraw)
    }

    pub fn tick(&mut self, now_ms: u64, redraw: &mut impl Invalidate) -> usize {
        self.driver.tick(now_ms, redraw)
    }

    pub fn displayed_value(&self) -> i64 {
        self.driver.displayed_value()
    }

    pub fn target_value(&self) -> i64 {
        self.driver.target_value()
    }

    pub fn state(&self) -> DriverState {
        self.driver.state()
    }

    pub fn next_step_due(&self) -> Option<u64> {
        self.driver.next_step_due()
    }

    /// Geometry of the currently displayed value.
    pub fn geometry(&self) -> DerivedGeometry {
        self.model.derive(self.displayed_value())
    }

    pub fn render(&self, width: usize, height: usize) -> Scene {
        compose_frame(&self.model, self.displayed_value(), &self.config, width, height)
    }

    /// Renders the current frame straight onto `surface`.
    pub fn draw(&self, surface: &mut impl Surface, width: usize, height: usize) {
        self.render(width, height).replay(surface, &self.styles);
    }
}
