// ============================================================================
// RETAINED MODE SCENE
// ============================================================================
//
// A frame is built as an ordered list of draw commands and then replayed onto
// a `Surface`. Later commands paint over earlier ones, so the order produced
// by `render_frame` is the layering of the gauge face.

use crate::config::{Color, GaugeConfig, GaugeLayout};
use crate::error::Result;
use crate::geometry::{
    is_major_tick, polar, tick_angle, GaugeModel, FULL_SWEEP, START_ANGLE, TICK_COUNT,
};

/// Axis-aligned bounds of a circle, as taken by arc drawing calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Square enclosing the circle of `radius` around `(cx, cy)`.
    pub fn around(cx: f32, cy: f32, radius: f32) -> Self {
        Self {
            left: cx - radius,
            top: cy - radius,
            right: cx + radius,
            bottom: cy + radius,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Radius of the inscribed circle.
    pub fn radius(&self) -> f32 {
        (self.right - self.left).min(self.bottom - self.top) / 2.0
    }
}

/// What a draw command depicts; selects its [`Style`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleRole {
    Track,
    Progress,
    Disc,
    Unit,
    Value,
    ScaleLabel,
    TrackTick,
    ActiveTick,
}

/// Paint parameters for one role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: Color,
    pub stroke_width: f32,
    pub filled: bool,
    pub font_size: f32,
}

impl Style {
    fn stroke(color: Color, stroke_width: f32) -> Self {
        Self {
            color,
            stroke_width,
            filled: false,
            font_size: 0.0,
        }
    }

    fn text(color: Color, font_size: f32) -> Self {
        Self {
            color,
            stroke_width: 0.0,
            filled: true,
            font_size,
        }
    }
}

/// Styles for every role, built once per gauge and reused for every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    track: Style,
    progress: Style,
    disc: Style,
    unit: Style,
    value: Style,
    scale_label: Style,
    track_tick: Style,
    active_tick: Style,
}

impl StyleSheet {
    pub fn new(config: &GaugeConfig) -> Self {
        let layout: &GaugeLayout = &config.layout;
        Self {
            track: Style::stroke(config.track_color, layout.arc_stroke),
            progress: Style::stroke(config.primary_color, layout.arc_stroke),
            disc: Style::stroke(config.track_color, layout.arc_stroke),
            unit: Style::text(config.text_color, layout.unit_font_size),
            value: Style::text(config.text_color, layout.value_font_size),
            scale_label: Style::text(config.text_color, layout.label_font_size),
            track_tick: Style::stroke(config.track_color, layout.tick_stroke),
            active_tick: Style::stroke(config.primary_color, layout.tick_stroke),
        }
    }

    pub fn get(&self, role: StyleRole) -> &Style {
        match role {
            StyleRole::Track => &self.track,
            StyleRole::Progress => &self.progress,
            StyleRole::Disc => &self.disc,
            StyleRole::Unit => &self.unit,
            StyleRole::Value => &self.value,
            StyleRole::ScaleLabel => &self.scale_label,
            StyleRole::TrackTick => &self.track_tick,
            StyleRole::ActiveTick => &self.active_tick,
        }
    }
}

/// The drawing capability the gauge renders onto.
///
/// Angles are degrees clockwise from the positive x axis; text is centered
/// on `(x, y)`.
pub trait Surface {
    fn clear(&mut self, color: Color);
    fn draw_arc(&mut self, bounds: Rect, start_angle: f32, sweep_angle: f32, style: &Style);
    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, style: &Style);
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &Style);
    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, style: &Style);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Arc {
        bounds: Rect,
        start_angle: f32,
        sweep_angle: f32,
        role: StyleRole,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        role: StyleRole,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        role: StyleRole,
    },
    Line {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        role: StyleRole,
    },
}

impl DrawCommand {
    pub fn role(&self) -> Option<StyleRole> {
        match self {
            DrawCommand::Clear(_) => None,
            DrawCommand::Arc { role, .. }
            | DrawCommand::Circle { role, .. }
            | DrawCommand::Text { role, .. }
            | DrawCommand::Line { role, .. } => Some(*role),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Issues every command, in order, to `surface`.
    pub fn replay(&self, surface: &mut impl Surface, styles: &StyleSheet) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => surface.clear(*color),
                DrawCommand::Arc {
                    bounds,
                    start_angle,
                    sweep_angle,
                    role,
                } => surface.draw_arc(*bounds, *start_angle, *sweep_angle, styles.get(*role)),
                DrawCommand::Circle {
                    cx,
                    cy,
                    radius,
                    role,
                } => surface.draw_circle(*cx, *cy, *radius, styles.get(*role)),
                DrawCommand::Text { x, y, text, role } => {
                    surface.draw_text(text, *x, *y, styles.get(*role))
                }
                DrawCommand::Line {
                    x0,
                    y0,
                    x1,
                    y1,
                    role,
                } => surface.draw_line(*x0, *y0, *x1, *y1, styles.get(*role)),
            }
        }
    }
}

// ============================================================================
// RENDER PIPELINE
// ============================================================================

/// Builds the frame for `displayed` on a `width` x `height` surface.
///
/// Fails if `config` does not validate.
pub fn render_frame(
    displayed: i64,
    config: &GaugeConfig,
    width: usize,
    height: usize,
) -> Result<Scene> {
    let model = GaugeModel::new(config)?;
    Ok(compose_frame(&model, displayed, config, width, height))
}

/// Frame for an already validated `model` built from `config`.
pub(crate) fn compose_frame(
    model: &GaugeModel,
    displayed: i64,
    config: &GaugeConfig,
    width: usize,
    height: usize,
) -> Scene {
    let layout = &config.layout;
    let geometry = model.derive(displayed);
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);

    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(config.background_color));

    scene.add_command(DrawCommand::Arc {
        bounds: Rect::around(cx, cy, layout.radius),
        start_angle: START_ANGLE,
        sweep_angle: FULL_SWEEP,
        role: StyleRole::Track,
    });
    scene.add_command(DrawCommand::Arc {
        bounds: Rect::around(cx, cy, layout.progress_radius),
        start_angle: START_ANGLE,
        sweep_angle: geometry.progress_sweep_angle,
        role: StyleRole::Progress,
    });

    scene.add_command(DrawCommand::Circle {
        cx,
        cy,
        radius: layout.radius / layout.disc_divisor,
        role: StyleRole::Disc,
    });

    scene.add_command(DrawCommand::Text {
        x: cx,
        y: cy + layout.unit_offset,
        text: config.unit_label.clone(),
        role: StyleRole::Unit,
    });
    scene.add_command(DrawCommand::Text {
        x: cx,
        y: cy,
        text: config.variant.format_value(displayed),
        role: StyleRole::Value,
    });

    let label_radius = layout.radius / layout.label_ring_divisor;
    for value in model.label_values() {
        let (x, y) = polar(cx, cy, label_radius, model.label_angle(value));
        scene.add_command(DrawCommand::Text {
            x,
            y,
            text: config.variant.format_value(value),
            role: StyleRole::ScaleLabel,
        });
    }

    add_tick_lines(&mut scene, cx, cy, layout, TICK_COUNT, FULL_SWEEP, StyleRole::TrackTick);
    add_tick_lines(
        &mut scene,
        cx,
        cy,
        layout,
        geometry.active_tick_count,
        geometry.tick_sweep_angle,
        StyleRole::ActiveTick,
    );

    scene
}

fn add_tick_lines(
    scene: &mut Scene,
    cx: f32,
    cy: f32,
    layout: &GaugeLayout,
    count: usize,
    sweep: f32,
    role: StyleRole,
) {
    for i in 0..count {
        let angle = tick_angle(i, count, sweep);
        let length = layout.tick_length
            + if is_major_tick(i) {
                layout.major_tick_extra
            } else {
                0.0
            };
        let (x0, y0) = polar(cx, cy, layout.radius - layout.tick_inset, angle);
        let (x1, y1) = polar(cx, cy, layout.radius - length, angle);
        scene.add_command(DrawCommand::Line {
            x0,
            y0,
            x1,
            y1,
            role,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GaugeVariant;
    use crate::error::GaugeError;
    use crate::geometry::MAX_SCALE_LABELS;
    use approx::assert_relative_eq;

    fn roles(scene: &Scene) -> Vec<Option<StyleRole>> {
        scene.commands().iter().map(DrawCommand::role).collect()
    }

    fn count_role(scene: &Scene, role: StyleRole) -> usize {
        scene
            .commands()
            .iter()
            .filter(|c| c.role() == Some(role))
            .count()
    }

    #[test]
    fn test_layer_order() {
        let scene = render_frame(90, &GaugeConfig::default(), 1000, 1000).unwrap();
        let roles = roles(&scene);
        assert_eq!(
            &roles[..6],
            &[
                None,
                Some(StyleRole::Track),
                Some(StyleRole::Progress),
                Some(StyleRole::Disc),
                Some(StyleRole::Unit),
                Some(StyleRole::Value),
            ]
        );
        let first_track_tick = roles
            .iter()
            .position(|r| *r == Some(StyleRole::TrackTick))
            .unwrap();
        let last_label = roles
            .iter()
            .rposition(|r| *r == Some(StyleRole::ScaleLabel))
            .unwrap();
        let first_active_tick = roles
            .iter()
            .position(|r| *r == Some(StyleRole::ActiveTick))
            .unwrap();
        assert!(last_label < first_track_tick);
        assert_eq!(first_active_tick, first_track_tick + TICK_COUNT);
    }

    #[test]
    fn test_command_counts_at_ninety() {
        let scene = render_frame(90, &GaugeConfig::default(), 1000, 1000).unwrap();
        assert_eq!(count_role(&scene, StyleRole::ScaleLabel), 10);
        assert_eq!(count_role(&scene, StyleRole::TrackTick), 46);
        assert_eq!(count_role(&scene, StyleRole::ActiveTick), 23);
        assert_eq!(scene.commands().len(), 1 + 2 + 1 + 2 + 10 + 46 + 23);
    }

    #[test]
    fn test_progress_arc_sweep() {
        let scene = render_frame(90, &GaugeConfig::default(), 1000, 1000).unwrap();
        match &scene.commands()[2] {
            DrawCommand::Arc {
                bounds,
                start_angle,
                sweep_angle,
                ..
            } => {
                assert_eq!(*start_angle, START_ANGLE);
                assert_relative_eq!(*sweep_angle, 130.0);
                assert_eq!(bounds.center(), (500.0, 500.0));
                assert_eq!(bounds.radius(), 450.0);
            }
            other => panic!("expected progress arc, got {other:?}"),
        }
    }

    #[test]
    fn test_value_text_and_disc() {
        let scene = render_frame(90, &GaugeConfig::default(), 800, 1000).unwrap();
        assert_eq!(
            scene.commands()[3],
            DrawCommand::Circle {
                cx: 400.0,
                cy: 500.0,
                radius: 180.0,
                role: StyleRole::Disc,
            }
        );
        assert_eq!(
            scene.commands()[4],
            DrawCommand::Text {
                x: 400.0,
                y: 550.0,
                text: "mph".to_string(),
                role: StyleRole::Unit,
            }
        );
        assert_eq!(
            scene.commands()[5],
            DrawCommand::Text {
                x: 400.0,
                y: 500.0,
                text: "90".to_string(),
                role: StyleRole::Value,
            }
        );
    }

    #[test]
    fn test_scaled_variant_text() {
        let config = GaugeConfig::builder()
            .max_value(9_000)
            .tick_interval(1_000)
            .variant(GaugeVariant::Scaled)
            .unit_label("x1000 rpm".to_string())
            .build()
            .unwrap();
        let scene = render_frame(4_500, &config, 1000, 1000).unwrap();
        let texts: Vec<&str> = scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts[0], "x1000 rpm");
        assert_eq!(texts[1], "4.5");
        assert_eq!(&texts[2..], &["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]);
    }

    #[test]
    fn test_major_ticks_are_longer() {
        let scene = render_frame(0, &GaugeConfig::default(), 1000, 1000).unwrap();
        let lengths: Vec<f32> = scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line {
                    x0,
                    y0,
                    x1,
                    y1,
                    role: StyleRole::TrackTick,
                } => Some(((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt()),
                _ => None,
            })
            .collect();
        assert_eq!(lengths.len(), TICK_COUNT);
        // inset 30 to 60 (+45 on majors)
        assert_relative_eq!(lengths[0], 75.0, epsilon = 1e-3);
        assert_relative_eq!(lengths[1], 30.0, epsilon = 1e-3);
        assert_relative_eq!(lengths[5], 75.0, epsilon = 1e-3);
    }

    #[test]
    fn test_single_active_tick_at_minimum() {
        let scene = render_frame(0, &GaugeConfig::default(), 1000, 1000).unwrap();
        let active: Vec<&DrawCommand> = scene
            .commands()
            .iter()
            .filter(|c| c.role() == Some(StyleRole::ActiveTick))
            .collect();
        assert_eq!(active.len(), 1);
        if let DrawCommand::Line { x0, y0, .. } = active[0] {
            let (ex, ey) = polar(500.0, 500.0, 420.0, START_ANGLE);
            assert_relative_eq!(*x0, ex, epsilon = 1e-3);
            assert_relative_eq!(*y0, ey, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_active_ticks_overlay_background_ticks() {
        let scene = render_frame(90, &GaugeConfig::default(), 1000, 1000).unwrap();
        let lines = |role: StyleRole| -> Vec<(f32, f32)> {
            scene
                .commands()
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::Line { x1, y1, role: r, .. } if *r == role => Some((*x1, *y1)),
                    _ => None,
                })
                .collect()
        };
        let track = lines(StyleRole::TrackTick);
        let active = lines(StyleRole::ActiveTick);
        for (a, t) in active.iter().zip(track.iter()) {
            assert_relative_eq!(a.0, t.0, epsilon = 1e-2);
            assert_relative_eq!(a.1, t.1, epsilon = 1e-2);
        }
    }

    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<String>,
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self, _color: Color) {
            self.calls.push("clear".into());
        }
        fn draw_arc(&mut self, _bounds: Rect, _start: f32, sweep: f32, style: &Style) {
            self.calls
                .push(format!("arc {sweep:.1} {:?}", style.color.as_tuple()));
        }
        fn draw_circle(&mut self, _cx: f32, _cy: f32, radius: f32, _style: &Style) {
            self.calls.push(format!("circle {radius:.1}"));
        }
        fn draw_text(&mut self, text: &str, _x: f32, _y: f32, style: &Style) {
            self.calls.push(format!("text {text} {}", style.font_size));
        }
        fn draw_line(&mut self, _x0: f32, _y0: f32, _x1: f32, _y1: f32, _style: &Style) {
            self.calls.push("line".into());
        }
    }

    #[test]
    fn test_replay_issues_calls_in_order_with_styles() {
        let config = GaugeConfig::default();
        let styles = StyleSheet::new(&config);
        let mut surface = RecordingSurface::default();
        render_frame(90, &config, 1000, 1000).unwrap().replay(&mut surface, &styles);

        assert_eq!(surface.calls[0], "clear");
        assert_eq!(surface.calls[1], "arc 260.0 (101, 101, 101)");
        assert_eq!(surface.calls[2], "arc 130.0 (36, 236, 206)");
        assert_eq!(surface.calls[3], "circle 180.0");
        assert_eq!(surface.calls[4], "text mph 45");
        assert_eq!(surface.calls[5], "text 90 120");
        assert_eq!(surface.calls.iter().filter(|c| *c == "line").count(), 46 + 23);
    }

    #[test]
    fn test_style_sheet_roles() {
        let config = GaugeConfig::default();
        let styles = StyleSheet::new(&config);
        assert_eq!(styles.get(StyleRole::ActiveTick).color, config.primary_color);
        assert_eq!(styles.get(StyleRole::TrackTick).color, config.track_color);
        assert_eq!(styles.get(StyleRole::TrackTick).stroke_width, 8.0);
        assert_eq!(styles.get(StyleRole::Track).stroke_width, 20.0);
        assert_eq!(styles.get(StyleRole::ScaleLabel).font_size, 50.0);
    }

    #[test]
    fn test_scale_labels_are_capped() {
        let config = GaugeConfig::builder()
            .max_value(1_000_000_000)
            .tick_interval(1)
            .build()
            .unwrap();
        let scene = render_frame(0, &config, 1000, 1000).unwrap();
        assert_eq!(count_role(&scene, StyleRole::ScaleLabel), MAX_SCALE_LABELS);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut empty = GaugeConfig::default();
        empty.max_value = empty.min_value;
        assert!(matches!(
            render_frame(0, &empty, 1000, 1000),
            Err(GaugeError::InvalidRange { .. })
        ));

        let mut no_interval = GaugeConfig::default();
        no_interval.tick_interval = 0;
        assert!(matches!(
            render_frame(10, &no_interval, 1000, 1000),
            Err(GaugeError::InvalidTickInterval(0))
        ));
    }

    #[test]
    fn test_rect_around() {
        let rect = Rect::around(10.0, 20.0, 5.0);
        assert_eq!(rect.left, 5.0);
        assert_eq!(rect.bottom, 25.0);
        assert_eq!(rect.center(), (10.0, 20.0));
        assert_eq!(rect.radius(), 5.0);
    }
}
