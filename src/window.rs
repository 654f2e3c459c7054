// ============================================================================
// WINDOW HOST
// ============================================================================
//
// Runs a gauge inside a winit window backed by a `pixels` frame buffer.
// Frames are only drawn when the animation driver invalidates the gauge, and
// the event loop sleeps until the next animation step is due.

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bon::Builder;
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use tracing::{debug, error, info, warn};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder};
use winit::window::{Window, WindowBuilder};

use crate::animation::Invalidate;
use crate::canvas::PixelCanvas;
use crate::error::Result;
use crate::gauge::Gauge;

/// Command enum for feeding a running window from other threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeCommand {
    /// Animate toward this value.
    SetValue(i64),
    /// Close the window and return from the event loop.
    Close,
}

#[derive(Clone, Builder)]
pub struct WindowOptions {
    #[builder(default = "Speedometer".to_string())]
    pub title: String,
    /// Frame buffer width in logical pixels.
    #[builder(default = 1000)]
    pub width: u32,
    /// Frame buffer height in logical pixels.
    #[builder(default = 1000)]
    pub height: u32,
    /// Font for the readout and scale labels. Text is not drawn without one.
    pub font: Option<Font<'static>>,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Turns gauge invalidations into winit redraw requests.
struct WindowRedraw<'a>(&'a Window);

impl Invalidate for WindowRedraw<'_> {
    fn invalidate(&mut self) {
        self.0.request_redraw();
    }
}

/// Shows `gauge` until the window is closed.
pub fn show(gauge: Gauge, options: WindowOptions) -> Result<()> {
    run_window(gauge, options, None)
}

/// Shows `gauge` and applies commands from `receiver` as they arrive.
pub fn show_with_commands(
    gauge: Gauge,
    options: WindowOptions,
    receiver: Receiver<GaugeCommand>,
) -> Result<()> {
    run_window(gauge, options, Some(receiver))
}

fn run_window(
    mut gauge: Gauge,
    options: WindowOptions,
    receiver: Option<Receiver<GaugeCommand>>,
) -> Result<()> {
    let event_loop = EventLoopBuilder::<GaugeCommand>::with_user_event().build()?;
    let window = WindowBuilder::new()
        .with_title(&options.title)
        .with_inner_size(LogicalSize::new(options.width as f64, options.height as f64))
        .with_resizable(false)
        .build(&event_loop)?;
    let window = Arc::new(window);
    let redraw_handle = Arc::clone(&window);

    // Commands arrive as user events so a sleeping loop wakes up for them.
    if let Some(receiver) = receiver {
        let proxy = event_loop.create_proxy();
        thread::spawn(move || {
            for command in receiver {
                if proxy.send_event(command).is_err() {
                    break;
                }
            }
            debug!("command channel closed");
        });
    }

    if options.font.is_none() {
        warn!("no font loaded; gauge text will not be drawn");
    }

    let (fb_width, fb_height) = (options.width as usize, options.height as usize);
    let size = window.inner_size();
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(options.width, options.height, surface_texture)?;

    let start = Instant::now();
    let now_ms = move || start.elapsed().as_millis() as u64;

    info!(
        title = %options.title,
        width = options.width,
        height = options.height,
        "gauge window opened"
    );
    window.request_redraw();

    event_loop.run(move |event, window_target| {
        let mut redraw = WindowRedraw(&redraw_handle);
        match event {
            Event::UserEvent(GaugeCommand::SetValue(value)) => {
                gauge.request_value(value, now_ms(), &mut redraw);
            }
            Event::UserEvent(GaugeCommand::Close) => {
                info!("close requested by command");
                window_target.exit();
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                        error!(%err, "failed to resize surface");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    let mut canvas = PixelCanvas::new(pixels.frame_mut(), fb_width, fb_height)
                        .with_font(options.font.as_ref());
                    gauge.draw(&mut canvas, fb_width, fb_height);
                    if let Err(err) = pixels.render() {
                        error!(%err, "failed to present frame");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                gauge.tick(now_ms(), &mut redraw);
                match gauge.next_step_due() {
                    Some(due) => window_target.set_control_flow(ControlFlow::WaitUntil(
                        start + Duration::from_millis(due),
                    )),
                    None => window_target.set_control_flow(ControlFlow::Wait),
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}
