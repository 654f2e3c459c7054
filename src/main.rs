use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info, warn};

use speedometer::{
    load_font_file, show_with_commands, system_font, Color, Gauge, GaugeCommand, GaugeConfig,
    GaugeLayout, GaugeVariant, WindowOptions,
};

#[derive(Parser, Debug)]
#[command(name = "speedometer")]
#[command(version)]
#[command(about = "Animated arc gauge driven by values read from stdin", long_about = None)]
struct Cli {
    /// Bottom of the scale
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    min: i64,

    /// Top of the scale
    #[arg(long, default_value_t = 180, allow_negative_numbers = true)]
    max: i64,

    /// Spacing of the numeric scale labels
    #[arg(long, default_value_t = 20)]
    interval: i64,

    /// Readout style and animation step
    #[arg(long, value_enum, default_value_t = Variant::Linear)]
    variant: Variant,

    /// Color of the progress arc and active ticks (#RRGGBB)
    #[arg(long, default_value = "#24ECCE")]
    primary_color: Color,

    /// Color of the track, disc and inactive ticks (#RRGGBB)
    #[arg(long, default_value = "#656565")]
    track_color: Color,

    /// Unit label under the readout
    #[arg(long, default_value = "mph")]
    unit: String,

    /// Window title
    #[arg(long, default_value = "Speedometer")]
    title: String,

    #[arg(long, default_value_t = 1000)]
    width: u32,

    #[arg(long, default_value_t = 1000)]
    height: u32,

    /// TrueType/OpenType font for the text; a system font is tried otherwise
    #[arg(long)]
    font: Option<PathBuf>,

    /// Value shown before the first input arrives (defaults to --min)
    #[arg(long, allow_negative_numbers = true)]
    initial: Option<i64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Variant {
    Linear,
    Scaled,
}

impl From<Variant> for GaugeVariant {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Linear => GaugeVariant::Linear,
            Variant::Scaled => GaugeVariant::Scaled,
        }
    }
}

/// Forwards one target value per input line. Bad lines are logged and skipped.
fn read_values(input: impl BufRead, sender: &Sender<GaugeCommand>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(%err, "failed to read input");
                break;
            }
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        match text.parse::<i64>() {
            Ok(value) => {
                if sender.send(GaugeCommand::SetValue(value)).is_err() {
                    break;
                }
            }
            Err(err) => warn!(line = text, %err, "ignoring non-integer input"),
        }
    }
    debug!("input exhausted");
}

fn main() -> Result<()> {
    speedometer::init_tracing();
    let cli = Cli::parse();

    let config = GaugeConfig::builder()
        .min_value(cli.min)
        .max_value(cli.max)
        .tick_interval(cli.interval)
        .variant(cli.variant.into())
        .primary_color(cli.primary_color)
        .track_color(cli.track_color)
        .unit_label(cli.unit)
        .layout(GaugeLayout::fit(cli.width as usize, cli.height as usize))
        .build()
        .context("invalid gauge configuration")?;
    let gauge = Gauge::with_initial(config, cli.initial.unwrap_or(cli.min))?;

    let font = match cli.font {
        Some(ref path) => Some(
            load_font_file(path).with_context(|| format!("loading font {}", path.display()))?,
        ),
        None => system_font(),
    };

    let options = WindowOptions::builder()
        .title(cli.title)
        .width(cli.width)
        .height(cli.height)
        .maybe_font(font)
        .build();

    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || read_values(io::stdin().lock(), &sender));

    info!("reading target values from stdin, one per line");
    show_with_commands(gauge, options, receiver)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_values_skips_bad_lines() {
        let (sender, receiver) = mpsc::channel();
        read_values(Cursor::new("10\n\nfast\n 90 \n-5\n"), &sender);
        drop(sender);
        let commands: Vec<GaugeCommand> = receiver.iter().collect();
        assert_eq!(
            commands,
            vec![
                GaugeCommand::SetValue(10),
                GaugeCommand::SetValue(90),
                GaugeCommand::SetValue(-5),
            ]
        );
    }

    #[test]
    fn test_cli_parses_variant_and_colors() {
        let cli = Cli::parse_from([
            "speedometer",
            "--max",
            "9000",
            "--interval",
            "1000",
            "--variant",
            "scaled",
            "--primary-color",
            "#ff0000",
            "--min",
            "-10",
        ]);
        assert_eq!(cli.max, 9000);
        assert_eq!(cli.min, -10);
        assert_eq!(GaugeVariant::from(cli.variant), GaugeVariant::Scaled);
        assert_eq!(cli.primary_color, Color::new(0xff, 0, 0));
        assert_eq!(cli.track_color, Color::new(0x65, 0x65, 0x65));
    }
}
