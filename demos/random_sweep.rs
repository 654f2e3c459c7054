use speedometer::{system_font, Gauge, GaugeCommand, GaugeConfig, GaugeVariant, WindowOptions};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use rand::Rng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    speedometer::init_tracing();

    // Tachometer: 0..9000 rpm, readout in thousands
    let config = GaugeConfig::builder()
        .max_value(9_000)
        .tick_interval(1_000)
        .variant(GaugeVariant::Scaled)
        .unit_label("x1000 rpm".to_string())
        .build()?;
    let gauge = Gauge::new(config)?;

    let options = WindowOptions::builder()
        .title("Random sweep".to_string())
        .maybe_font(system_font())
        .build();

    let (sender, receiver) = mpsc::channel();

    // Pick a new target every couple of seconds; some land mid-animation
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let target = rng.random_range(0..=9_500);
            if sender.send(GaugeCommand::SetValue(target)).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(rng.random_range(500..3_000)));
        }
    });

    println!("Displaying a tachometer chasing random targets");
    println!("Press Ctrl+C or close the window to exit");

    speedometer::show_with_commands(gauge, options, receiver)?;
    Ok(())
}
