use std::rc::Rc;

use anyhow::Result;
use winit::dpi::LogicalSize;

use tempo_engine::device::GpuInit;
use tempo_engine::logging::{init_logging, LoggingConfig};
use tempo_engine::window::{Runtime, RuntimeConfig};
use tempo_probe::{Origin, SystemClock};

mod config;
mod probe_app;

use config::AppConfig;
use probe_app::ProbeApp;

fn main() {
    // T0. Nothing may run before these two lines.
    let clock = SystemClock::new();
    let origin = Origin::capture(&clock);

    if let Err(e) = run(clock, origin) {
        log::error!("tempo: {e:#}");
        std::process::exit(1);
    }
}

fn run(clock: SystemClock, origin: Origin) -> Result<()> {
    let (config, warnings) = AppConfig::from_env();

    init_logging(LoggingConfig::default());
    for w in &warnings {
        log::warn!("{w}");
    }
    log::info!("origin captured at {} ms since epoch", origin.as_millis());

    let app = ProbeApp::new(config.title.clone(), origin, Rc::new(clock), config.exit_when_measured);

    let runtime = RuntimeConfig {
        title: app.initial_title(),
        initial_size: LogicalSize::new(config.width, config.height),
    };

    Runtime::run(runtime, GpuInit::default(), app)
}
