use clap::Parser;
use padlink::pad::Gamepad;
use std::path::{Path, PathBuf};
use std::time::Instant;
use wheel::config::{self, Config};
use wheel::events::AppEvent;
use wheel::menu::Wheel;
use wheel::sys::frame::FrameClock;
use wheel::sys::runtime;

#[derive(Parser, Debug)]
#[command(version, about = "Gamepad radial selection wheel", long_about = None)]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Override the configured frame rate
    #[arg(long)]
    fps: Option<f64>,

    /// Write the default config and exit
    #[arg(long)]
    write_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.write_default_config {
        let path = config::write_default_config(args.config.as_deref())?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut config = config::load_or_default(args.config.as_deref());
    if let Some(fps) = args.fps {
        config.wheel.frame_rate = fps;
    }

    let mut wheel = Wheel::from_config(&config)?;
    let mut pad = Gamepad::new(config.buttons.clone());
    let mut clock = FrameClock::new(config.wheel.frame_rate);
    if !pad.is_connected() {
        log::warn!("No gamepad connected, waiting for one");
    }

    let config_path = match args.config.as_deref() {
        Some(path) => Some(config::absolute_config_path(path)?),
        None => config::get_config_path().ok(),
    };
    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(
        tx,
        config.wheel.socket_path.clone(),
        config_path.clone(),
    );

    log::info!("{}", wheel.view());

    loop {
        let frame_start = Instant::now();
        let fps = clock.record(frame_start);
        let mut redraw = false;

        while let Ok(event) = rx.try_recv() {
            match event {
                AppEvent::Command(cmd) => redraw |= wheel.apply(cmd),
                AppEvent::ConfigReload => {
                    redraw |= reload(
                        &mut wheel,
                        &mut pad,
                        &mut config,
                        config_path.as_deref(),
                        args.fps,
                    );
                }
            }
        }

        let frame = pad.poll();
        for cmd in frame.commands {
            redraw |= wheel.apply(cmd);
        }

        redraw |= wheel.update(frame.stick, fps).should_redraw();

        if redraw {
            log::info!("{}", wheel.view());
        }

        clock.sleep_until_next(frame_start);
    }
}

fn reload(
    wheel: &mut Wheel,
    pad: &mut Gamepad,
    current: &mut Config,
    path: Option<&Path>,
    fps_override: Option<f64>,
) -> bool {
    let Some(path) = path else {
        return false;
    };

    let mut next = match config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to reload config: {}", e);
            return false;
        }
    };
    if let Some(fps) = fps_override {
        next.wheel.frame_rate = fps;
    }

    match wheel.reload(&next) {
        Ok(()) => {
            pad.set_buttons(next.buttons.clone());
            *current = next;
            log::info!("Configuration reloaded");
            true
        }
        Err(e) => {
            log::error!("Failed to reload config: {}", e);
            false
        }
    }
}
