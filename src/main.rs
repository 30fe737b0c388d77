//! padmap daemon
//!
//! Main entry point and event loop.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use padmap::cli::{Cli, Commands};
use padmap::config::DaemonConfig;
use padmap::device::{self, DeviceError, VirtualOutput};
use padmap::haptics::{play_effect, LogHaptics};
use padmap::profile;
use padmap::Pipeline;
use padmap_core::LiveValues;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Some(Commands::ListDevices) => {
            for (path, name) in device::list_devices() {
                println!("{}\t{}", path.display(), name);
            }
            Ok(())
        }
        Some(Commands::Codes) => {
            for (name, id) in padmap_core::codes::names() {
                println!("{:<24} {}:{:#05x}", name, id.event_type.prefix(), id.code);
            }
            Ok(())
        }
        Some(Commands::CheckConfig) => check_config(&cli),
        Some(Commands::TestHaptics) => test_haptics(&cli).await,
        Some(Commands::Run) | None => run(&cli).await,
    }
}

fn load_config(cli: &Cli) -> Result<DaemonConfig> {
    let path = cli.config.clone().unwrap_or_else(DaemonConfig::default_path);
    info!("Loading config from {:?}", path);
    let mut config = DaemonConfig::load(&path)?;
    if let Some(kind) = cli.profile {
        config.profile = kind;
    }
    if let Some(device) = &cli.device {
        config.device = Some(device.clone());
    }
    if cli.no_grab {
        config.grab = false;
    }
    Ok(config)
}

fn check_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let profile = profile::build(config.profile, &config, &LiveValues::new())
        .context("Config does not build a valid profile")?;
    print!("{}", config.to_toml()?);

    let spec = profile.device_spec();
    println!(
        "# profile \"{}\" drives \"{}\": {} keys, {} rel, {} abs",
        profile.name(),
        spec.name,
        spec.keys.len(),
        spec.rel.len(),
        spec.abs.len()
    );
    Ok(())
}

async fn test_haptics(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let mut haptics = LogHaptics::new(config.haptics.gain);
    if let Some(rumble) = config.haptics.startup {
        rumble.play(1.0, &mut haptics);
    }
    match &config.haptics.effect {
        Some(effect) => {
            let samples = play_effect(effect, &mut haptics).await;
            println!("Effect: {} samples", samples);
        }
        None => println!("No [haptics] effect configured"),
    }
    println!("{} haptic pulses sent", haptics.sent());
    Ok(())
}

fn resolve_device(config: &DaemonConfig) -> Result<PathBuf, DeviceError> {
    if let Some(path) = &config.device {
        return Ok(path.clone());
    }
    let path = device::find_controller().ok_or(DeviceError::NoController)?;
    info!("Found controller at {}", path.display());
    Ok(path)
}

async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let path = resolve_device(&config)?;
    let source = device::open_source(&path, config.grab)?;

    let mut pipeline = Pipeline::new(config.profile, &config)?;
    let mut output = VirtualOutput::create(&pipeline.device_spec())?;
    match output.device_path() {
        Some(node) => info!("Virtual device at {}", node.display()),
        None => debug!("Virtual device node not found"),
    }
    let mut haptics = LogHaptics::new(config.haptics.gain);
    if let Some(rumble) = config.haptics.startup {
        rumble.play(1.0, &mut haptics);
    }

    let mut events = source.into_event_stream().map_err(DeviceError::Read)?;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!(
        "Running profile \"{}\". Press Ctrl+C to stop.",
        pipeline.profile_name()
    );

    let result = loop {
        tokio::select! {
            event = events.next_event() => match event {
                Ok(ev) => pipeline.process(&device::to_core(&ev), &mut output, &mut haptics),
                Err(e) => break Err(DeviceError::Read(e)),
            },
            _ = &mut ctrl_c => {
                info!("Shutting down...");
                break Ok(());
            }
        }
    };

    pipeline.shutdown(&mut output, &mut haptics);
    if let Err(e) = output.flush() {
        warn!("{}", e);
    }
    info!("{} haptic pulses requested", haptics.sent());

    result.context("Controller event stream ended")
}
