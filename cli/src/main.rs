use host::{HeadlessHost, HeadlessRuntime};
use log::{error, info, warn};
use scenario::Scenario;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use surfacelink_core::{Config, ProcessInitFlag, SurfaceLinkFatalError, SurfaceLinkResult};

mod cli;
mod host;
mod logger;
mod scenario;

fn main() -> SurfaceLinkResult<()> {
    let args = cli::parse_args();

    if let Err(e) = logger::init_logger(args.quiet, args.verbose) {
        eprintln!("Failed to initialize logger: {e}");
    }

    info!("Starting SurfaceLink {}", surfacelink_core::version());

    let config = if args.use_defaults {
        Config::default()
    } else {
        Config::load(args.config_path.as_deref(), !args.dry_run)?
    };
    config.validate()?;

    if args.dry_run {
        info!("Configuration is valid, exiting (dry run)");
        return Ok(());
    }

    Config::set_config(config.clone());

    let scenario = match args.scenario_path.as_deref() {
        Some(path) => Scenario::load(path).map_err(|e| SurfaceLinkFatalError::Error(e.to_string()))?,
        None => Scenario::builtin(),
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    ctrlc::set_handler(move || {
        info!("Received Ctrl+C, shutting down...");
        shutdown_clone.store(true, Ordering::SeqCst);
    })
    .map_err(|e| SurfaceLinkFatalError::Error(format!("Error setting Ctrl+C handler: {e}")))?;

    let runtime = Arc::new(HeadlessRuntime::new(Duration::from_millis(args.frame_ms)));
    let mut host = HeadlessHost::new(runtime.clone(), ProcessInitFlag::global(), config);

    for step in scenario.steps.iter() {
        if shutdown.load(Ordering::SeqCst) {
            warn!("Scenario interrupted");
            break;
        }
        if let Err(e) = host.run_step(step) {
            error!("Step {step:?} failed: {e}");
            return Err(e);
        }
    }

    let deadline = Instant::now() + Duration::from_millis(args.hold_ms);
    while !shutdown.load(Ordering::SeqCst) && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }

    // The worker never returns, the process exit takes it down
    info!("SurfaceLink stopped after {} frames", runtime.frames());
    Ok(())
}
