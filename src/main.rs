#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

mod artifact;
mod config;
mod controller;
mod error;
mod geometry;
mod handlers;
mod host;
mod logging;
mod platform;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;

use clap::Parser;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::controller::{OpenOutcome, PreviewController};
use crate::handlers::HandlerRegistry;
use crate::platform::headless::{HeadlessAssociations, HeadlessWindow};

// Global state
pub static RUNNING: AtomicBool = AtomicBool::new(true);

/// Press Space on a file in Explorer to preview it.
#[derive(Debug, Parser)]
#[command(name = "rust-quick-look", version, about)]
struct Args {
    /// File or folder to preview right away
    path: Option<PathBuf>,

    /// Print the preview title and bounds instead of showing a window
    #[arg(long)]
    dry_run: bool,

    /// Exit once the preview is hidden
    #[arg(long)]
    once: bool,

    /// Do not watch Explorer for the Space key
    #[arg(long)]
    no_trigger: bool,

    /// Configuration file to read instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Logging depends on the config, so a config error is reported after init
    let (config, config_error) = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };

    let headless = args.dry_run || !cfg!(windows);
    logging::init(&config.log_filter, headless);
    if let Some(err) = config_error {
        warn!("using default configuration: {err}");
    }

    let registry = HandlerRegistry::standard(config.text_preview_limit);
    info!(handlers = ?registry.names(), "handlers registered");

    if headless {
        return run_headless(&args, &config, registry);
    }

    #[cfg(windows)]
    {
        run_windows(&args, &config, registry)
    }
    #[cfg(not(windows))]
    {
        ExitCode::SUCCESS
    }
}

fn run_headless(args: &Args, config: &AppConfig, registry: HandlerRegistry) -> ExitCode {
    let Some(path) = args.path.as_deref() else {
        eprintln!("a path is required without a window system");
        return ExitCode::from(2);
    };

    let window = HeadlessWindow::new(config.fallback_monitor.to_monitor());
    let mut controller = PreviewController::new(window, HeadlessAssociations::default(), registry);

    match controller.open(path) {
        OpenOutcome::Skipped => {
            eprintln!("{}: not a file or folder", path.display());
            ExitCode::FAILURE
        }
        OpenOutcome::File | OpenOutcome::Directory => {
            println!("{}", controller.window().summary());
            ExitCode::SUCCESS
        }
    }
}

#[cfg(windows)]
fn run_windows(args: &Args, config: &AppConfig, registry: HandlerRegistry) -> ExitCode {
    use std::sync::atomic::Ordering;
    use std::sync::mpsc;
    use std::time::Duration;

    use windows::Win32::System::Com::{CoInitializeEx, CoUninitialize, COINIT_APARTMENTTHREADED};

    use crate::controller::PreviewRequest;
    use crate::platform::win32::{self, associations::ShellAssociations, monitor, tray::TrayIcon, trigger, window};

    monitor::enable_per_monitor_dpi();

    // Initialize COM
    unsafe {
        let _ = CoInitializeEx(None, COINIT_APARTMENTTHREADED);
    }

    let preview = match window::Win32Window::create() {
        Ok(preview) => preview,
        Err(err) => {
            tracing::error!("cannot create the preview window: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut controller = PreviewController::new(preview, ShellAssociations, registry);

    // One-shot runs have nothing to keep alive in the tray
    let _tray = if args.once { None } else { TrayIcon::create() };

    let (requests, incoming) = mpsc::channel::<PreviewRequest>();
    let trigger_enabled = config.trigger_enabled && !args.no_trigger;
    trigger::TRIGGER_ENABLED.store(trigger_enabled, Ordering::SeqCst);
    let trigger_handle = (!args.once).then(|| {
        let requests = requests.clone();
        std::thread::spawn(move || trigger::run(requests))
    });

    if let Some(path) = &args.path {
        let _ = requests.send(PreviewRequest::Open(path.clone()));
    }
    drop(requests);

    // With --once and no path there is nothing to wait for
    let mut handled = args.path.is_none();
    while RUNNING.load(Ordering::SeqCst) {
        if !win32::pump_messages() {
            break;
        }

        for event in window::drain_events() {
            controller.handle(event);
        }

        while let Ok(request) = incoming.try_recv() {
            controller.request(request);
            handled = true;
        }

        if args.once && handled && !controller.is_visible() {
            break;
        }

        std::thread::sleep(Duration::from_millis(16));
    }

    info!("shutting down");
    RUNNING.store(false, Ordering::SeqCst);
    controller.hide();
    if let Some(handle) = trigger_handle {
        let _ = handle.join();
    }
    drop(controller);

    // Cleanup COM
    unsafe {
        CoUninitialize();
    }
    ExitCode::SUCCESS
}
