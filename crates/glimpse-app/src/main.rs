use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use glimpse_capture::HotkeyManager;
use glimpse_types::AppEvent;
use glimpse_ui::{DesktopToaster, Notifier};
use tracing_subscriber::EnvFilter;

mod context;
mod controller;
mod events;
mod io;
mod profile;
mod state;


use self::context::ActivationContext;
use self::controller::AppController;
use self::state::AppState;

#[derive(Parser, Debug)]
#[command(
    name = "glimpse",
    version,
    about = "Hotkey screenshot assistant: select a region, ask a vision model, read the answer"
)]
struct Args {
    /// Config file to use instead of the user profile
    #[arg(long)]
    config: Option<PathBuf>,

    /// User profile name under the Glimpse config directory
    #[arg(long, default_value = "main")]
    profile: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Print the configured hotkeys and exit
    #[arg(long)]
    list_hotkeys: bool,

    /// Write the user profile (if missing) and exit
    #[arg(long)]
    init: bool,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,glimpse=debug"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder
            .with_ansi(atty::is(atty::Stream::Stderr))
            .init();
    }
}

#[cfg(windows)]
fn enable_dpi_awareness() {
    use windows::Win32::UI::HiDpi::{
        DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, SetProcessDpiAwarenessContext,
    };

    // Physical pixels everywhere so captures and overlay coordinates agree
    let _ = unsafe { SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) };
    tracing::debug!("Requested per-monitor DPI awareness");
}

#[cfg(not(windows))]
fn enable_dpi_awareness() {}

fn print_hotkeys(config: &glimpse_config::Config) {
    for (i, profile) in config.hotkeys.iter().enumerate() {
        println!(
            "{i}: {:<16} {:<24} {} via {}{}{}",
            profile.hotkey,
            profile.name,
            profile.model,
            config.provider_for(profile),
            if profile.draw_box { ", highlights" } else { "" },
            if profile.stream { ", streaming" } else { "" },
        );
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let dotenv = dotenvy::dotenv();
    init_logging(args.json_logs);
    if let Ok(path) = dotenv {
        tracing::debug!("Loaded {}", path.display());
    }

    if args.init {
        let path = profile::init_user_config(&args.profile)?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = profile::load_config(args.config.as_deref(), &args.profile)?;
    config.validate().context("Invalid configuration")?;
    glimpse_capture::parse_hotkeys(config.hotkeys.iter().map(|p| p.hotkey.as_str()))
        .context("Invalid configuration")?;

    if args.list_hotkeys {
        print_hotkeys(&config);
        return Ok(());
    }

    enable_dpi_awareness();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("glimpse-worker")
        .build()
        .context("Failed to start async runtime")?;

    // Registered on the GUI thread, whose event loop delivers the presses
    let hotkeys = HotkeyManager::new(config.hotkeys.iter().map(|p| p.hotkey.as_str()))?;
    let poll = Duration::from_millis(config.hotkey_poll_ms);
    let ui_config = config.ui.clone();

    let (ui, ui_requests) = glimpse_ui::ui_channel();
    let notifier = Notifier::new(
        ui.clone(),
        Arc::new(DesktopToaster::new(config.notification.app_name.clone())),
        config.notification.clone(),
    );
    let state = Arc::new(AppState::from_config(config)?);
    let controller = AppController::new(ActivationContext::new(state, ui.clone(), notifier));

    let listener = io::spawn_hotkey_listener(
        hotkeys.bindings(),
        poll,
        controller.event_sender().clone_sync(),
        controller.cancel_token(),
    )
    .context("Failed to start hotkey listener")?;

    let mut tasks = {
        let _guard = runtime.enter();
        controller.spawn_tasks()
    };

    runtime.spawn({
        let ui = ui.clone();
        let events = controller.event_sender();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {e}");
                return;
            }
            tracing::info!("Ctrl+C received");
            let _ = events.send(AppEvent::Shutdown).await;
            ui.shutdown().await;
        }
    });

    tracing::info!("Glimpse ready");
    let ui_result = glimpse_ui::run_ui(ui_requests, ui_config);

    controller.shutdown();
    runtime.block_on(async {
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!("Task failed: {e:#}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    });
    if listener.join().is_err() {
        tracing::error!("Hotkey listener panicked");
    }
    drop(hotkeys);
    runtime.shutdown_timeout(Duration::from_secs(2));

    ui_result
}
