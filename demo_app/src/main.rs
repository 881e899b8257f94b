//! Popup demo
//!
//! Drives the guest window manager through a scripted session on the
//! headless backend and prints what happened at each step.
//!
//! Usage: `popup_demo [config.toml|config.ron]`

use guest_windows::foundation::logging;
use guest_windows::lifecycle::window_closed_channel;
use guest_windows::prelude::*;
use thiserror::Error;

/// Demo failures
#[derive(Error, Debug)]
enum DemoError {
    /// Window manager error
    #[error("Window manager error: {0}")]
    Manager(#[from] WindowManagerError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A step did not turn out as scripted
    #[error("Unexpected outcome in step '{step}': {outcome:?}")]
    Unexpected {
        /// Step name
        step: &'static str,
        /// What came back
        outcome: OpenOutcome,
    },
}

fn load_config() -> Result<WindowManagerConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => {
            let config = WindowManagerConfig::load_from_file(&path)?;
            log::info!("Loaded configuration from {}", path);
            Ok(config)
        }
        None => Ok(WindowManagerConfig::default()),
    }
}

fn expect_surface(step: &'static str, outcome: OpenOutcome) -> Result<SurfaceId, DemoError> {
    outcome.surface().ok_or(DemoError::Unexpected { step, outcome })
}

fn run(config: WindowManagerConfig) -> Result<(), DemoError> {
    let mut backend = HeadlessBackend::new();
    let host = backend.spawn_host(
        WindowOptions::new().with_size(1280.0, 800.0).with_title("Host"),
        CapabilityFlags::secure_defaults(),
    );
    let mut manager = GuestWindowManager::new(backend, config);
    manager.add_new_window_hook(|event: &NewWindowEvent<'_>| {
        event.url.starts_with("https://ads.").then_some(Decision::Veto)
    });

    println!("Host window: {host}");

    let help = expect_surface(
        "open",
        manager.open_guest_window(OpenRequest::new(
            host,
            WindowOpenArgs::new("https://example.com/help")
                .with_frame_name("help")
                .with_features("width=480,height=320,nodeIntegration=yes"),
        ))?,
    )?;
    let flags = manager.backend().resolved_capabilities(help);
    println!(
        "open   -> created {help} (nodeIntegration={:?}, opener={:?})",
        flags.node_integration, flags.opener_id
    );

    let reused = manager.open_guest_window(OpenRequest::new(
        host,
        WindowOpenArgs::new("https://example.com/help/faq").with_frame_name("help"),
    ))?;
    println!("reuse  -> {reused:?}");

    let vetoed = manager.open_guest_window(OpenRequest::new(
        host,
        WindowOpenArgs::new("https://ads.example.net/banner"),
    ))?;
    println!("veto   -> {vetoed:?}");

    let nested = expect_surface(
        "nested",
        manager.open_guest_window(OpenRequest::new(help, WindowOpenArgs::new("https://example.com/help/print")))?,
    )?;
    println!("nested -> created {nested} from {help}");

    manager.handle_event(SurfaceEvent::Closed(nested));
    let closed_channel = window_closed_channel(nested);
    let notified = manager
        .backend()
        .notifications()
        .iter()
        .any(|notification| notification.host == help && notification.channel == closed_channel);
    println!("close  -> {nested} closed, {help} notified: {notified}");

    manager.handle_event(SurfaceEvent::RenderViewDeleted(host));
    println!(
        "cascade-> destroyed {:?}, {} link(s) left, frame names {:?}",
        manager.backend().destroyed(),
        manager.lifecycle().link_count(),
        manager.registry().names()
    );

    Ok(())
}

fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    logging::init_with_filter(&config.log_filter);

    log::info!("Starting popup demo");
    if let Err(err) = run(config) {
        log::error!("Demo failed: {}", err);
        std::process::exit(1);
    }
}
