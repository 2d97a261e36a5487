use anyhow::{Context, Result};
use mdfloat::backend::GlobalBackend;
use mdfloat::event::OverlayEvent;
use mdfloat::icon::TrayState;
use mdfloat::notify::NotificationLayer;
use mdfloat::overlay::{KeyResponse, Overlay, Timings};
use mdfloat::schedule::Scheduler;
use mdfloat::{
    APP_NAME_PRETTY, ConfigManager, DEFAULT_LOG_LEVEL, HotkeyBinding, HotkeyRegistry, VERSION,
    Visibility,
};
use parking_lot::Mutex;
use tao::dpi::LogicalSize;
use tao::event::{Event, StartCause, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder};
use tao::window::WindowBuilder;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tray_icon::menu::{AboutMetadataBuilder, Menu, MenuEvent, MenuItem, PredefinedMenuItem};
use tray_icon::{TrayIcon, TrayIconBuilder};

fn main() -> Result<()> {
    // Initialize the logger
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MDFLOAT_LOG")
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .finish()
        .with(NotificationLayer::new())
        .init();

    // Load config
    let config_manager = ConfigManager::new()?;
    let config = config_manager.load()?;
    // save back the config to create the file if it doesn't exist
    config_manager.save(&config)?;
    info!(path = ?config_manager.config_path(), version = VERSION, "config loaded");

    let event_loop: EventLoop<OverlayEvent> = EventLoopBuilder::with_user_event().build();
    let event_sender = event_loop.create_proxy();

    let window = WindowBuilder::new()
        .with_title(APP_NAME_PRETTY)
        .with_inner_size(LogicalSize::new(720.0, 540.0))
        .with_decorations(false)
        .with_always_on_top(true)
        .with_visible(false)
        .build(&event_loop)
        .context("Failed to create overlay window")?;

    // Timers for animations and inline messages
    let scheduler = Scheduler::new(event_sender.clone())?;

    // Set up the global shortcut. The hook can fire off the main thread, so
    // it only posts an event.
    let hook_sender = Mutex::new(event_sender);
    let mut registry = HotkeyRegistry::new(GlobalBackend::new(), config_manager, move || {
        hook_sender
            .lock()
            .send_event(OverlayEvent::HotkeyPressed)
            .ok();
    });
    if let Err(e) = registry.register_stored() {
        error!("{e}. Open the overlay from the tray menu to record a new shortcut.");
    }

    let timings = Timings {
        show: config.show_duration(),
        hide: config.hide_duration(),
    };
    let mut overlay = Overlay::new(window, scheduler, timings, registry);

    // Create the tray menu
    let tray_menu = Menu::new();
    let icon_toggle = MenuItem::new("Show overlay", true, None);
    let icon_record = MenuItem::new("Record shortcut…", true, None);
    let icon_quit = MenuItem::new("Quit", true, None);
    tray_menu.append_items(&[
        // the name of the app
        &MenuItem::new(APP_NAME_PRETTY, false, None),
        &PredefinedMenuItem::separator(),
        &PredefinedMenuItem::about(
            None,
            Some(
                AboutMetadataBuilder::new()
                    .version(Some(VERSION.to_owned()))
                    .build(),
            ),
        ),
        &icon_toggle,
        &icon_record,
        &PredefinedMenuItem::separator(),
        &icon_quit,
    ])?;

    // Set up the event loop
    let mut icon_tray: Option<TrayIcon> = None;
    let mut shown_shortcut = overlay.shortcut();
    let mut shown_visibility = overlay.visibility();

    let menu_channel = MenuEvent::receiver();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::NewEvents(StartCause::Init) => {
                // We create the icon once the event loop is actually running
                // to prevent issues like https://github.com/tauri-apps/tray-icon/issues/90
                match build_tray(&tray_menu, shown_shortcut) {
                    Ok(tray) => {
                        icon_tray.replace(tray);
                    }
                    Err(e) => error!("Failed to create tray icon: {e:#}"),
                }

                // Request a redraw so the icon actually shows up. Tao only exposes
                // a redraw method on the Window, so core-foundation is used directly.
                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};

                    let rl = CFRunLoopGetMain();
                    CFRunLoopWakeUp(rl);
                }

                info!("mdfloat ready");
            }
            Event::UserEvent(event) => overlay.handle_event(event),
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::ModifiersChanged(modifiers) => overlay.set_modifiers(modifiers),
                WindowEvent::KeyboardInput { event, .. } => {
                    if overlay.handle_key(&event) == KeyResponse::Quit {
                        overlay.shutdown();
                        icon_tray.take();
                        *control_flow = ControlFlow::Exit;
                    }
                }
                WindowEvent::CloseRequested => overlay.close(),
                _ => {}
            },
            Event::LoopDestroyed => overlay.shutdown(),
            _ => {}
        }

        if let Ok(event) = menu_channel.try_recv() {
            if event.id == icon_quit.id() {
                overlay.shutdown();
                icon_tray.take();
                *control_flow = ControlFlow::Exit;
            } else if event.id == icon_toggle.id() {
                overlay.toggle();
            } else if event.id == icon_record.id() {
                overlay.start_recording();
            }
        }

        // Keep the tray in sync with the overlay
        if overlay.visibility() != shown_visibility {
            shown_visibility = overlay.visibility();
            icon_toggle.set_text(toggle_text(shown_visibility));
        }
        if overlay.shortcut() != shown_shortcut {
            shown_shortcut = overlay.shortcut();
            if let Some(tray) = icon_tray.as_ref() {
                if let Err(e) = update_tray(tray, shown_shortcut) {
                    warn!("Failed to update tray icon: {e:#}");
                }
            }
        }
    });
}

fn build_tray(menu: &Menu, shortcut: Option<HotkeyBinding>) -> Result<TrayIcon> {
    let tray = TrayIconBuilder::new()
        .with_menu(Box::new(menu.clone()))
        .with_tooltip(tooltip(shortcut))
        .with_icon(TrayState::for_shortcut(shortcut).icon()?)
        .build()?;
    Ok(tray)
}

fn update_tray(tray: &TrayIcon, shortcut: Option<HotkeyBinding>) -> Result<()> {
    tray.set_icon(Some(TrayState::for_shortcut(shortcut).icon()?))?;
    tray.set_tooltip(Some(tooltip(shortcut)))?;
    Ok(())
}

fn tooltip(shortcut: Option<HotkeyBinding>) -> String {
    match shortcut {
        Some(binding) => format!("{APP_NAME_PRETTY} - {binding}"),
        None => format!("{APP_NAME_PRETTY} - no shortcut"),
    }
}

fn toggle_text(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Hidden | Visibility::Hiding => "Show overlay",
        Visibility::Showing | Visibility::Visible => "Hide overlay",
    }
}
