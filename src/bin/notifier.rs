use anyhow::Result;
use cargolink::realtime::{tags, ConnectionRegistry, EventKind, TracingInvalidator};
use cargolink::{init_tracing_with_level, NotifierConfig, ShutdownManager};
use cargolink_notifier::bin_common::{load_config_from_env, ConfigType};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load config first (before logging is initialized)
    let config_path = load_config_from_env(ConfigType::Notifier);
    let config = NotifierConfig::load(&config_path)?;

    // Initialize logging with configured level
    init_tracing_with_level(&config.log_level);
    config.log();

    let registry = ConnectionRegistry::new(
        config.server.ws_url.clone(),
        config.realtime.clone(),
        Arc::new(TracingInvalidator),
        None,
    );

    let identity = config.identity.to_identity();
    print_banner(&identity.to_string());

    let service = registry.acquire(identity).await?;

    // Log each typed event as it arrives
    for tag in [
        tags::BOOKING_UPDATE,
        tags::NOTIFICATION,
        tags::DASHBOARD_UPDATE,
        tags::VEHICLE_LOCATION,
    ] {
        service.add_event_listener(tag, |event| {
            match event.kind() {
                EventKind::BookingUpdated(update) => {
                    info!(booking = %update.booking_id, status = ?update.status, "booking updated");
                }
                EventKind::NotificationReceived(push) => {
                    info!(title = %push.title, "notification received");
                }
                EventKind::DashboardChanged => {
                    info!("dashboard aggregates changed");
                }
                EventKind::VehicleMoved(position) => {
                    info!(
                        vehicle = %position.vehicle_id,
                        lat = position.latitude,
                        lng = position.longitude,
                        "vehicle moved"
                    );
                }
                EventKind::Unknown(tag) => {
                    info!(%tag, "event with unrecognized shape");
                }
            }
            Ok(())
        });
    }

    let shutdown = ShutdownManager::new();
    shutdown.spawn_signal_handler();

    while shutdown.is_running() {
        while let Some(event) = service.try_recv_link_event() {
            use resocket::LinkEvent;
            match event {
                LinkEvent::Connected => info!("realtime link connected"),
                LinkEvent::Disconnected => warn!("realtime link disconnected"),
                LinkEvent::Reconnecting(attempt) => {
                    info!(attempt, "realtime link reconnecting")
                }
                LinkEvent::Exhausted => {
                    warn!("reconnect budget exhausted; restart the notifier to reconnect")
                }
                LinkEvent::Error(reason) => warn!(%reason, "realtime link error"),
            }
        }

        shutdown.interruptible_sleep(Duration::from_secs(1)).await;
    }

    registry.release().await?;
    print_shutdown();
    Ok(())
}

fn print_banner(identity: &str) {
    info!("");
    info!("========================================");
    info!("Starting CargoLink Notifier");
    info!("Identity: {}", identity);
    info!("Press Ctrl+C to stop");
    info!("========================================");
    info!("");
}

fn print_shutdown() {
    info!("");
    info!("========================================");
    info!("Notifier stopped gracefully");
    info!("========================================");
}
