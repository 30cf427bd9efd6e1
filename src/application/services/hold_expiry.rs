//! Background task that releases expired seat holds.
//!
//! Runs in a tokio::spawn loop, checking every `hold_check_interval_secs`
//! for ONHOLD seats past their `hold_expires_at`, releasing them back to
//! AVAILABLE and expiring the pending order that held them.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::domain::RepositoryProvider;
use crate::shared::shutdown::ShutdownSignal;

/// Start the seat hold expiry background task.
pub fn start_hold_expiry_task(
    repos: Arc<dyn RepositoryProvider>,
    shutdown: ShutdownSignal,
    check_interval_secs: u64,
) {
    tokio::spawn(async move {
        info!(
            check_interval = check_interval_secs,
            "⏳ Seat hold expiry task started"
        );

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = release_expired_holds(&repos).await {
                        warn!(error = %e, "Hold expiry check error");
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("⏳ Seat hold expiry task shutting down");
                    break;
                }
            }
        }

        info!("⏳ Seat hold expiry task stopped");
    });
}

async fn release_expired_holds(
    repos: &Arc<dyn RepositoryProvider>,
) -> Result<(), Box<dyn std::error::Error>> {
    let expired = repos.seats().find_expired_holds(Utc::now()).await?;

    if expired.is_empty() {
        return Ok(());
    }

    info!(count = expired.len(), "Releasing expired seat holds");

    for seat in expired {
        // CAS: a concurrent payment confirmation wins over the sweep.
        match repos.seats().release(seat.id, seat.version).await {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => {
                warn!(seat_id = seat.id, error = %e, "Failed to release seat hold");
                continue;
            }
        }

        match repos.orders().find_pending_for_seat(seat.id).await {
            Ok(Some(order)) => {
                if let Err(e) = repos.orders().expire_pending(order.id).await {
                    warn!(order_id = order.id, error = %e, "Failed to expire order");
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(seat_id = seat.id, error = %e, "Failed to look up holding order");
            }
        }
    }

    Ok(())
}
