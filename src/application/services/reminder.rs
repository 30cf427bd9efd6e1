//! Reminder sweeps
//!
//! Two idempotent scan-and-notify passes, triggered over HTTP by an
//! external scheduler. The departure sweep reminds paid customers whose
//! trip leaves within 24 hours; the maintenance sweep tells staff about
//! vehicles near a service threshold or an expiring document. Watermarks
//! on the scanned rows keep overlapping runs from double-sending.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{EmailNotification, InAppNotification, NotificationDispatcher};
use crate::domain::reminder::{classify_departure, date_due, odometer_due};
use crate::domain::{DomainResult, RepositoryProvider};

/// Counters from one sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub checked: usize,
    pub due: usize,
    pub sent: usize,
}

pub struct ReminderService {
    repos: Arc<dyn RepositoryProvider>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    maintenance_tolerance_km: i64,
}

impl ReminderService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        maintenance_tolerance_km: i64,
    ) -> Self {
        Self {
            repos,
            dispatcher,
            maintenance_tolerance_km,
        }
    }

    /// Remind paid orders whose trip departs within the next 24 hours.
    pub async fn departure_sweep(&self) -> DomainResult<SweepReport> {
        let mut report = SweepReport::default();
        let now = Utc::now().naive_utc();

        for order in self.repos.orders().list_paid().await? {
            report.checked += 1;

            // One reminder per order, ever; the watermark survives
            // overlapping sweep runs.
            if order.last_reminded_at.is_some() {
                continue;
            }

            let Some(trip) = self.repos.trips().find_by_id(order.trip_id).await? else {
                warn!(order_id = order.id, trip_id = order.trip_id, "Order references missing trip");
                continue;
            };

            let window = classify_departure(Some(trip.date), &trip.departure_time, now);
            if !window.should_dispatch() {
                continue;
            }
            report.due += 1;

            let note = InAppNotification {
                title: "Your trip departs soon".to_string(),
                body: format!(
                    "{} to {} departs {} at {}",
                    trip.departure_city, trip.arrival_city, trip.date, trip.departure_time
                ),
                audience: order.customer_id.to_string(),
                channel: "DEPARTURE".to_string(),
                template_key: "departure_reminder".to_string(),
                data: json!({
                    "order_code": order.code,
                    "trip_code": trip.code,
                    "departure_time": trip.departure_time,
                }),
            };

            let mut delivered = false;
            if let Err(e) = self.dispatcher.dispatch_in_app(&note).await {
                warn!(order_id = order.id, error = %e, "In-app departure reminder failed");
            } else {
                delivered = true;
            }

            if let Ok(Some(customer)) =
                self.repos.customers().find_by_id(order.customer_id).await
            {
                if let Some(email) = customer.email {
                    let mail = EmailNotification {
                        subject: format!("Departure reminder for {}", order.code),
                        recipients: vec![email],
                        template_key: "departure_reminder".to_string(),
                        data: json!({
                            "customer_name": customer.name,
                            "order_code": order.code,
                            "departure_city": trip.departure_city,
                            "arrival_city": trip.arrival_city,
                            "date": trip.date.to_string(),
                            "departure_time": trip.departure_time,
                        }),
                    };
                    if let Err(e) = self.dispatcher.dispatch_email(&mail).await {
                        warn!(order_id = order.id, error = %e, "Email departure reminder failed");
                    } else {
                        delivered = true;
                    }
                }
            }

            if delivered {
                self.repos.orders().mark_reminded(order.id, Utc::now()).await?;
                report.sent += 1;
            }
        }

        info!(
            checked = report.checked,
            due = report.due,
            sent = report.sent,
            "🔔 Departure sweep complete"
        );
        Ok(report)
    }

    /// Remind staff about vehicles due for odometer service or with an
    /// inspection/registration document expiring inside the lookahead.
    pub async fn maintenance_sweep(&self) -> DomainResult<SweepReport> {
        let mut report = SweepReport::default();
        let today = Utc::now().date_naive();

        for vehicle in self.repos.fleet().list_vehicles().await? {
            report.checked += 1;

            if let Some(interval) = vehicle.service_interval_km {
                if let Some(due) =
                    odometer_due(vehicle.odometer_km, interval, self.maintenance_tolerance_km)
                {
                    if due.cycle > vehicle.service_cycle_notified {
                        report.due += 1;
                        let sent = self
                            .notify_staff(
                                "Vehicle service due",
                                format!(
                                    "{} ({}) is at {} km, service threshold {} km{}",
                                    vehicle.name,
                                    vehicle.plate_number,
                                    vehicle.odometer_km,
                                    due.threshold_km,
                                    if due.overdue { " (overdue)" } else { "" }
                                ),
                                json!({
                                    "vehicle_id": vehicle.id,
                                    "odometer_km": vehicle.odometer_km,
                                    "threshold_km": due.threshold_km,
                                }),
                            )
                            .await;
                        if sent {
                            self.repos
                                .fleet()
                                .set_service_notified(vehicle.id, due.cycle)
                                .await?;
                            report.sent += 1;
                        }
                    }
                }
            }

            if let Some(due_date) = vehicle.inspection_due {
                if date_due(Some(due_date), today)
                    && vehicle.inspection_notified_for != Some(due_date)
                {
                    report.due += 1;
                    let sent = self
                        .notify_staff(
                            "Vehicle inspection expiring",
                            format!(
                                "{} ({}) inspection expires {}",
                                vehicle.name, vehicle.plate_number, due_date
                            ),
                            json!({ "vehicle_id": vehicle.id, "due": due_date.to_string() }),
                        )
                        .await;
                    if sent {
                        self.repos
                            .fleet()
                            .set_inspection_notified(vehicle.id, due_date)
                            .await?;
                        report.sent += 1;
                    }
                }
            }

            if let Some(due_date) = vehicle.registration_due {
                if date_due(Some(due_date), today)
                    && vehicle.registration_notified_for != Some(due_date)
                {
                    report.due += 1;
                    let sent = self
                        .notify_staff(
                            "Vehicle registration expiring",
                            format!(
                                "{} ({}) registration expires {}",
                                vehicle.name, vehicle.plate_number, due_date
                            ),
                            json!({ "vehicle_id": vehicle.id, "due": due_date.to_string() }),
                        )
                        .await;
                    if sent {
                        self.repos
                            .fleet()
                            .set_registration_notified(vehicle.id, due_date)
                            .await?;
                        report.sent += 1;
                    }
                }
            }
        }

        info!(
            checked = report.checked,
            due = report.due,
            sent = report.sent,
            "🔧 Maintenance sweep complete"
        );
        Ok(report)
    }

    async fn notify_staff(&self, title: &str, body: String, data: serde_json::Value) -> bool {
        let note = InAppNotification {
            title: title.to_string(),
            body,
            audience: "staff".to_string(),
            channel: "MAINTENANCE".to_string(),
            template_key: "maintenance_reminder".to_string(),
            data,
        };
        match self.dispatcher.dispatch_in_app(&note).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Maintenance notification failed");
                false
            }
        }
    }
}
