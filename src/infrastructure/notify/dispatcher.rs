//! Notification dispatcher
//!
//! In-app notifications become inbox rows; emails are forwarded to the mail
//! relay over HTTP. Callers treat both channels as best-effort.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::json;
use tracing::{debug, warn};

use crate::config::MailConfig;
use crate::domain::ports::{EmailNotification, InAppNotification, NotificationDispatcher};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::notification;

pub struct ServiceNotificationDispatcher {
    db: DatabaseConnection,
    client: reqwest::Client,
    relay_url: String,
    sender: String,
}

impl ServiceNotificationDispatcher {
    pub fn new(db: DatabaseConnection, config: &MailConfig) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::Gateway(format!("http client init failed: {e}")))?;

        Ok(Self {
            db,
            client,
            relay_url: config.relay_url.trim_end_matches('/').to_string(),
            sender: config.sender.clone(),
        })
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

#[async_trait]
impl NotificationDispatcher for ServiceNotificationDispatcher {
    async fn dispatch_in_app(&self, n: &InAppNotification) -> DomainResult<()> {
        debug!(audience = %n.audience, template = %n.template_key, "writing in-app notification");

        let model = notification::ActiveModel {
            customer_id: Set(n.audience.parse::<i32>().ok()),
            title: Set(n.title.clone()),
            body: Set(n.body.clone()),
            kind: Set(n.channel.clone()),
            is_read: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn dispatch_email(&self, email: &EmailNotification) -> DomainResult<()> {
        if self.relay_url.is_empty() {
            debug!("mail relay not configured, skipping email dispatch");
            return Ok(());
        }

        let payload = json!({
            "from": self.sender,
            "to": email.recipients,
            "subject": email.subject,
            "template": email.template_key,
            "data": email.data,
        });

        let response = self
            .client
            .post(format!("{}/send", self.relay_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| DomainError::Gateway(format!("mail relay unreachable: {e}")))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "mail relay rejected email");
            return Err(DomainError::Gateway(format!(
                "mail relay returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
