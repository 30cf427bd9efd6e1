//! Subscription purchase workflow
//!
//! Mirrors the booking flow without seats: create the gateway invoice, then
//! persist the invoice mirror and a PENDING subscription order. Activation
//! happens in reconciliation when the payment callback lands.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::info;

use crate::config::PaymentConfig;
use crate::domain::invoice::PaymentOutcome;
use crate::domain::ports::{InvoiceRequest, PaymentGateway};
use crate::domain::subscription::SubscriptionStatus;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{customer, invoice, subscription_order};
use crate::shared::codes;

#[derive(Debug, Clone)]
pub struct SubscriptionRequest {
    pub customer_id: i32,
    pub duration_months: u32,
    /// Minor currency units
    pub amount: i64,
}

#[derive(Debug, Clone)]
pub struct SubscriptionConfirmation {
    pub subscription_id: i32,
    pub code: String,
    pub external_ref: String,
    pub payment_url: String,
}

pub struct SubscriptionService {
    db: DatabaseConnection,
    gateway: Arc<dyn PaymentGateway>,
    payment: PaymentConfig,
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

impl SubscriptionService {
    pub fn new(
        db: DatabaseConnection,
        gateway: Arc<dyn PaymentGateway>,
        payment: PaymentConfig,
    ) -> Self {
        Self { db, gateway, payment }
    }

    pub async fn create(
        &self,
        req: SubscriptionRequest,
    ) -> DomainResult<SubscriptionConfirmation> {
        if req.duration_months == 0 {
            return Err(DomainError::Validation(
                "duration must be at least one month".to_string(),
            ));
        }
        if req.amount <= 0 {
            return Err(DomainError::Validation(
                "amount must be positive".to_string(),
            ));
        }

        let customer_row = customer::Entity::find_by_id(req.customer_id)
            .filter(customer::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::NotFound {
                entity: "Customer",
                field: "id",
                value: req.customer_id.to_string(),
            })?;

        let external_ref = codes::external_ref();
        let code = codes::subscription_code();

        let handle = self
            .gateway
            .create_invoice(&InvoiceRequest {
                external_ref: external_ref.clone(),
                amount: req.amount,
                currency: self.payment.currency.clone(),
                description: format!("{} {} month subscription", code, req.duration_months),
                customer_name: customer_row.name.clone(),
                customer_phone: customer_row.phone.clone(),
                success_redirect_url: self.payment.success_redirect_url.clone(),
                failure_redirect_url: self.payment.failure_redirect_url.clone(),
            })
            .await?;

        let now = Utc::now();
        let txn = self.db.begin().await.map_err(db_err)?;

        let invoice_row = invoice::ActiveModel {
            external_ref: Set(external_ref.clone()),
            gateway_invoice_id: Set(handle.gateway_invoice_id),
            payment_url: Set(handle.payment_url.clone()),
            raw_status: Set("PENDING".to_string()),
            normalized_status: Set(PaymentOutcome::normalize("PENDING").as_str().to_string()),
            paid_amount: Set(None),
            paid_at: Set(None),
            payment_method: Set(None),
            payment_channel: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        let sub_row = subscription_order::ActiveModel {
            code: Set(code),
            customer_id: Set(customer_row.id),
            invoice_id: Set(Some(invoice_row.id)),
            duration_months: Set(req.duration_months as i32),
            amount: Set(req.amount),
            status: Set(SubscriptionStatus::Pending.as_str().to_string()),
            expired_date: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(
            subscription_id = sub_row.id,
            code = %sub_row.code,
            months = req.duration_months,
            "📦 Subscription order created"
        );

        Ok(SubscriptionConfirmation {
            subscription_id: sub_row.id,
            code: sub_row.code,
            external_ref,
            payment_url: handle.payment_url,
        })
    }
}
