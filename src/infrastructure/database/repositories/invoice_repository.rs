//! SeaORM implementation of InvoiceRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::domain::invoice::{Invoice, InvoiceRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::invoice;

pub struct SeaOrmInvoiceRepository {
    db: DatabaseConnection,
}

impl SeaOrmInvoiceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn invoice_to_domain(m: invoice::Model) -> Invoice {
    Invoice {
        id: m.id,
        external_ref: m.external_ref,
        gateway_invoice_id: m.gateway_invoice_id,
        payment_url: m.payment_url,
        raw_status: m.raw_status,
        normalized_status: m.normalized_status,
        paid_amount: m.paid_amount,
        paid_at: m.paid_at,
        payment_method: m.payment_method,
        payment_channel: m.payment_channel,
        created_at: m.created_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

// ── InvoiceRepository impl ──────────────────────────────────────

#[async_trait]
impl InvoiceRepository for SeaOrmInvoiceRepository {
    async fn find_by_external_ref(&self, external_ref: &str) -> DomainResult<Option<Invoice>> {
        let model = invoice::Entity::find()
            .filter(invoice::Column::ExternalRef.eq(external_ref))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(invoice_to_domain))
    }
}
