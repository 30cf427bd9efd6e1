//! Outbound ports: the payment gateway and the notification collaborator.
//!
//! Both are stateless service interfaces injected into workflow services so
//! they can be mocked in tests independently of the database.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainResult;

/// Request to create a hosted invoice at the payment gateway.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceRequest {
    pub external_ref: String,
    /// Amount in minor currency units
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub success_redirect_url: String,
    pub failure_redirect_url: String,
}

/// Opaque handle returned by the gateway for a created invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceHandle {
    pub gateway_invoice_id: String,
    pub payment_url: String,
}

/// Request to disburse a refund to a bank account.
#[derive(Debug, Clone, Serialize)]
pub struct DisbursementRequest {
    pub external_ref: String,
    pub amount: i64,
    pub bank_code: String,
    pub account_name: String,
    pub account_number: String,
    pub description: String,
}

/// Terminal result of a disbursement call, success or not. The raw body is
/// persisted on the order for audit.
#[derive(Debug, Clone)]
pub struct DisbursementOutcome {
    pub success: bool,
    pub raw_response: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an invoice; returns the gateway id and the hosted payment URL.
    async fn create_invoice(&self, request: &InvoiceRequest) -> DomainResult<InvoiceHandle>;

    /// Request a disbursement. Transport errors surface as `DomainError`;
    /// a reachable gateway that declines returns `success = false`.
    async fn create_disbursement(
        &self,
        request: &DisbursementRequest,
    ) -> DomainResult<DisbursementOutcome>;
}

/// In-app notification payload handed to the dispatcher.
#[derive(Debug, Clone)]
pub struct InAppNotification {
    pub title: String,
    pub body: String,
    /// Audience selector, e.g. a customer id or "staff"
    pub audience: String,
    pub channel: String,
    pub template_key: String,
    pub data: serde_json::Value,
}

/// Email payload handed to the mail relay.
#[derive(Debug, Clone)]
pub struct EmailNotification {
    pub subject: String,
    pub recipients: Vec<String>,
    pub template_key: String,
    pub data: serde_json::Value,
}

/// Best-effort notification fan-out. Channel failures are reported as
/// errors so sweeps can log them; they must never abort a sweep.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch_in_app(&self, notification: &InAppNotification) -> DomainResult<()>;

    async fn dispatch_email(&self, email: &EmailNotification) -> DomainResult<()>;
}
