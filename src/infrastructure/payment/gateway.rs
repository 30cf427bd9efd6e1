//! HTTP payment gateway client
//!
//! Thin reqwest client over the hosted-invoice gateway. Transport failures
//! and non-success invoice responses surface as `DomainError::Gateway`; a
//! reachable gateway declining a disbursement is a normal outcome.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::PaymentConfig;
use crate::domain::ports::{
    DisbursementOutcome, DisbursementRequest, InvoiceHandle, InvoiceRequest, PaymentGateway,
};
use crate::domain::{DomainError, DomainResult};

pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct InvoiceResponse {
    id: String,
    invoice_url: String,
}

impl HttpPaymentGateway {
    pub fn new(config: &PaymentConfig) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::Gateway(format!("http client init failed: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_invoice(&self, request: &InvoiceRequest) -> DomainResult<InvoiceHandle> {
        debug!(external_ref = %request.external_ref, "creating gateway invoice");

        let response = self
            .client
            .post(format!("{}/v2/invoices", self.base_url))
            .basic_auth(&self.api_key, None::<&str>)
            .json(request)
            .send()
            .await
            .map_err(|e| DomainError::Gateway(format!("invoice request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "gateway rejected invoice creation: {}", body);
            return Err(DomainError::Gateway(format!(
                "invoice creation returned {status}"
            )));
        }

        let parsed: InvoiceResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Gateway(format!("invalid invoice response: {e}")))?;

        Ok(InvoiceHandle {
            gateway_invoice_id: parsed.id,
            payment_url: parsed.invoice_url,
        })
    }

    async fn create_disbursement(
        &self,
        request: &DisbursementRequest,
    ) -> DomainResult<DisbursementOutcome> {
        debug!(external_ref = %request.external_ref, "creating disbursement");

        let response = self
            .client
            .post(format!("{}/disbursements", self.base_url))
            .basic_auth(&self.api_key, None::<&str>)
            .json(request)
            .send()
            .await
            .map_err(|e| DomainError::Gateway(format!("disbursement request failed: {e}")))?;

        let status = response.status();
        let raw_response = response.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!(%status, "disbursement declined: {}", raw_response);
        }

        Ok(DisbursementOutcome {
            success: status.is_success(),
            raw_response,
        })
    }
}
