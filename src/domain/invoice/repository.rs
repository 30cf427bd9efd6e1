//! Invoice repository interface

use async_trait::async_trait;

use super::model::Invoice;
use crate::domain::DomainResult;

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Look up the mirror row by the merchant-side external reference.
    async fn find_by_external_ref(&self, external_ref: &str) -> DomainResult<Option<Invoice>>;
}
