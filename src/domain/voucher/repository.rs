//! Voucher repository interface

use async_trait::async_trait;

use super::model::Voucher;
use crate::domain::DomainResult;

#[async_trait]
pub trait VoucherRepository: Send + Sync {
    async fn find_by_code(&self, code: &str) -> DomainResult<Option<Voucher>>;
}
