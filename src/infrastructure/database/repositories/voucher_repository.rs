//! SeaORM implementation of VoucherRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::domain::voucher::{Voucher, VoucherKind, VoucherRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::voucher;

pub struct SeaOrmVoucherRepository {
    db: DatabaseConnection,
}

impl SeaOrmVoucherRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn voucher_to_domain(m: voucher::Model) -> Voucher {
    Voucher {
        id: m.id,
        code: m.code,
        kind: VoucherKind::from_str(&m.kind),
        value: m.value,
        is_active: m.is_active,
        expires_at: m.expires_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

#[async_trait]
impl VoucherRepository for SeaOrmVoucherRepository {
    async fn find_by_code(&self, code: &str) -> DomainResult<Option<Voucher>> {
        let model = voucher::Entity::find()
            .filter(voucher::Column::Code.eq(code))
            .filter(voucher::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(voucher_to_domain))
    }
}
