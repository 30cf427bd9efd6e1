pub mod model;
pub mod repository;

pub use model::{Discount, Voucher, VoucherKind};
pub use repository::VoucherRepository;
