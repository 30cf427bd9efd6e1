pub mod codes;
pub mod keyed_lock;
pub mod shutdown;

pub use codes::*;
pub use keyed_lock::KeyedLock;
pub use shutdown::*;
