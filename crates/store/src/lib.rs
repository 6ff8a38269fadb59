pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use common::{LineItemId, OrderId};
pub use error::{RepositoryError, Result};
pub use memory::{InMemoryOrderRepository, StorageOp};
pub use postgres::PostgresOrderRepository;
pub use repository::OrderRepository;
