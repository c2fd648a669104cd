pub mod memory;
pub mod mysql;

pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
pub use parkspot_core::repository::{ReadRepository, Repository};
pub use parkspot_core::{StorageError, UniqueConstraint};
