pub mod dynamo;
pub mod error;
pub mod keys;
pub mod memory;
pub mod table;

pub use dynamo::DynamoTable;
pub use error::StoreError;
pub use memory::MemoryTable;
pub use table::Table;
