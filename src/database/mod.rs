pub mod memory;
pub mod pg_store;
pub mod pool;
pub mod store;
