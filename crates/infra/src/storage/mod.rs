//! `SessionStorage` implementations.

mod memory;

pub use memory::MemoryStorage;
