//! History Module
//!
//! 計測履歴の型とストア抽象化

mod memory;
mod store;
mod types;

pub use memory::MemoryHistoryStore;
pub use store::{HistoryStore, ReadingStore};
pub use types::{check_amount, NewReading, Reading, SortOrder};
