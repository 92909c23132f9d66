mod engine;
pub mod merge;
pub mod order;

pub use engine::SyncEngine;
