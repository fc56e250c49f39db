//! Card registry loading

pub mod catalog;
pub mod registry;

pub use registry::{CardRegistry, TradeDeckEntry};
