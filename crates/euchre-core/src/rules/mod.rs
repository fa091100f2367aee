pub mod ranking;

pub use ranking::{effective_suit, is_trump, rank};
