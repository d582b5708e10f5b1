//! Itemised cost estimates.

pub mod model;

pub use model::{CreateQuote, Quote, QuoteItem, QuoteStatus};
