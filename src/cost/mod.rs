//! Cost report parsing for AI-generated quotations.
//!
//! Turns the free-text report produced upstream into a structured breakdown
//! (materials, labour, VAT, totals), rebuilding the subtotal from its parts
//! so a padded stated subtotal never reaches the customer.

pub mod parser;
pub mod types;
pub mod validation;

pub use parser::{parse_cost_analysis, CostParser, ParserOptions};
pub use types::*;
pub use validation::validate_analysis;
