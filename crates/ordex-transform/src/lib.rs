//! Order-state export transformation.
//!
//! - **normalize**: splits `|`-joined composite cells into aligned order
//!   lines and formats prices and quantities
//! - **assign**: state, carrier, partial-split and numbering policies
//! - **pipeline**: the sequential row loop with explicit run counters

pub mod assign;
pub mod normalize;
pub mod pipeline;

pub use assign::{Assigner, RunCounters};
pub use normalize::{explode_row, format_price, parse_quantity, split_composite};
pub use pipeline::{ExportPipeline, ExportRun};
