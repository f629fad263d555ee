//! Offline evaluation of load value prediction.
//!
//! Load records from a trace are replayed through a last-value (LV) and a
//! last-stride (LS) predictor, each backed by a small set-associative
//! table. For every load, both tables are searched and a chooser picks
//! one of their predictions *before* the tables are trained with the
//! loaded value.

pub mod error;
pub mod load;
pub mod predictor;
pub mod trace;
pub mod stats;
pub mod eval;

pub use error::*;
pub use load::*;
pub use predictor::*;
pub use trace::*;
pub use stats::*;
pub use eval::*;
