//! Implementations of load value predictors.

pub mod counter;
pub mod geometry;
pub mod replacement;
pub mod table;
pub mod lv;
pub mod ls;
pub mod chooser;

pub use counter::*;
pub use geometry::*;
pub use replacement::*;
pub use table::*;
pub use lv::*;
pub use ls::*;
pub use chooser::*;

use crate::load::AccessWidth;

/// A last-value predictor.
pub type LastValueTable = SetAssocTable<LastValueEntry>;

/// A last-stride predictor.
pub type LastStrideTable = SetAssocTable<LastStrideEntry>;

/// Container for lookups into both tables for a single load, made before
/// the loaded value is known.
#[derive(Clone, Copy, Debug)]
pub struct Probe {
    pub lv: Lookup<LastValueEntry>,
    pub ls: Lookup<LastStrideEntry>,
}
impl Probe {
    /// The candidate from the last-value table, if it hit.
    pub fn lv_candidate(&self, width: AccessWidth) -> Option<Candidate> {
        self.lv.prediction(width)
            .map(|(value, confidence)| Candidate { value, confidence })
    }

    /// The candidate from the last-stride table, if it hit an entry that
    /// has learned a stride.
    pub fn ls_candidate(&self, width: AccessWidth) -> Option<Candidate> {
        self.ls.prediction(width)
            .map(|(value, confidence)| Candidate { value, confidence })
    }
}
