//! Types for implementing a set-associative table of value predictors.

use crate::load::AccessWidth;
use crate::error::ConfigError;
use crate::predictor::*;

/// Interface to an entry in a [`SetAssocTable`].
///
/// The table only deals with indexing, tag matching and replacement.
/// Everything about *how* an entry learns from observed values and what
/// it predicts belongs to the implementor.
pub trait ValueEntry: Copy + Default {
    /// Short name used when reporting on a table of these entries.
    const NAME: &'static str;

    /// Approximate number of storage bits for one entry, excluding the tag.
    fn payload_bits() -> usize;

    /// The tag stored in this entry.
    fn tag(&self) -> u64;

    /// Returns true if this entry holds live state.
    fn is_valid(&self) -> bool;

    /// The current value of the confidence counter.
    fn confidence(&self) -> u8;

    /// Overwrite this entry after a miss.
    fn init(&mut self, tag: u64, value: u64, width: AccessWidth);

    /// Train this entry after a hit.
    fn update(&mut self, tag: u64, value: u64, width: AccessWidth);

    /// Return a predicted value, if this entry is able to make one.
    fn prediction(&self, width: AccessWidth) -> Option<u64>;
}

/// The result of searching a [`SetAssocTable`] for a program counter value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup<E> {
    /// A valid entry with a matching tag was found in some way.
    Hit { set: usize, way: usize, entry: E },

    /// No matching entry in the set.
    Miss { set: usize },
}
impl<E: ValueEntry> Lookup<E> {
    pub fn is_hit(&self) -> bool { matches!(self, Self::Hit { .. }) }

    pub fn set(&self) -> usize {
        match self {
            Self::Hit { set, .. } | Self::Miss { set } => *set,
        }
    }

    /// A snapshot of the matching entry.
    pub fn entry(&self) -> Option<&E> {
        match self {
            Self::Hit { entry, .. } => Some(entry),
            Self::Miss { .. } => None,
        }
    }

    /// Returns the predicted value and confidence when the lookup hit
    /// an entry which is able to make a prediction.
    pub fn prediction(&self, width: AccessWidth) -> Option<(u64, u8)> {
        let entry = self.entry()?;
        entry.prediction(width).map(|v| (v, entry.confidence()))
    }
}

/// A set-associative table of [`ValueEntry`] with round-robin replacement.
#[derive(Clone, Debug)]
pub struct SetAssocTable<E: ValueEntry> {
    geometry: Geometry,

    /// Slots, `assoc` consecutive entries per set
    data: Vec<E>,

    /// Replacement state
    rr: RoundRobin,
}
impl<E: ValueEntry> SetAssocTable<E> {
    pub fn new(geometry: Geometry) -> Self {
        log::debug!("{} table: {} entries, {} sets x {} ways, tag_shift={}",
            E::NAME, geometry.entries, geometry.sets, geometry.assoc,
            geometry.tag_shift
        );
        Self {
            data: vec![E::default(); geometry.entries],
            rr: RoundRobin::new(geometry.sets, geometry.assoc),
            geometry,
        }
    }

    pub fn from_config(cfg: TableConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(cfg.build()?))
    }

    pub fn geometry(&self) -> &Geometry { &self.geometry }

    /// Returns the number of entries in the table.
    pub fn size(&self) -> usize { self.data.len() }

    /// Returns the number of valid entries.
    pub fn occupancy(&self) -> usize {
        self.data.iter().filter(|e| e.is_valid()).count()
    }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        let tag_bits = 64usize.saturating_sub(self.geometry.tag_shift as usize);
        (tag_bits + E::payload_bits()) * self.size()
    }

    /// Search the set for a valid entry with a matching tag.
    pub fn lookup(&self, pc: u64) -> Lookup<E> {
        let (set, tag) = self.geometry.decode(pc);
        let base = self.geometry.base(set);
        let ways = &self.data[base..base + self.geometry.assoc];
        for (way, entry) in ways.iter().enumerate() {
            if entry.is_valid() && entry.tag() == tag {
                return Lookup::Hit { set, way, entry: *entry };
            }
        }
        Lookup::Miss { set }
    }

    /// Train the table with the value observed for a load.
    ///
    /// `lookup` must be the result of [`SetAssocTable::lookup`] for the
    /// same load, made before the value was known.
    pub fn train(&mut self, pc: u64, value: u64, width: AccessWidth,
        lookup: &Lookup<E>)
    {
        let tag = self.geometry.tag(pc);
        match lookup {
            Lookup::Hit { set, way, .. } => {
                let idx = self.geometry.base(*set) + way;
                self.data[idx].update(tag, value, width);
            },
            Lookup::Miss { set } => {
                let way = self.rr.victim(*set);
                let idx = self.geometry.base(*set) + way;
                self.data[idx].init(tag, value, width);
            },
        }
    }
}
