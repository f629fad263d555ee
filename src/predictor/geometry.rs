//! Set/tag decomposition for set-associative predictor tables.

use crate::error::ConfigError;

/// Configuration for building a [`Geometry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableConfig {
    /// Total number of entries
    pub entries: usize,

    /// Number of ways in each set
    pub assoc: usize,

    /// Number of low program counter bits ignored when forming an index
    pub idx_shift: u32,
}
impl Default for TableConfig {
    fn default() -> Self {
        Self { entries: 1024, assoc: 4, idx_shift: 2 }
    }
}
impl TableConfig {
    /// Validate this configuration and derive the table [`Geometry`].
    pub fn build(self) -> Result<Geometry, ConfigError> {
        if self.entries == 0 {
            return Err(ConfigError::ZeroEntries);
        }
        if self.assoc == 0 {
            return Err(ConfigError::ZeroAssoc);
        }
        if self.entries % self.assoc != 0 {
            return Err(ConfigError::AssocDoesNotDivide {
                entries: self.entries,
                assoc: self.assoc,
            });
        }

        let sets = self.entries / self.assoc;
        let power_of_two = sets.is_power_of_two();

        // NOTE: When the number of sets isn't a power of two, the tag keeps
        // the index bits. Tags are weaker and aliasing is more likely.
        let (set_mask, tag_shift) = if power_of_two {
            (sets as u64 - 1, self.idx_shift + sets.ilog2())
        } else {
            (0, self.idx_shift)
        };

        Ok(Geometry {
            entries: self.entries,
            assoc: self.assoc,
            sets,
            idx_shift: self.idx_shift,
            tag_shift,
            power_of_two,
            set_mask,
        })
    }
}

/// The shape of a set-associative table, and the strategy used to split a
/// program counter value into a set index and a tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub entries: usize,
    pub assoc: usize,
    pub sets: usize,
    pub idx_shift: u32,
    pub tag_shift: u32,
    pub power_of_two: bool,

    /// Only meaningful when `power_of_two` is set
    pub set_mask: u64,
}
impl Geometry {
    /// Return the set index for some program counter value.
    pub fn set_index(&self, pc: u64) -> usize {
        let shifted = pc.checked_shr(self.idx_shift).unwrap_or(0);
        if self.power_of_two {
            (shifted & self.set_mask) as usize
        } else if self.sets == 0 {
            0
        } else {
            (shifted % self.sets as u64) as usize
        }
    }

    /// Return the tag for some program counter value.
    pub fn tag(&self, pc: u64) -> u64 {
        pc.checked_shr(self.tag_shift).unwrap_or(0)
    }

    /// Split a program counter value into a `(set, tag)` pair.
    pub fn decode(&self, pc: u64) -> (usize, u64) {
        (self.set_index(pc), self.tag(pc))
    }

    /// Index of the first slot belonging to some set.
    pub fn base(&self, set: usize) -> usize {
        set * self.assoc
    }
}
