//! Slot table collecting upload part results.

use std::sync::OnceLock;

use crate::model::CompletedPart;

/// One write-once slot per part, indexed by `part_number - 1`.
///
/// Part operations finish in any order and each writes only its own slot,
/// so no lock is needed beyond the cell's own synchronization. The table
/// is read once, after every writer has finished.
#[derive(Debug)]
pub struct PartResultTable {
    slots: Vec<OnceLock<CompletedPart>>,
}

impl PartResultTable {
    /// Create a table for `part_count` parts.
    pub fn new(part_count: usize) -> Self {
        let mut slots: Vec<OnceLock<CompletedPart>> = Vec::with_capacity(part_count);
        slots.resize_with(part_count, OnceLock::new);
        Self { slots }
    }

    /// Record the integrity token for a part.
    ///
    /// # Returns
    /// `false` if the part number is out of range or the slot was already set.
    pub fn record(&self, part_number: u32, e_tag: String) -> bool {
        let Some(slot) = (part_number as usize)
            .checked_sub(1)
            .and_then(|index| self.slots.get(index))
        else {
            return false;
        };
        slot.set(CompletedPart { part_number, e_tag }).is_ok()
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Completed parts ordered by part number.
    ///
    /// # Returns
    /// `None` if any slot is still empty.
    pub fn ordered_parts(&self) -> Option<Vec<CompletedPart>> {
        self.slots.iter().map(|slot| slot.get().cloned()).collect()
    }
}
