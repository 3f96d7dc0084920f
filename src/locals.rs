//! Slot tables backing stable parameter and local-variable handles.
//!
//! A [`SlotList`] is a dense list of value kinds (the parameters of a type,
//! or the locals of a function) plus a parallel table of handle slots. A
//! handle names a slot, not a position: when the list is spliced, surviving
//! slots are re-pointed at their new positions and removed slots are
//! tombstoned, so handles held by callers keep resolving correctly or fail
//! loudly once their entry is gone.

use crate::error::{IndexError, IndexSpace, ReferenceError};
use crate::types::ValType;

#[derive(Debug, Clone)]
struct Slot {
    /// Current position in the list, or `None` once the entry was removed.
    index: Option<u32>,
    kind: ValType,
}

#[derive(Debug, Clone)]
pub(crate) struct SlotList {
    space: IndexSpace,
    kinds: Vec<ValType>,
    /// Slot id per position, created lazily on first handle request.
    handles: Vec<Option<u32>>,
    slots: Vec<Slot>,
}

impl SlotList {
    pub fn new(space: IndexSpace, kinds: Vec<ValType>) -> SlotList {
        let handles = vec![None; kinds.len()];
        SlotList {
            space,
            kinds,
            handles,
            slots: Vec::new(),
        }
    }

    pub fn kinds(&self) -> &[ValType] {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Appends an entry and returns its slot id.
    pub fn push(&mut self, kind: ValType) -> u32 {
        let slot = self.slots.len() as u32;
        self.slots.push(Slot {
            index: Some(self.kinds.len() as u32),
            kind,
        });
        self.kinds.push(kind);
        self.handles.push(Some(slot));
        slot
    }

    /// Returns the slot id and kind at `index`, creating the slot on first
    /// request.
    pub fn handle_at(&mut self, index: usize) -> Result<(u32, ValType), IndexError> {
        if index >= self.kinds.len() {
            return Err(IndexError::OutOfRange {
                space: self.space,
                index: index as u32,
            });
        }
        let kind = self.kinds[index];
        if let Some(slot) = self.handles[index] {
            return Ok((slot, kind));
        }
        let slot = self.slots.len() as u32;
        self.slots.push(Slot {
            index: Some(index as u32),
            kind,
        });
        self.handles[index] = Some(slot);
        Ok((slot, kind))
    }

    /// Resolves a slot id to its current position.
    pub fn resolve(&self, slot: u32) -> Result<u32, ReferenceError> {
        let slot = self
            .slots
            .get(slot as usize)
            .ok_or(ReferenceError::ForeignOwner { space: self.space })?;
        slot.index.ok_or(ReferenceError::Removed { space: self.space })
    }

    /// Removes `delete_count` entries at `start`, inserts `insert`, and
    /// returns the removed kinds. Handles of removed entries are tombstoned;
    /// handles past the splice point keep tracking their entries.
    pub fn splice(
        &mut self,
        start: usize,
        delete_count: usize,
        insert: &[ValType],
    ) -> Result<Vec<ValType>, IndexError> {
        if start > self.kinds.len() || start + delete_count > self.kinds.len() {
            return Err(IndexError::OutOfRange {
                space: self.space,
                index: start as u32,
            });
        }
        for handle in &self.handles[start..start + delete_count] {
            if let Some(slot) = *handle {
                self.slots[slot as usize].index = None;
            }
        }
        let removed: Vec<ValType> = self
            .kinds
            .splice(start..start + delete_count, insert.iter().copied())
            .collect();
        self.handles
            .splice(start..start + delete_count, insert.iter().map(|_| None));
        for (i, handle) in self.handles.iter().enumerate().skip(start + insert.len()) {
            if let Some(slot) = *handle {
                self.slots[slot as usize].index = Some(i as u32);
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(kinds: &[ValType]) -> SlotList {
        SlotList::new(IndexSpace::Param, kinds.to_vec())
    }

    #[test]
    fn push_resolves_to_tail() {
        let mut l = list(&[ValType::I32]);
        let slot = l.push(ValType::F64);
        assert_eq!(l.resolve(slot), Ok(1));
        assert_eq!(l.kinds(), &[ValType::I32, ValType::F64]);
    }

    #[test]
    fn handle_survives_removal_before_it() {
        let mut l = list(&[ValType::I32, ValType::I64, ValType::F32]);
        let (b, kind) = l.handle_at(1).unwrap();
        assert_eq!(kind, ValType::I64);
        assert_eq!(l.resolve(b), Ok(1));

        let removed = l.splice(0, 1, &[]).unwrap();
        assert_eq!(removed, vec![ValType::I32]);
        assert_eq!(l.resolve(b), Ok(0));
    }

    #[test]
    fn handle_tombstoned_on_removal() {
        let mut l = list(&[ValType::I32, ValType::I64]);
        let (b, _) = l.handle_at(1).unwrap();
        l.splice(1, 1, &[]).unwrap();
        assert_eq!(
            l.resolve(b),
            Err(ReferenceError::Removed {
                space: IndexSpace::Param
            })
        );
    }

    #[test]
    fn insertion_shifts_later_handles() {
        let mut l = list(&[ValType::I32, ValType::I64]);
        let (b, _) = l.handle_at(1).unwrap();
        l.splice(0, 0, &[ValType::F32, ValType::F64]).unwrap();
        assert_eq!(l.resolve(b), Ok(3));
        assert_eq!(
            l.kinds(),
            &[ValType::F32, ValType::F64, ValType::I32, ValType::I64]
        );
    }

    #[test]
    fn replacement_tombstones_only_deleted() {
        let mut l = list(&[ValType::I32, ValType::I64, ValType::F32]);
        let (a, _) = l.handle_at(0).unwrap();
        let (b, _) = l.handle_at(1).unwrap();
        let (c, _) = l.handle_at(2).unwrap();
        let removed = l.splice(1, 1, &[ValType::V128, ValType::FuncRef]).unwrap();
        assert_eq!(removed, vec![ValType::I64]);
        assert_eq!(l.resolve(a), Ok(0));
        assert!(l.resolve(b).is_err());
        assert_eq!(l.resolve(c), Ok(3));
    }

    #[test]
    fn splice_bounds_checked() {
        let mut l = list(&[ValType::I32]);
        assert!(l.splice(0, 2, &[]).is_err());
        assert!(l.splice(2, 0, &[]).is_err());
    }

    #[test]
    fn handle_at_out_of_range() {
        let mut l = list(&[ValType::I32]);
        assert_eq!(
            l.handle_at(1),
            Err(IndexError::OutOfRange {
                space: IndexSpace::Param,
                index: 1
            })
        );
    }
}
