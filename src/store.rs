//! In-memory record table keyed by id.
//!
//! The store is the working "database" for one entity kind. Records keep
//! insertion order (the order the board and table views display before any
//! sort) and are looked up through an id index. Stage changes go through
//! [`Store::move_entity`] so the day counter is reset exactly when the stage
//! actually changes.

use std::collections::HashMap;

use crate::entity::PipelineRecord;
use crate::error::BoardError;
use crate::stage::MoveOutcome;

#[derive(Debug, Clone)]
pub struct Store<R: PipelineRecord> {
    records: Vec<R>,
    index: HashMap<String, usize>,
}

impl<R: PipelineRecord> Default for Store<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<R: PipelineRecord + PartialEq> PartialEq for Store<R> {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl<R: PipelineRecord> Store<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing records, rejecting duplicate ids.
    pub fn from_records(records: Vec<R>) -> Result<Self, BoardError> {
        let mut store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    pub fn insert(&mut self, record: R) -> Result<(), BoardError> {
        if self.index.contains_key(record.id()) {
            return Err(BoardError::DuplicateId(record.id().to_string()));
        }
        self.index.insert(record.id().to_string(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Remove a record, keeping the order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<R> {
        let position = self.index.remove(id)?;
        let removed = self.records.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut R> {
        match self.index.get(id) {
            Some(&i) => self.records.get_mut(i),
            None => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.id())
    }

    /// Set the record's stage to `target` and zero its day counter.
    ///
    /// Any stage may follow any other. Unknown ids and same-stage moves are
    /// no-ops and leave the record untouched.
    pub fn move_entity(&mut self, id: &str, target: R::Stage) -> MoveOutcome<R::Stage> {
        let Some(record) = self.get_mut(id) else {
            log::debug!("move_entity: no {} with id {}", R::KIND.as_str(), id);
            return MoveOutcome::NotFound;
        };
        match record.track_mut().transition(target) {
            Some(from) => MoveOutcome::Moved { from, to: target },
            None => MoveOutcome::Unchanged,
        }
    }

    /// Snapshot form of [`Store::move_entity`]: returns a moved copy and
    /// leaves `self` as it was.
    pub fn moved(&self, id: &str, target: R::Stage) -> Self {
        let mut next = self.clone();
        next.move_entity(id, target);
        next
    }

    /// Advance every record's day counter. This is the external clock; the
    /// board never advances it on its own.
    pub fn advance_days(&mut self, days: u32) {
        for record in &mut self.records {
            record.track_mut().advance(days);
        }
    }
}

impl<'a, R: PipelineRecord> IntoIterator for &'a Store<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
