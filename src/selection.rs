//! Bulk selection state and the bulk-action boundary.
//!
//! The selection is a plain id set. Select-all is filter-scoped: it takes
//! the ids currently visible, not every id in the store. Side effects of
//! bulk email and export leave the crate through [`BulkSink`], the seam
//! where a mail sender or file exporter would attach.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::entity::{EntityKind, ExportRow, PipelineRecord};
use crate::store::Store;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Copying form of [`Selection::toggle`].
    pub fn toggled(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.toggle(id);
        next
    }

    /// Replace the selection with exactly the visible ids.
    pub fn select_all<'a, I>(&mut self, visible_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.ids = visible_ids.into_iter().map(str::to_string).collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Drop ids that no longer exist in the store. Returns how many were
    /// dropped.
    pub fn prune<R: PipelineRecord>(&mut self, store: &Store<R>) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| store.contains(id));
        before - self.ids.len()
    }
}

// ---------------------------------------------------------------------------
// Bulk actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum BulkAction<S> {
    /// Move every selected record to a new owning agent.
    Reassign { owner: String },
    /// Email every selected record through the sink.
    BulkEmail { subject: String },
    /// Hand every selected record to the sink as export rows.
    Export,
    /// Move every selected record to one stage.
    ChangeStage { stage: S },
}

impl<S> BulkAction<S> {
    pub fn kind(&self) -> &'static str {
        match self {
            BulkAction::Reassign { .. } => "reassign",
            BulkAction::BulkEmail { .. } => "bulk-email",
            BulkAction::Export => "export",
            BulkAction::ChangeStage { .. } => "change-stage",
        }
    }
}

/// What a bulk action did, per id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReport {
    pub action: &'static str,
    /// Ids the action was applied to.
    pub applied: Vec<String>,
    /// Selected ids no longer present in the store.
    pub missing: Vec<String>,
    /// Ids the action does not apply to (no owner, already in stage).
    pub skipped: Vec<String>,
}

impl BulkReport {
    pub fn new(action: &'static str) -> Self {
        Self {
            action,
            ..Default::default()
        }
    }
}

/// External collaborator receiving bulk side effects. Fire-and-forget: the
/// board neither waits on nor retries a sink.
pub trait BulkSink {
    fn send_email(&mut self, kind: EntityKind, subject: &str, recipients: &[ExportRow]);
    fn export(&mut self, kind: EntityKind, rows: &[ExportRow]);
}

/// Default sink: logs what would have been sent.
#[derive(Debug, Default)]
pub struct LoggingSink;

impl BulkSink for LoggingSink {
    fn send_email(&mut self, kind: EntityKind, subject: &str, recipients: &[ExportRow]) {
        let with_address = recipients.iter().filter(|r| r.email.is_some()).count();
        log::info!(
            "Bulk email '{}' to {} {} record(s) ({} with an address)",
            subject,
            recipients.len(),
            kind.as_str(),
            with_address
        );
    }

    fn export(&mut self, kind: EntityKind, rows: &[ExportRow]) {
        match serde_json::to_string(rows) {
            Ok(json) => log::info!("Export {} {} row(s): {}", rows.len(), kind.as_str(), json),
            Err(e) => log::warn!("Export of {} rows failed to serialize: {}", kind.as_str(), e),
        }
    }
}
