//! The pipeline board: one entity collection plus its selection state.
//!
//! The board is the only writer of its store. Every successful mutation
//! (insert, remove, stage move, note, reassign, bulk action, time advance)
//! recomputes the cached summary from the full collection before returning,
//! so readers never observe a summary that lags the records.

use crate::entity::PipelineRecord;
use crate::error::BoardError;
use crate::metrics::{summarize, PipelineSummary};
use crate::queries::{filter_and_sort, partition_by_stage, BoardColumn, FilterCriteria, SortDirection};
use crate::selection::{BulkAction, BulkReport, BulkSink, Selection};
use crate::stage::{MoveOutcome, PipelineStage};
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct Board<R: PipelineRecord> {
    store: Store<R>,
    selection: Selection,
    summary: PipelineSummary<R::Stage>,
    stall_after_days: u32,
    revision: u64,
}

impl<R: PipelineRecord> Board<R> {
    pub fn new(store: Store<R>, stall_after_days: u32) -> Self {
        let summary = summarize(store.records(), stall_after_days);
        Self {
            store,
            selection: Selection::new(),
            summary,
            stall_after_days,
            revision: 0,
        }
    }

    pub fn store(&self) -> &Store<R> {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn summary(&self) -> &PipelineSummary<R::Stage> {
        &self.summary
    }

    /// Incremented once per successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn recompute(&mut self) {
        self.summary = summarize(self.store.records(), self.stall_after_days);
        self.revision += 1;
    }

    // -----------------------------------------------------------------------
    // Collection mutations
    // -----------------------------------------------------------------------

    pub fn insert(&mut self, record: R) -> Result<(), BoardError> {
        self.store.insert(record)?;
        self.recompute();
        Ok(())
    }

    /// Remove a record; it also leaves the selection.
    pub fn remove(&mut self, id: &str) -> Option<R> {
        let Some(removed) = self.store.remove(id) else {
            log::debug!("remove: no {} with id {}", R::KIND.as_str(), id);
            return None;
        };
        self.selection.prune(&self.store);
        self.recompute();
        Some(removed)
    }

    /// Drop a card on a column. See [`Store::move_entity`].
    pub fn move_entity(&mut self, id: &str, target: R::Stage) -> MoveOutcome<R::Stage> {
        let outcome = self.store.move_entity(id, target);
        if outcome.is_moved() {
            self.recompute();
        }
        outcome
    }

    /// Move by stage wire name. An unrecognized name is a no-op.
    pub fn move_entity_by_name(&mut self, id: &str, stage: &str) -> MoveOutcome<R::Stage> {
        match R::Stage::parse(stage) {
            Some(target) => self.move_entity(id, target),
            None => {
                log::debug!("move_entity_by_name: unknown stage '{}' for {}", stage, id);
                MoveOutcome::UnknownStage
            }
        }
    }

    /// Append to a record's notes. Returns false if the id is unknown.
    pub fn add_note(&mut self, id: &str, text: &str) -> bool {
        let Some(record) = self.store.get_mut(id) else {
            log::debug!("add_note: no {} with id {}", R::KIND.as_str(), id);
            return false;
        };
        record.add_note(text);
        self.recompute();
        true
    }

    /// Reassign the owning agent. Returns false if the id is unknown or the
    /// kind has no owner.
    pub fn reassign(&mut self, id: &str, owner: &str) -> bool {
        let Some(record) = self.store.get_mut(id) else {
            log::debug!("reassign: no {} with id {}", R::KIND.as_str(), id);
            return false;
        };
        if !record.set_owner(owner) {
            return false;
        }
        self.recompute();
        true
    }

    /// Apply the external clock to every record's day counter.
    pub fn advance_days(&mut self, days: u32) {
        if days == 0 {
            return;
        }
        self.store.advance_days(days);
        self.recompute();
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn view(
        &self,
        criteria: &FilterCriteria<R::Stage>,
        sort: Option<(R::SortKey, SortDirection)>,
    ) -> Vec<&R> {
        filter_and_sort(&self.store, criteria, sort)
    }

    /// Board columns for the filtered view, one per stage.
    pub fn columns(&self, criteria: &FilterCriteria<R::Stage>) -> Vec<BoardColumn<R::Stage>> {
        partition_by_stage(&self.view(criteria, None))
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Toggle one id. Ids not in the store are ignored. Returns whether the
    /// id is selected afterwards.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if !self.store.contains(id) {
            log::debug!("toggle_selection: no {} with id {}", R::KIND.as_str(), id);
            return false;
        }
        self.selection.toggle(id);
        self.selection.contains(id)
    }

    /// Select exactly what the filter currently shows. Returns the count.
    pub fn select_all_visible(&mut self, criteria: &FilterCriteria<R::Stage>) -> usize {
        let visible: Vec<String> = self
            .view(criteria, None)
            .iter()
            .map(|r| r.id().to_string())
            .collect();
        self.selection.select_all(visible.iter().map(String::as_str));
        self.selection.len()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Run a bulk action against the selected records.
    ///
    /// Only selected ids still present in the store are touched; the rest
    /// are reported as missing. The selection is pruned afterwards.
    pub fn apply_bulk_action(
        &mut self,
        action: BulkAction<R::Stage>,
        sink: &mut dyn BulkSink,
    ) -> BulkReport {
        let mut report = BulkReport::new(action.kind());
        let selected: Vec<String> = self.selection.iter().map(str::to_string).collect();
        let mut present = Vec::with_capacity(selected.len());
        for id in selected {
            if self.store.contains(&id) {
                present.push(id);
            } else {
                report.missing.push(id);
            }
        }

        let mut mutated = false;
        match &action {
            BulkAction::Reassign { owner } => {
                for id in present {
                    let changed = self
                        .store
                        .get_mut(&id)
                        .map(|record| record.set_owner(owner))
                        .unwrap_or(false);
                    if changed {
                        mutated = true;
                        report.applied.push(id);
                    } else {
                        report.skipped.push(id);
                    }
                }
            }
            BulkAction::ChangeStage { stage } => {
                for id in present {
                    if self.store.move_entity(&id, *stage).is_moved() {
                        mutated = true;
                        report.applied.push(id);
                    } else {
                        report.skipped.push(id);
                    }
                }
            }
            BulkAction::BulkEmail { subject } => {
                let rows: Vec<_> = present
                    .iter()
                    .filter_map(|id| self.store.get(id))
                    .map(|record| record.export_row())
                    .collect();
                sink.send_email(R::KIND, subject, &rows);
                report.applied = present;
            }
            BulkAction::Export => {
                let rows: Vec<_> = present
                    .iter()
                    .filter_map(|id| self.store.get(id))
                    .map(|record| record.export_row())
                    .collect();
                sink.export(R::KIND, &rows);
                report.applied = present;
            }
        }

        log::info!(
            "Bulk {} on {}: {} applied, {} skipped, {} missing",
            report.action,
            R::KIND.as_str(),
            report.applied.len(),
            report.skipped.len(),
            report.missing.len()
        );

        self.selection.prune(&self.store);
        if mutated {
            self.recompute();
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityKind, ExportRow};
    use crate::prospects::{NewProspect, Prospect, ProspectSortKey};
    use crate::queries::RatingBucket;
    use crate::setters::{NewSetter, Setter};
    use crate::stage::ProspectStage;

    #[derive(Default)]
    struct RecordingSink {
        emails: Vec<(String, Vec<String>)>,
        exports: Vec<Vec<ExportRow>>,
    }

    impl BulkSink for RecordingSink {
        fn send_email(&mut self, _kind: EntityKind, subject: &str, recipients: &[ExportRow]) {
            self.emails.push((
                subject.to_string(),
                recipients.iter().map(|r| r.id.clone()).collect(),
            ));
        }

        fn export(&mut self, _kind: EntityKind, rows: &[ExportRow]) {
            self.exports.push(rows.to_vec());
        }
    }

    fn prospect(name: &str, city: &str, rating: f64) -> Prospect {
        Prospect::create(NewProspect {
            name: name.to_string(),
            city: city.to_string(),
            rating,
            assigned_setter: "Giulia Rossi".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    fn board_of(records: Vec<Prospect>) -> Board<Prospect> {
        Board::new(Store::from_records(records).unwrap(), 14)
    }

    fn ids(board: &Board<Prospect>) -> Vec<String> {
        board.store().ids().map(str::to_string).collect()
    }

    #[test]
    fn test_move_recomputes_counts() {
        let mut board = board_of(vec![
            prospect("One", "Milano", 4.0),
            prospect("Two", "Milano", 4.0),
            prospect("Three", "Milano", 4.0),
        ]);
        let second = ids(&board)[1].clone();

        let outcome = board.move_entity(&second, ProspectStage::Contacted);
        assert!(outcome.is_moved());

        let counts = &board.summary().stage_counts;
        assert_eq!(counts.get(ProspectStage::NewLeads), 2);
        assert_eq!(counts.get(ProspectStage::Contacted), 1);
        assert_eq!(counts.get(ProspectStage::AppointmentSet), 0);
        assert_eq!(board.revision(), 1);
    }

    #[test]
    fn test_noop_moves_do_not_bump_revision() {
        let mut board = board_of(vec![prospect("One", "Milano", 4.0)]);
        let id = ids(&board)[0].clone();

        assert_eq!(
            board.move_entity("prs-missing", ProspectStage::Show),
            MoveOutcome::NotFound
        );
        assert_eq!(
            board.move_entity(&id, ProspectStage::NewLeads),
            MoveOutcome::Unchanged
        );
        assert_eq!(
            board.move_entity_by_name(&id, "archived"),
            MoveOutcome::UnknownStage
        );
        assert_eq!(board.revision(), 0);
    }

    #[test]
    fn test_move_by_name() {
        let mut board = board_of(vec![prospect("One", "Milano", 4.0)]);
        let id = ids(&board)[0].clone();
        assert!(board.move_entity_by_name(&id, "appointment-set").is_moved());
        assert_eq!(
            board.store().get(&id).unwrap().stage(),
            ProspectStage::AppointmentSet
        );
    }

    #[test]
    fn test_select_all_is_filter_scoped() {
        let records: Vec<Prospect> = (0..50)
            .map(|i| {
                let city = if i % 10 == 0 { "Milano" } else { "Roma" };
                prospect(&format!("P{}", i), city, 4.5)
            })
            .collect();
        let mut board = board_of(records);

        let criteria = FilterCriteria::default().city("Milano");
        assert_eq!(board.select_all_visible(&criteria), 5);

        let visible: Vec<String> = board
            .view(&criteria, None)
            .iter()
            .map(|p| p.id.clone())
            .collect();
        let selected: Vec<String> = board.selection().iter().map(str::to_string).collect();
        let mut expected = visible.clone();
        expected.sort();
        assert_eq!(selected, expected);
    }

    #[test]
    fn test_city_and_rating_view_sorted() {
        let board = board_of(vec![
            prospect("Gallo", "Milano", 4.1),
            prospect("Verdi", "Roma", 4.9),
            prospect("Bianchi", "Milano", 4.8),
            prospect("Neri", "Milano", 3.9),
        ]);
        let criteria = FilterCriteria::default()
            .city("Milano")
            .rating(RatingBucket::FourPlus);
        let view = board.view(
            &criteria,
            Some((ProspectSortKey::Rating, SortDirection::Desc)),
        );
        let names: Vec<&str> = view.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bianchi", "Gallo"]);
    }

    #[test]
    fn test_columns_follow_filter() {
        let mut board = board_of(vec![
            prospect("A", "Milano", 4.0),
            prospect("B", "Roma", 4.0),
        ]);
        let a = ids(&board)[0].clone();
        board.move_entity(&a, ProspectStage::Show);

        let columns = board.columns(&FilterCriteria::default().city("Milano"));
        assert_eq!(columns.len(), 5);
        assert_eq!(columns[3].ids, vec![a]);
        assert!(columns[0].ids.is_empty());
    }

    #[test]
    fn test_remove_prunes_selection() {
        let mut board = board_of(vec![
            prospect("A", "Milano", 4.0),
            prospect("B", "Milano", 4.0),
        ]);
        let all = ids(&board);
        board.toggle_selection(&all[0]);
        board.toggle_selection(&all[1]);

        assert!(board.remove(&all[0]).is_some());
        assert_eq!(board.selection().len(), 1);
        assert!(!board.selection().contains(&all[0]));
        assert_eq!(board.summary().total, 1);
    }

    #[test]
    fn test_toggle_unknown_id_is_ignored() {
        let mut board = board_of(vec![prospect("A", "Milano", 4.0)]);
        assert!(!board.toggle_selection("prs-missing"));
        assert!(board.selection().is_empty());
    }

    #[test]
    fn test_bulk_change_stage() {
        let mut board = board_of(vec![
            prospect("A", "Milano", 4.0),
            prospect("B", "Milano", 4.0),
            prospect("C", "Milano", 4.0),
        ]);
        let all = ids(&board);
        board.move_entity(&all[1], ProspectStage::Show);
        board.toggle_selection(&all[0]);
        board.toggle_selection(&all[1]);

        let mut sink = RecordingSink::default();
        let report = board.apply_bulk_action(
            BulkAction::ChangeStage {
                stage: ProspectStage::Show,
            },
            &mut sink,
        );

        assert_eq!(report.action, "change-stage");
        assert_eq!(report.applied, vec![all[0].clone()]);
        assert_eq!(report.skipped, vec![all[1].clone()]);
        assert_eq!(board.summary().stage_counts.get(ProspectStage::Show), 2);
        assert_eq!(board.store().get(&all[2]).unwrap().stage(), ProspectStage::NewLeads);
    }

    #[test]
    fn test_bulk_action_reports_and_prunes_vanished_ids() {
        let mut board = board_of(vec![
            prospect("A", "Milano", 4.0),
            prospect("B", "Milano", 4.0),
        ]);
        let all = ids(&board);
        board.toggle_selection(&all[0]);
        board.selection.toggle("prs-gone");
        assert_eq!(board.selection().len(), 2);

        let report = board.apply_bulk_action(
            BulkAction::ChangeStage {
                stage: ProspectStage::Contacted,
            },
            &mut RecordingSink::default(),
        );

        assert_eq!(report.missing, vec!["prs-gone".to_string()]);
        assert_eq!(report.applied, vec![all[0].clone()]);
        assert!(report.skipped.is_empty());
        assert!(!board.selection().contains("prs-gone"));
        assert!(board.selection().contains(&all[0]));
        assert_eq!(board.selection().len(), 1);
        assert_eq!(board.summary().stage_counts.get(ProspectStage::Contacted), 1);
    }

    #[test]
    fn test_bulk_export_skips_vanished_ids() {
        let mut board = board_of(vec![prospect("A", "Milano", 4.0)]);
        let all = ids(&board);
        board.toggle_selection(&all[0]);
        board.selection.toggle("prs-gone");

        let mut sink = RecordingSink::default();
        let report = board.apply_bulk_action(BulkAction::Export, &mut sink);

        assert_eq!(report.missing, vec!["prs-gone".to_string()]);
        assert_eq!(report.applied, all);
        assert_eq!(sink.exports[0].len(), 1);
        assert_eq!(sink.exports[0][0].id, all[0]);
        assert!(board.selection().iter().all(|id| id != "prs-gone"));
    }

    #[test]
    fn test_bulk_reassign_only_touches_selected() {
        let mut board = board_of(vec![
            prospect("A", "Milano", 4.0),
            prospect("B", "Milano", 4.0),
        ]);
        let all = ids(&board);
        board.toggle_selection(&all[1]);

        let report = board.apply_bulk_action(
            BulkAction::Reassign {
                owner: "Luca Ferri".to_string(),
            },
            &mut RecordingSink::default(),
        );

        assert_eq!(report.applied, vec![all[1].clone()]);
        assert_eq!(board.store().get(&all[0]).unwrap().assigned_setter, "Giulia Rossi");
        assert_eq!(board.store().get(&all[1]).unwrap().assigned_setter, "Luca Ferri");
    }

    #[test]
    fn test_bulk_reassign_skips_kinds_without_owner() {
        let setter = Setter::create(NewSetter {
            name: "Giulia Rossi".to_string(),
            ..Default::default()
        })
        .unwrap();
        let id = setter.id.clone();
        let mut board = Board::new(Store::from_records(vec![setter]).unwrap(), 14);
        board.toggle_selection(&id);

        let report = board.apply_bulk_action(
            BulkAction::Reassign {
                owner: "Nobody".to_string(),
            },
            &mut RecordingSink::default(),
        );
        assert!(report.applied.is_empty());
        assert_eq!(report.skipped, vec![id]);
        assert_eq!(board.revision(), 0);
    }

    #[test]
    fn test_bulk_email_and_export_reach_sink() {
        let mut board = board_of(vec![
            prospect("A", "Milano", 4.0),
            prospect("B", "Milano", 4.0),
        ]);
        let all = ids(&board);
        board.select_all_visible(&FilterCriteria::default());

        let mut sink = RecordingSink::default();
        let email = board.apply_bulk_action(
            BulkAction::BulkEmail {
                subject: "Nuovi pazienti".to_string(),
            },
            &mut sink,
        );
        let export = board.apply_bulk_action(BulkAction::Export, &mut sink);

        assert_eq!(email.applied.len(), 2);
        assert_eq!(sink.emails.len(), 1);
        assert_eq!(sink.emails[0].0, "Nuovi pazienti");
        assert_eq!(export.applied.len(), 2);
        assert_eq!(sink.exports[0].len(), 2);
        assert!(sink.exports[0].iter().all(|row| all.contains(&row.id)));
        assert_eq!(sink.exports[0][0].stage, "new-leads");
        assert_eq!(board.selection().len(), 2);
    }

    #[test]
    fn test_notes_reassign_and_clock() {
        let mut board = board_of(vec![prospect("A", "Milano", 4.0)]);
        let id = ids(&board)[0].clone();

        assert!(board.add_note(&id, "First call"));
        assert!(!board.add_note("prs-missing", "lost"));
        assert!(board.reassign(&id, "Luca Ferri"));
        assert!(!board.reassign("prs-missing", "Luca Ferri"));

        board.advance_days(20);
        let record = board.store().get(&id).unwrap();
        assert_eq!(record.notes().len(), 1);
        assert_eq!(record.days_in_stage(), 20);
        assert_eq!(board.summary().stalled, 1);

        board.move_entity(&id, ProspectStage::Contacted);
        assert_eq!(board.summary().stalled, 0);
    }
}
