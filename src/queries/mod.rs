//! Derived, read-only views over a record collection: filtering, sorting
//! and partitioning into board columns.

pub mod filter;
pub mod sort;

use serde::Serialize;

use crate::entity::PipelineRecord;
use crate::stage::PipelineStage;

pub use filter::{apply_filters, FilterCriteria, RatingBucket, RawCriteria, ReviewCountBucket};
pub use sort::{sort_by, SortDirection, SortValue};

/// Filter first, then sort, matching the order the board displays.
pub fn filter_and_sort<'a, R, I>(
    records: I,
    criteria: &FilterCriteria<R::Stage>,
    sort: Option<(R::SortKey, SortDirection)>,
) -> Vec<&'a R>
where
    R: PipelineRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let view = apply_filters(records, criteria);
    match sort {
        Some((key, direction)) => sort_by(view, key, direction),
        None => view,
    }
}

/// One board column: a stage and the ids of the cards in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn<S> {
    pub stage: S,
    pub label: &'static str,
    pub ids: Vec<String>,
}

/// Partition a view into one column per stage, in pipeline order.
///
/// Empty stages still get a column so the board layout is stable.
pub fn partition_by_stage<R: PipelineRecord>(view: &[&R]) -> Vec<BoardColumn<R::Stage>> {
    let mut columns: Vec<BoardColumn<R::Stage>> = R::Stage::ALL
        .iter()
        .map(|stage| BoardColumn {
            stage: *stage,
            label: stage.label(),
            ids: Vec::new(),
        })
        .collect();

    for record in view {
        let ordinal = record.stage().ordinal();
        if let Some(column) = columns.get_mut(ordinal) {
            column.ids.push(record.id().to_string());
        }
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patients::{NewPatient, Patient, PatientSortKey};
    use crate::stage::PatientStage;

    fn patient(name: &str, value: u32) -> Patient {
        Patient::create(NewPatient {
            name: name.to_string(),
            city: "Torino".to_string(),
            session_value: value,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_partition_keeps_empty_columns() {
        let mut records = vec![patient("a", 1), patient("b", 2), patient("c", 3)];
        records[1].track.transition(PatientStage::Paid);

        let view: Vec<&Patient> = records.iter().collect();
        let columns = partition_by_stage(&view);

        assert_eq!(columns.len(), PatientStage::ALL.len());
        assert_eq!(columns[0].ids, vec![records[0].id.clone(), records[2].id.clone()]);
        assert!(columns[1].ids.is_empty());
        assert_eq!(columns[5].stage, PatientStage::Paid);
        assert_eq!(columns[5].ids, vec![records[1].id.clone()]);
    }

    #[test]
    fn test_filter_then_sort() {
        let records = vec![patient("Zoe", 80), patient("Ada", 40), patient("Max", 120)];
        let criteria = FilterCriteria::default().search("a");
        let view = filter_and_sort(
            &records,
            &criteria,
            Some((PatientSortKey::SessionValue, SortDirection::Desc)),
        );
        let names: Vec<&str> = view.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Max", "Ada"]);
    }
}
