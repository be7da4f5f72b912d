use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::entity::PipelineRecord;

/// A typed sort key value produced by a record's accessor.
///
/// Text is stored lowercased so comparisons are case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
}

impl SortValue {
    pub fn text(value: &str) -> Self {
        SortValue::Text(value.to_lowercase())
    }

    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Less,
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Greater,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Flip direction, as a column header click does.
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Stable sort of a view by a typed key.
///
/// Records with equal keys keep their relative order in both directions.
pub fn sort_by<'a, R: PipelineRecord>(
    view: Vec<&'a R>,
    key: R::SortKey,
    direction: SortDirection,
) -> Vec<&'a R> {
    let mut keyed: Vec<(SortValue, &'a R)> = view
        .into_iter()
        .map(|record| (record.sort_value(key), record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Asc => a.compare(b),
        SortDirection::Desc => b.compare(a),
    });

    keyed.into_iter().map(|(_, record)| record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prospects::{NewProspect, Prospect, ProspectSortKey};

    fn prospect(name: &str, rating: f64) -> Prospect {
        Prospect::create(NewProspect {
            name: name.to_string(),
            city: "Milano".to_string(),
            rating,
            ..Default::default()
        })
        .unwrap()
    }

    fn names<'a>(view: &[&'a Prospect]) -> Vec<&'a str> {
        view.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_text_sort_is_case_insensitive() {
        let records = vec![prospect("bruno", 4.0), prospect("Anna", 3.0), prospect("carla", 5.0)];
        let sorted = sort_by(records.iter().collect(), ProspectSortKey::Name, SortDirection::Asc);
        assert_eq!(names(&sorted), vec!["Anna", "bruno", "carla"]);
    }

    #[test]
    fn test_numeric_sort_desc() {
        let records = vec![prospect("A", 3.5), prospect("B", 4.9), prospect("C", 2.1)];
        let sorted = sort_by(records.iter().collect(), ProspectSortKey::Rating, SortDirection::Desc);
        assert_eq!(names(&sorted), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_sort_is_stable_both_directions() {
        let records = vec![
            prospect("first", 4.0),
            prospect("second", 4.0),
            prospect("third", 1.0),
        ];

        let asc = sort_by(records.iter().collect(), ProspectSortKey::Rating, SortDirection::Asc);
        assert_eq!(names(&asc), vec!["third", "first", "second"]);

        let desc = sort_by(records.iter().collect(), ProspectSortKey::Rating, SortDirection::Desc);
        assert_eq!(names(&desc), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_numbers_not_compared_as_text() {
        let records = vec![prospect("ten", 10.0), prospect("nine", 9.0)];
        let sorted = sort_by(records.iter().collect(), ProspectSortKey::Rating, SortDirection::Asc);
        assert_eq!(names(&sorted), vec!["nine", "ten"]);
    }

    #[test]
    fn test_direction_toggle() {
        assert_eq!(SortDirection::Asc.toggle(), SortDirection::Desc);
        assert_eq!(SortDirection::Asc.toggle().toggle(), SortDirection::Asc);
    }
}
