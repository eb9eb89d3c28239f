use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};

/// Row label + 1-based column number, e.g. "C7". Addresses one physical seat
/// within one hall. Derived value, never stored as an entity of its own.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatLabel(String);

impl SeatLabel {
    pub fn new(row: &str, col: i32) -> Self {
        SeatLabel(format!("{row}{col}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for SeatLabel {
    fn from(s: String) -> Self {
        SeatLabel(s)
    }
}

impl From<&str> for SeatLabel {
    fn from(s: &str) -> Self {
        SeatLabel(s.to_string())
    }
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row descriptor of a hall layout: label, seat count, seat-type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSpec {
    pub row: String,
    pub cols: i32,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Compact hall description, stored as JSONB on the hall row.
/// Immutable once an administrator creates the hall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallLayout {
    pub seats: Vec<RowSpec>,
}

/// One expanded seat with its addressable label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub label: SeatLabel,
    pub row: String,
    pub col: i32,
    pub kind: String,
}

impl HallLayout {
    /// Checks every row descriptor: positive seat count, non-empty row label
    /// and type tag, and no two descriptors producing the same seat label.
    /// Duplicate labels arise from repeated row labels and from prefix
    /// collisions ("A" column 12 and "A1" column 2 both read "A12"); either
    /// would collapse two physical seats into one reservable unit. Called by
    /// `expand` and by the admin create endpoint so a bad layout never
    /// reaches the store.
    pub fn validate(&self) -> Result<()> {
        let mut labels = HashSet::with_capacity(self.seat_count());
        for spec in &self.seats {
            if spec.row.trim().is_empty() {
                return Err(Error::MalformedLayout("empty row label".into()));
            }
            if spec.cols < 1 {
                return Err(Error::MalformedLayout(format!(
                    "row {:?}: seat count must be positive (got {})",
                    spec.row, spec.cols
                )));
            }
            if spec.kind.trim().is_empty() {
                return Err(Error::MalformedLayout(format!(
                    "row {:?}: missing seat type",
                    spec.row
                )));
            }
            for col in 1..=spec.cols {
                let label = SeatLabel::new(&spec.row, col);
                if !labels.insert(label.clone()) {
                    return Err(Error::MalformedLayout(format!(
                        "duplicate seat identifier {label}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Expands the layout into every addressable seat, row by row in
    /// declaration order, columns 1..=cols. The iterator is lazy, cloneable
    /// and restartable; the layout is validated up front.
    pub fn expand(&self) -> Result<SeatIter<'_>> {
        self.validate()?;
        Ok(SeatIter {
            rows: self.seats.iter(),
            current: None,
        })
    }

    /// Total number of seats (sum of cols) without expanding.
    pub fn seat_count(&self) -> usize {
        self.seats.iter().map(|s| s.cols.max(0) as usize).sum()
    }
}

/// Lazy seat sequence over a validated layout.
#[derive(Clone)]
pub struct SeatIter<'a> {
    rows: std::slice::Iter<'a, RowSpec>,
    current: Option<(&'a RowSpec, i32)>,
}

impl Iterator for SeatIter<'_> {
    type Item = Seat;

    fn next(&mut self) -> Option<Seat> {
        loop {
            if let Some((spec, col)) = self.current.as_mut() {
                if *col <= spec.cols {
                    let c = *col;
                    *col += 1;
                    return Some(Seat {
                        label: SeatLabel::new(&spec.row, c),
                        row: spec.row.clone(),
                        col: c,
                        kind: spec.kind.clone(),
                    });
                }
                self.current = None;
            }
            let spec = self.rows.next()?;
            self.current = Some((spec, 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn layout(rows: &[(&str, i32, &str)]) -> HallLayout {
        HallLayout {
            seats: rows
                .iter()
                .map(|(row, cols, kind)| RowSpec {
                    row: row.to_string(),
                    cols: *cols,
                    kind: kind.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn expands_rows_in_declaration_order() {
        let hall = layout(&[("A", 2, "standard"), ("B", 2, "standard")]);
        let labels: Vec<String> = hall
            .expand()
            .unwrap()
            .map(|s| s.label.into_string())
            .collect();
        assert_eq!(labels, vec!["A1", "A2", "B1", "B2"]);
    }

    #[test]
    fn carries_row_col_and_type() {
        let hall = layout(&[("C", 3, "premium")]);
        let seats: Vec<Seat> = hall.expand().unwrap().collect();
        assert_eq!(seats.len(), 3);
        assert_eq!(seats[2].label, SeatLabel::new("C", 3));
        assert_eq!(seats[2].row, "C");
        assert_eq!(seats[2].col, 3);
        assert_eq!(seats[2].kind, "premium");
    }

    #[test]
    fn iterator_is_restartable() {
        let hall = layout(&[("A", 2, "standard")]);
        let iter = hall.expand().unwrap();
        let first: Vec<Seat> = iter.clone().collect();
        let second: Vec<Seat> = iter.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_non_positive_seat_count() {
        let hall = layout(&[("A", 0, "standard")]);
        assert!(matches!(hall.expand(), Err(Error::MalformedLayout(_))));

        let hall = layout(&[("A", -3, "standard")]);
        assert!(matches!(hall.validate(), Err(Error::MalformedLayout(_))));
    }

    #[test]
    fn rejects_missing_type_tag() {
        let hall = layout(&[("A", 2, "")]);
        assert!(matches!(hall.expand(), Err(Error::MalformedLayout(_))));
    }

    #[test]
    fn rejects_repeated_row_labels() {
        // Two rows both labeled "A" would expand to A1,A2,A1,A2 — two
        // physical seats per identifier.
        let hall = layout(&[("A", 2, "standard"), ("A", 2, "premium")]);
        assert!(matches!(hall.expand(), Err(Error::MalformedLayout(_))));
    }

    #[test]
    fn rejects_prefix_colliding_row_labels() {
        // "A" column 12 and "A1" column 2 both read "A12".
        let hall = layout(&[("A", 12, "standard"), ("A1", 2, "standard")]);
        assert!(matches!(hall.validate(), Err(Error::MalformedLayout(_))));

        // Short rows that cannot reach the colliding column are fine.
        let hall = layout(&[("A", 9, "standard"), ("A1", 2, "standard")]);
        let labels: HashSet<SeatLabel> =
            hall.expand().unwrap().map(|s| s.label).collect();
        assert_eq!(labels.len(), hall.seat_count());
    }

    #[test]
    fn empty_layout_expands_to_nothing() {
        let hall = layout(&[]);
        assert_eq!(hall.expand().unwrap().count(), 0);
    }

    #[test]
    fn wire_shape_uses_type_field() {
        let json = r#"{"seats":[{"row":"A","cols":2,"type":"standard"}]}"#;
        let hall: HallLayout = serde_json::from_str(json).unwrap();
        assert_eq!(hall.seats[0].kind, "standard");
        assert_eq!(serde_json::to_string(&hall).unwrap(), json);
    }

    proptest! {
        // Every layout expands to exactly sum(cols) seats with unique labels.
        #[test]
        fn expansion_is_complete_and_unique(
            rows in prop::collection::vec(("[A-Z]{1,2}", 1i32..40), 0..12)
        ) {
            // Distinct row labels: repeated labels are rejected by validate,
            // which the dedicated tests above cover.
            let mut seen = HashSet::new();
            let specs: Vec<RowSpec> = rows
                .into_iter()
                .filter(|(row, _)| seen.insert(row.clone()))
                .map(|(row, cols)| RowSpec { row, cols, kind: "standard".into() })
                .collect();
            let expected: usize = specs.iter().map(|s| s.cols as usize).sum();
            let hall = HallLayout { seats: specs };

            let labels: Vec<SeatLabel> =
                hall.expand().unwrap().map(|s| s.label).collect();
            prop_assert_eq!(labels.len(), expected);
            prop_assert_eq!(hall.seat_count(), expected);

            let unique: HashSet<&SeatLabel> = labels.iter().collect();
            prop_assert_eq!(unique.len(), expected);
        }
    }
}
