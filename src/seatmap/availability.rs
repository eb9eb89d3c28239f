use serde::Serialize;
use std::collections::HashSet;

use crate::error::Result;
use crate::seatmap::layout::{HallLayout, SeatLabel};

/// Exactly one state per seat. A reserved seat is `Booked` for everyone,
/// including the user who reserved it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatState {
    Available,
    Selected,
    Booked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedSeat {
    pub label: SeatLabel,
    pub row: String,
    pub col: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub state: SeatState,
}

/// Merges the expanded layout with the showtime's reserved set and the
/// client's pending selection. Stateless; recomputed on every change to
/// either input.
pub fn project(
    layout: &HallLayout,
    reserved: &HashSet<SeatLabel>,
    pending: &HashSet<SeatLabel>,
) -> Result<Vec<ProjectedSeat>> {
    let mut seats = Vec::with_capacity(layout.seat_count());
    for seat in layout.expand()? {
        let state = if reserved.contains(&seat.label) {
            SeatState::Booked
        } else if pending.contains(&seat.label) {
            SeatState::Selected
        } else {
            SeatState::Available
        };
        seats.push(ProjectedSeat {
            label: seat.label,
            row: seat.row,
            col: seat.col,
            kind: seat.kind,
            state,
        });
    }
    Ok(seats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seatmap::layout::RowSpec;

    fn two_row_hall() -> HallLayout {
        HallLayout {
            seats: vec![
                RowSpec { row: "A".into(), cols: 2, kind: "standard".into() },
                RowSpec { row: "B".into(), cols: 2, kind: "standard".into() },
            ],
        }
    }

    fn labels(v: &[&str]) -> HashSet<SeatLabel> {
        v.iter().map(|s| SeatLabel::from(*s)).collect()
    }

    fn state_of(seats: &[ProjectedSeat], label: &str) -> SeatState {
        seats
            .iter()
            .find(|s| s.label.as_str() == label)
            .expect("seat present")
            .state
    }

    #[test]
    fn every_seat_gets_exactly_one_state() {
        let seats = project(&two_row_hall(), &labels(&["A1"]), &labels(&["B2"])).unwrap();
        assert_eq!(seats.len(), 4);
        assert_eq!(state_of(&seats, "A1"), SeatState::Booked);
        assert_eq!(state_of(&seats, "A2"), SeatState::Available);
        assert_eq!(state_of(&seats, "B1"), SeatState::Available);
        assert_eq!(state_of(&seats, "B2"), SeatState::Selected);
    }

    #[test]
    fn reserved_wins_over_pending() {
        // A seat that got booked out from under a pending selection renders
        // as booked, never selected, even for the selecting client.
        let seats = project(&two_row_hall(), &labels(&["A1"]), &labels(&["A1"])).unwrap();
        assert_eq!(state_of(&seats, "A1"), SeatState::Booked);
    }

    #[test]
    fn booked_set_matches_reserved_set_exactly() {
        let reserved = labels(&["A2", "B1"]);
        let seats = project(&two_row_hall(), &reserved, &HashSet::new()).unwrap();
        let booked: HashSet<SeatLabel> = seats
            .iter()
            .filter(|s| s.state == SeatState::Booked)
            .map(|s| s.label.clone())
            .collect();
        assert_eq!(booked, reserved);
    }

    #[test]
    fn malformed_layout_fails_projection() {
        let hall = HallLayout {
            seats: vec![RowSpec { row: "A".into(), cols: 0, kind: "standard".into() }],
        };
        assert!(project(&hall, &HashSet::new(), &HashSet::new()).is_err());
    }
}
