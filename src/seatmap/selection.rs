use std::collections::{BTreeSet, HashSet};

use crate::seatmap::layout::SeatLabel;

/// A client's pending seat selection for one showtime. Request-scoped value:
/// each client owns its own instance, nothing is shared.
///
/// Submission protocol: hand `seats()` to the reservation transaction, then
/// call `take()` only after it succeeds. On failure the selection is left
/// untouched so the user can adjust and retry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    seats: BTreeSet<SeatLabel>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles a seat in or out of the selection. Toggling a booked seat is
    /// a no-op. Returns whether the selection changed.
    pub fn toggle(&mut self, label: SeatLabel, booked: &HashSet<SeatLabel>) -> bool {
        if booked.contains(&label) {
            return false;
        }
        if !self.seats.remove(&label) {
            self.seats.insert(label);
        }
        true
    }

    pub fn contains(&self, label: &SeatLabel) -> bool {
        self.seats.contains(label)
    }

    pub fn seats(&self) -> &BTreeSet<SeatLabel> {
        &self.seats
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Drains the selection after a successful submission.
    pub fn take(&mut self) -> BTreeSet<SeatLabel> {
        std::mem::take(&mut self.seats)
    }

    /// Abandons the pending selection. No side effects anywhere else.
    pub fn clear(&mut self) {
        self.seats.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booked(v: &[&str]) -> HashSet<SeatLabel> {
        v.iter().map(|s| SeatLabel::from(*s)).collect()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut sel = Selection::new();
        let none = HashSet::new();

        assert!(sel.toggle("A1".into(), &none));
        assert!(sel.contains(&"A1".into()));

        assert!(sel.toggle("A1".into(), &none));
        assert!(sel.is_empty());
    }

    #[test]
    fn toggling_booked_seat_is_a_no_op() {
        let mut sel = Selection::new();
        let taken = booked(&["A1"]);

        assert!(!sel.toggle("A1".into(), &taken));
        assert!(sel.is_empty());

        // Other seats stay toggleable.
        assert!(sel.toggle("A2".into(), &taken));
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn selection_is_a_set() {
        let mut sel = Selection::new();
        let none = HashSet::new();
        sel.toggle("B2".into(), &none);
        sel.toggle("A1".into(), &none);
        sel.toggle("B2".into(), &none);
        sel.toggle("B2".into(), &none);
        assert_eq!(sel.len(), 2);
    }

    #[test]
    fn take_clears_only_on_call() {
        let mut sel = Selection::new();
        let none = HashSet::new();
        sel.toggle("A1".into(), &none);
        sel.toggle("B2".into(), &none);

        // A failed submission leaves the set intact for retry.
        assert_eq!(sel.len(), 2);

        let submitted = sel.take();
        assert_eq!(submitted.len(), 2);
        assert!(sel.is_empty());
    }

    #[test]
    fn clear_abandons_pending_selection() {
        let mut sel = Selection::new();
        sel.toggle("A1".into(), &HashSet::new());
        sel.clear();
        assert!(sel.is_empty());
    }
}
