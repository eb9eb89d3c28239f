pub mod availability;
pub mod layout;
pub mod selection;

pub use availability::{project, ProjectedSeat, SeatState};
pub use layout::{HallLayout, RowSpec, Seat, SeatLabel};
pub use selection::Selection;
