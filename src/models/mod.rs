pub mod booking;
pub mod hall;
pub mod movie;
pub mod showtime;
pub mod user;

pub use booking::Booking;
pub use hall::Hall;
pub use movie::Movie;
pub use showtime::Showtime;
pub use user::User;
