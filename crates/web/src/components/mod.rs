//! View components shared by several page templates.

mod alert;
mod movie_card;
mod nav;

pub use alert::{Alert, AlertKind};
pub use movie_card::{MovieCard, MovieList};
pub use nav::NavBar;
