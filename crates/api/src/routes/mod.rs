pub mod matches;
pub mod players;
pub mod points;
pub mod tournaments;
