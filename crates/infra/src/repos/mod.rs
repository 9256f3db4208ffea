pub mod matches;
pub mod participants;
pub mod players;
pub mod points;
pub mod selections;
pub mod tournaments;
pub mod users;

pub use matches::{CreateMatch, MatchRepo};
pub use participants::ParticipantRepo;
pub use players::{CreatePlayer, PlayerRepo};
pub use points::PointRepo;
pub use selections::TeamSelectionRepo;
pub use tournaments::{CreateTournament, TournamentRepo};
pub use users::UserRepo;
