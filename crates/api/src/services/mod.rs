pub mod leaderboard;
pub mod points;
pub mod tournaments;
