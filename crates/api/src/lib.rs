pub mod app;
pub mod auth;
pub mod error;
pub mod middleware;
pub mod realtime;
pub mod routes;
pub mod services;
pub mod state;
pub mod ws;

pub use error::AppError;
pub use state::AppState;
