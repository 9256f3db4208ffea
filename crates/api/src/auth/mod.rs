pub mod config;
pub mod extract;
pub mod jwt;

pub use config::AuthConfig;
pub use extract::{AdminUser, CurrentUser};
pub use jwt::{Claims, JwtService};
