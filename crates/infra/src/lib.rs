pub mod db;
pub mod models;
pub mod repos;

pub use db::Db;
