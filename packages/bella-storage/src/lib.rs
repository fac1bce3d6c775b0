pub mod comments;
pub mod db;
pub mod doctors;
pub mod favorites;
pub mod hospitals;
pub mod images;
pub mod members;
pub mod models;
pub mod reviews;
pub mod schema;
pub mod tags;
pub mod tokens;

pub type Result<T, E = sqlx::Error> = std::result::Result<T, E>;
