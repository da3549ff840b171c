pub mod admin;
pub mod bills;
pub mod error;
pub mod health;

pub use error::AppError;
