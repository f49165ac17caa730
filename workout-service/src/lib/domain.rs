pub mod token;
pub mod user;
pub mod workout;
