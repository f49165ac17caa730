pub mod memory;
pub mod token;
pub mod user;
pub mod workout;

pub use memory::InMemoryStore;
pub use token::PostgresTokenRepository;
pub use user::PostgresUserRepository;
pub use workout::PostgresWorkoutRepository;
