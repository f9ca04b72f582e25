pub mod health;
pub use self::health::health;

pub mod account;
pub use self::account::{login, logout, register};
