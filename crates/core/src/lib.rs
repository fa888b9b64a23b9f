pub mod config;
pub mod error;
pub mod item;
pub mod time;

pub use config::Config;
pub use error::*;
pub use item::*;
