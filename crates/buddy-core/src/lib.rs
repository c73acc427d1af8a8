pub mod badge;
pub mod checkin;
pub mod clock;
pub mod config;
pub mod dates;
pub mod error;
pub mod event_log;
pub mod io;
pub mod journal;
pub mod paths;
pub mod state;
pub mod store;
pub mod streak;

pub use error::{BuddyError, Result};
