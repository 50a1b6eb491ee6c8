mod listing;
mod log_level;

pub use listing::Listing;
pub use log_level::LogLevel;
