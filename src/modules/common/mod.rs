pub mod elevation;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod utils;
