pub mod commands;
pub mod modules;

pub use modules::common::error::UninstallerError;
pub use modules::common::utils;
pub use modules::{backend, catalog, cleaner, matcher, reconciler, reporter, scanner};
