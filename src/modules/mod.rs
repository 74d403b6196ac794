pub mod backend;
pub mod catalog;
pub mod cleaner;
pub mod common;
pub mod matcher;
pub mod reconciler;
pub mod reporter;
pub mod scanner;
