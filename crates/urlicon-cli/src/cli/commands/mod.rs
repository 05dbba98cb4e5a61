//! CLI command handlers, one per file.

mod annotate;
mod key;
mod resolve;
mod show_config;

pub use annotate::run_annotate;
pub use key::run_key;
pub use resolve::run_resolve;
pub use show_config::run_config;
