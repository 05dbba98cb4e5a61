pub mod config;
pub mod logging;

pub mod annotate;
pub mod cache;
pub mod fetch;
pub mod resolver;
pub mod url_model;
