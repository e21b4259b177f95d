pub mod api;
pub mod config;
pub mod detect;
pub mod engine;
pub mod format;
pub mod remote;
pub mod source;
