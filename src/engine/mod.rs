// Preload orchestration — run lifecycle and progress reporting.

pub mod preloader;
pub mod progress;
pub mod sink;
