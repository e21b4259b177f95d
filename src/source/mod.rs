// Asset-load capability — pluggable probes for HTTP and test doubles.

pub mod http_probe;
pub mod traits;
