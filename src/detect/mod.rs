// Asset classification and media header sniffing.

pub mod asset;
pub mod container;
