pub mod downloader;
pub mod filter;
pub mod finder;
pub mod youtube;
