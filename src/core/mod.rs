pub mod downloader;
pub mod finder;
pub mod parser;
pub mod preview;
pub mod tagger;
