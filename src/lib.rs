pub mod clock;
pub mod config;
pub mod error;
pub mod feed;
pub mod render;
pub mod runtime;
pub mod sample;
pub mod source;
pub mod storage;
pub mod window;
