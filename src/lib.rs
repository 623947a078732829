pub mod commands;
pub mod format;
pub mod http;
pub mod markdown;
pub mod page;
pub mod render;
pub mod runtime;
pub mod source;
