mod config;
mod render;

pub use config::{Config, USER_AGENT};
pub use render::{DEFAULT_CONTAINER_ID, DEFAULT_REPO, RenderOptions, render, run};
