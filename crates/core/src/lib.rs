#![forbid(unsafe_code)]

pub mod autosave;
pub mod export;
pub mod model;
pub mod navigator;
pub mod progress;
pub mod time;
pub mod wire;

pub use time::Clock;
