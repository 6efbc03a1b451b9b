pub mod config;
pub mod logging;

pub mod content_type;
pub mod control;
pub mod disposition;
pub mod engine;
pub mod filename;
pub mod headers;
pub mod percent;
pub mod prefs;
pub mod sniff;
pub mod viewers;
