pub mod config;
pub mod points;
pub mod record;
pub mod sample;
