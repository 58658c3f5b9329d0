pub mod config;
pub mod email;
pub mod pdf;
pub mod persistence;
pub mod services;
pub mod templates;
