pub mod builder;
pub mod config;
pub mod layout;
pub mod split;
