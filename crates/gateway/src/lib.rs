pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod reflection;
pub mod state;
