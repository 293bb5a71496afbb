pub mod agent;
pub mod artifact;
pub mod config;
pub mod dag;
pub mod errors;
pub mod pipeline;
pub mod prompts;
pub mod ui;
