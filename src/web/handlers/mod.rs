//! # Web API Request Handlers

pub mod fleet;
pub mod health;
pub mod results;
pub mod tasks;
