//! JSON API serving the grid to a browser front end.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
