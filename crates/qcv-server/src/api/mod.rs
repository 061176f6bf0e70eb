//! API endpoint handlers.

pub mod circuit;
pub mod download;
pub mod dynamics;
pub mod health;
pub mod root;
