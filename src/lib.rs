//! Analysis chat
//!
//! A single-conversation chat client for a remote analysis service, and the
//! relay hop it talks through.

pub mod api;
pub mod config;
pub mod conversation;
pub mod gateway;
pub mod images;
pub mod render;

#[cfg(test)]
mod testing;
