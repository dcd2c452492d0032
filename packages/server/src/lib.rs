//! Anonymous one-to-one chat matchmaking server.
//!
//! Connections join a per-kind waiting pool, get paired first-come
//! first-served, then exchange chat messages and WebRTC signaling inside
//! their session until one side leaves or disconnects.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
