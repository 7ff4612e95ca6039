//! Collaborative pixel canvas application library.
//!
//! This library provides server and client implementations for a shared
//! pixel canvas with cooldown-gated placement and real-time WebSocket fanout.

#![feature(int_roundings)]

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// client
pub mod client;

// shared library
pub mod common;
