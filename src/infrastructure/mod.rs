//! Infrastructure layer: concrete implementations of the domain seams
//! (repositories, update pusher, token verifier, canvas store) and the
//! DTOs for the wire protocols.

pub mod dto;
pub mod repository;
pub mod store;
pub mod token;
pub mod update_pusher;
