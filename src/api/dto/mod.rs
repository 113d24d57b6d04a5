//! Data Transfer Objects for REST request/response serialization.
//!
//! Success responses carry an `ok: true` flag alongside the payload;
//! failures use the error envelope in [`crate::error`].

pub mod common_dto;
pub mod message_dto;
pub mod room_dto;

pub use common_dto::*;
pub use message_dto::*;
pub use room_dto::*;
