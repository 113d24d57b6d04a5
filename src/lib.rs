//! # internhub-relay
//!
//! Real-time messaging relay for the InternHub placement platform:
//! direct messages and chat rooms over WebSocket, with REST endpoints
//! for room management and message history.
//!
//! The relay is deliberately thin: it validates, persists, and fans
//! out. Identity comes from the platform's bearer tokens; everything
//! else about users lives elsewhere.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Connection Actors (ws/)
//!     │
//!     ├── MessageRelay / RoomDirectory (service/)
//!     │
//!     ├── ConnectionRegistry (domain/, in-memory)
//!     │
//!     └── MessageStore (persistence/, PostgreSQL or in-memory)
//! ```
//!
//! Every send follows persist-then-deliver: a message reaches storage
//! before any connection sees it, so history is the source of truth.

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
