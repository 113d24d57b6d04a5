//! Service layer: business logic orchestration.
//!
//! [`MessageRelay`] drives the validate → persist → fan-out pipeline;
//! [`RoomDirectory`] fronts room creation and history reads.

pub mod directory;
pub mod relay;

pub use directory::RoomDirectory;
pub use relay::MessageRelay;
