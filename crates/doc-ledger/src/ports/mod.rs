//! Ports layer - Hexagonal Architecture interfaces.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
