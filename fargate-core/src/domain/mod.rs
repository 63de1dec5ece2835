//! Domain types
//!
//! Plain data passed between the launcher and the exit waiter.
//! Nothing here talks to the network.

pub mod failure;
pub mod outcome;
pub mod request;
pub mod task;
