//! Data Transfer Objects for the cluster API
//!
//! Request and response bodies of the ECS JSON protocol. Field names follow
//! the wire format (camelCase); domain types are reused where the shapes match.

pub mod task;
