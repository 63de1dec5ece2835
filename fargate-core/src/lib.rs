//! Fargate Core
//!
//! Core types shared by the client, the task runner and the CLI.
//!
//! This crate contains:
//! - Domain types: what a caller asks for and what it gets back (RunRequest, Task, ExitOutcome, etc.)
//! - DTOs: the request/response shapes spoken to the cluster API

pub mod domain;
pub mod dto;
