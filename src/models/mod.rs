//! Request and Response models for the reminder API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies. Tasks
//! themselves are returned as [`crate::store::Task`].

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CreateTaskRequest, UpdateTaskRequest};
pub use responses::{
    DeleteResponse, HealthResponse, PresetAppliedResponse, PresetItemResponse, PresetResponse,
    StatsResponse,
};
