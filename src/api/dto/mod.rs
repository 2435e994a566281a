//! Data Transfer Objects for REST request/response serialization.

pub mod common_dto;
pub mod history_dto;

pub use common_dto::*;
pub use history_dto::*;
