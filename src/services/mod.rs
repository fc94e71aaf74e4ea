//! Business logic services.

pub mod auth_service;
pub mod creation_service;
pub mod generation_service;
pub mod image_generator;
pub mod media_service;
pub mod quota_service;
pub mod text_generator;
