// Presentation layer - HTTP boundary to the render pipeline
pub mod app_state;
pub mod handlers;
