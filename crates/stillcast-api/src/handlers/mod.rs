//! HTTP handlers.

pub mod health;
pub mod jobs;
pub mod pages;

pub use health::{health, ready};
pub use jobs::create_video;
pub use pages::upload_form;
