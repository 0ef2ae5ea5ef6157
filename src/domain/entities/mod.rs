pub mod application;
pub mod content;
pub mod user;
pub mod voice;
