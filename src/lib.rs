pub mod common;
pub mod export;
pub mod import;
pub mod library;
pub mod map;
pub mod scene;
pub mod settings;
