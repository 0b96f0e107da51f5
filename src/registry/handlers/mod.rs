pub mod batch;
pub mod cache;
pub mod effects;
pub mod events;
pub mod groups;
pub mod lights;
pub mod scenes;
pub mod sensors;
pub mod streaming;
pub mod system;
