// Hue v2 REST client and resource models
pub mod bridge;

// Color and identifier utilities
pub mod color;
pub mod resolve;

// Long-lived actors
pub mod events;
pub mod scheduler;
pub mod streamer;

// Choreography building blocks
pub mod batch;
pub mod cache;
pub mod effects;

// Tool surface
pub mod api;
pub mod registry;

// Application plumbing
pub mod error;
pub mod settings;
pub mod state;
