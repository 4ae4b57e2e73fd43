//! Core traits, settings, and module registry shared by every catalog crate.

pub mod module;
pub mod registry;
pub mod render;
pub mod settings;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
pub use render::{Context, RenderError, Renderer};
pub use settings::Settings;
