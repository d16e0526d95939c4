#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod command;
pub mod components;
pub mod config;
pub mod element;
pub mod event;
pub mod geometry;
pub mod input;
pub mod panels;
pub mod render;
pub mod state;
pub mod template;
pub mod texture_manager;
pub mod tools;
pub mod transform;

pub use app::MirrorCanvasApp;
pub use canvas::CanvasController;
pub use command::{Command, CommandHistory};
pub use config::CanvasConfig;
pub use element::{Line, LineStyle, ShapeKind, ShapeSizeError};
pub use event::{CanvasEvent, EventBus};
pub use render::{RenderTarget, Renderer};
pub use template::{DrawingTemplate, SaveMode, TemplateStore};
pub use tools::ToolKind;
