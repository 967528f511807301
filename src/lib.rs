//! tipview - headless tooltip renderer
//!
//! Lays out a tooltip with `tipview_ui`, measures and rasterizes its text
//! with cosmic-text, paints it with tiny-skia and writes PNG frames of its
//! appearance, relayout and dismissal.

pub mod config;
pub mod constants;
pub mod scene;
pub mod skia;
pub mod text;

pub use config::{AppConfig, ConfigError, LogLevel, SceneConfig};
pub use scene::{Scene, SceneError};
pub use skia::{PixmapSurface, RenderError};
pub use text::CosmicText;
