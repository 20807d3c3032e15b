//! Aknikki Core Library
//!
//! Platform-agnostic scene, transform, and timeline editing engine for the
//! Aknikki slide editor. Rendering, asset lookup, and export are supplied by
//! the host through the traits in [`render`], [`catalog`], and [`export`].

pub mod camera;
pub mod catalog;
pub mod config;
pub mod editor;
pub mod element;
pub mod error;
pub mod export;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod mode;
pub mod render;
pub mod scene;
pub mod timeline;
pub mod transform;

pub use camera::{CameraConfig, ViewportCamera};
pub use catalog::{AssetCandidate, AssetCatalog, StaticCatalog};
pub use config::EditorConfig;
pub use editor::{Editor, PointerHit};
pub use element::{Element, ElementContent, ElementId, ElementKind, ElementPatch};
pub use error::{ConfigError, EditError, EditResult, ExportError};
pub use export::{ExportRequest, Exporter, JsonManifestExporter};
pub use frame::{AspectPreset, CanvasFrame};
pub use geometry::{Geometry, GeometryPatch};
pub use input::{MouseButton, PointerEvent, RendererEvent, TimelineEvent};
pub use mode::{Mode, ModeState, PanelKind};
pub use render::{ActionMenu, EditAction, RenderFrame, RenderSurface};
pub use scene::{LayerDirection, Scene};
pub use timeline::{TimeSpan, TimelineConfig, TimelineDrag, TimelineRow};
pub use transform::{CommitOutcome, GestureKind, Handle, HandleKind, TransformSync};
