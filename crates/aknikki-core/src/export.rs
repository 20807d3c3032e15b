//! Export contract.
//!
//! Exporters receive a scene snapshot, the output frame, and the timeline
//! length. The viewport camera is never part of a request.

use crate::element::Element;
use crate::error::ExportError;
use crate::frame::CanvasFrame;
use serde::Serialize;
use std::sync::Arc;

/// Input to an export.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// Elements in paint order, back to front.
    pub elements: Arc<Vec<Element>>,
    pub frame: CanvasFrame,
    /// End of the last element, in seconds.
    pub total_duration: f64,
}

/// Produces an output artifact from a scene.
pub trait Exporter {
    type Artifact;

    fn export(&mut self, request: &ExportRequest) -> Result<Self::Artifact, ExportError>;
}

#[derive(Serialize)]
struct Manifest<'a> {
    width: f64,
    height: f64,
    total_duration: f64,
    elements: &'a [Element],
}

/// Writes the request as a JSON manifest for an external encoder.
#[derive(Debug, Clone, Default)]
pub struct JsonManifestExporter {
    /// Pretty-print the output.
    pub pretty: bool,
}

impl Exporter for JsonManifestExporter {
    type Artifact = String;

    fn export(&mut self, request: &ExportRequest) -> Result<String, ExportError> {
        if request.elements.is_empty() {
            return Err(ExportError::EmptyScene);
        }
        let size = request.frame.size();
        let manifest = Manifest {
            width: size.width,
            height: size.height,
            total_duration: request.total_duration,
            elements: &request.elements,
        };
        let json = if self.pretty {
            serde_json::to_string_pretty(&manifest)
        } else {
            serde_json::to_string(&manifest)
        };
        json.map_err(|e| ExportError::Failed(e.to_string()))
    }
}
