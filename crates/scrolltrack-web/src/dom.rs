//! Layout and geometry reads against the live DOM.

use scrolltrack::{ContainerMetrics, LayoutProbe, PathGeometry, Point};
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, SvgPathElement, Window};

/// An SVG `<path>` element answering arc-length queries.
#[derive(Debug, Clone)]
pub struct DomPath(SvgPathElement);

impl DomPath {
    /// Wrap a path element.
    #[must_use]
    pub fn new(element: SvgPathElement) -> Self {
        Self(element)
    }

    /// The wrapped element.
    #[must_use]
    pub fn element(&self) -> &SvgPathElement {
        &self.0
    }
}

impl PathGeometry for DomPath {
    fn total_length(&self) -> f64 {
        f64::from(self.0.get_total_length())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn point_at_length(&self, length: f64) -> Point {
        match self.0.get_point_at_length(length as f32) {
            Ok(p) => Point::new(f64::from(p.x()), f64::from(p.y())),
            Err(err) => {
                // Only thrown for paths with no segments.
                warn!(?err, "getPointAtLength failed");
                Point::ZERO
            }
        }
    }
}

/// Looks up the container and path elements by id on every read.
///
/// Either element may not exist yet while the page is rendering; reads then
/// return `None` and the tracker skips the update.
#[derive(Debug, Clone)]
pub struct DomLayout {
    window: Window,
    container_id: String,
    path_id: String,
}

impl DomLayout {
    /// Create a probe for the given element ids.
    #[must_use]
    pub fn new(window: Window, container_id: &str, path_id: &str) -> Self {
        Self {
            window,
            container_id: container_id.to_string(),
            path_id: path_id.to_string(),
        }
    }

    fn document(&self) -> Option<Document> {
        self.window.document()
    }

    fn viewport_height(&self) -> Option<f64> {
        self.window.inner_height().ok()?.as_f64()
    }
}

impl LayoutProbe for DomLayout {
    type Path = DomPath;

    fn container(&self) -> Option<ContainerMetrics> {
        let element = self.document()?.get_element_by_id(&self.container_id)?;
        let rect = element.get_bounding_client_rect();
        Some(ContainerMetrics::new(
            rect.top(),
            rect.height(),
            self.viewport_height()?,
        ))
    }

    fn path(&self) -> Option<Self::Path> {
        self.document()?
            .get_element_by_id(&self.path_id)?
            .dyn_into::<SvgPathElement>()
            .ok()
            .map(DomPath)
    }
}
