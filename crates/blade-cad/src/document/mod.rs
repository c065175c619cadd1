//! Document Model
//!
//! Documents hold named objects whose shapes live in a CAD kernel. A
//! recompute tessellates every touched object. Documents are reached through
//! a `CadContext` instead of process-wide state.

mod view;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::kernel::{BoundingBox, CadError, CadKernel, Solid, TessellatedMesh, default_kernel};

pub use view::{AXONOMETRIC_DIRECTION, Camera, DEFAULT_FIELD_OF_VIEW, View, ViewCommand};

/// Default chordal tolerance for recompute, in model units
pub const DEFAULT_TESSELLATION_TOLERANCE: f64 = 1e-3;

/// Document-related errors
#[derive(Debug, Clone, Error)]
pub enum DocumentError {
    #[error("CAD kernel error: {0}")]
    Cad(#[from] CadError),

    #[error("Object not found: {0}")]
    ObjectNotFound(Uuid),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("No active document")]
    NoActiveDocument,

    #[error("Nothing to fit: the document has no recomputed geometry")]
    NothingToFit,
}

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// An object in a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentObject {
    /// Unique identifier
    pub id: Uuid,
    /// Unique name within the document
    pub name: String,
    /// Object type, e.g. `Part::Feature`
    pub type_name: String,
    /// Kernel shape assigned to this object
    pub shape: Option<Solid>,
    /// Tessellation produced by the last recompute
    #[serde(skip)]
    mesh: Option<TessellatedMesh>,
    /// Bounds produced by the last recompute
    #[serde(skip)]
    bounds: Option<BoundingBox>,
    /// Whether the object changed since the last recompute
    #[serde(default)]
    touched: bool,
}

impl DocumentObject {
    fn new(type_name: impl Into<String>, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            type_name: type_name.into(),
            shape: None,
            mesh: None,
            bounds: None,
            touched: true,
        }
    }

    /// Check whether the object needs a recompute
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Tessellation from the last recompute
    pub fn mesh(&self) -> Option<&TessellatedMesh> {
        self.mesh.as_ref()
    }

    /// Bounds from the last recompute
    pub fn bounds(&self) -> Option<&BoundingBox> {
        self.bounds.as_ref()
    }
}

/// Make a string usable as an object name: ASCII alphanumerics and `_`,
/// not starting with a digit
pub fn sanitize_object_name(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if sanitized.is_empty() || sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        sanitized.insert(0, '_');
    }
    sanitized
}

/// A CAD document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document name
    pub name: String,
    /// Tolerance used when recomputing objects
    pub tessellation_tolerance: f64,
    objects: Vec<DocumentObject>,
    view: View,
}

impl Document {
    /// Create an empty document
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tessellation_tolerance: DEFAULT_TESSELLATION_TOLERANCE,
            objects: Vec::new(),
            view: View::default(),
        }
    }

    /// Get the number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the document has no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Add an object and return its ID
    ///
    /// Names are sanitized and made unique with a numeric suffix
    /// (`Blade`, `Blade001`, `Blade002`, ...).
    pub fn add_object(&mut self, type_name: impl Into<String>, name: &str) -> Uuid {
        let base = sanitize_object_name(name);
        let mut unique = base.clone();
        let mut suffix = 0u32;
        while self.find_object(&unique).is_some() {
            suffix += 1;
            unique = format!("{base}{suffix:03}");
        }

        let object = DocumentObject::new(type_name, unique);
        let id = object.id;
        tracing::debug!(document = %self.name, object = %object.name, "added object");
        self.objects.push(object);
        id
    }

    /// Remove an object by ID
    pub fn remove_object(&mut self, id: Uuid) -> Option<DocumentObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(index))
    }

    /// Get an object by ID
    pub fn object(&self, id: Uuid) -> Option<&DocumentObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Get an object by name
    pub fn find_object(&self, name: &str) -> Option<&DocumentObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Get all objects in creation order
    pub fn objects(&self) -> &[DocumentObject] {
        &self.objects
    }

    /// Assign a shape to an object and mark it for recompute
    pub fn set_shape(&mut self, id: Uuid, shape: Solid) -> DocumentResult<()> {
        let object = self
            .objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(DocumentError::ObjectNotFound(id))?;
        object.shape = Some(shape);
        object.touched = true;
        Ok(())
    }

    /// Number of objects waiting for a recompute
    pub fn touched_count(&self) -> usize {
        self.objects.iter().filter(|o| o.touched).count()
    }

    /// Tessellate every touched object
    ///
    /// Returns the number of objects recomputed. The first kernel failure
    /// aborts the recompute; objects already processed keep their results.
    pub fn recompute(&mut self, kernel: &dyn CadKernel) -> DocumentResult<usize> {
        let tolerance = self.tessellation_tolerance;
        let mut recomputed = 0;

        for object in self.objects.iter_mut().filter(|o| o.touched) {
            if let Some(shape) = &object.shape {
                let mesh = kernel.tessellate(shape, tolerance)?;
                object.bounds = mesh.bounding_box();
                tracing::debug!(
                    object = %object.name,
                    triangles = mesh.triangle_count(),
                    "recomputed object"
                );
                object.mesh = Some(mesh);
                recomputed += 1;
            }
            object.touched = false;
        }

        tracing::info!(document = %self.name, recomputed, "recompute finished");
        Ok(recomputed)
    }

    /// Bounds of all recomputed objects
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.objects
            .iter()
            .filter_map(|o| o.bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Get the document view
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Get the document view mutably
    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    /// Send a command to the document view
    ///
    /// # Errors
    /// `NothingToFit` for `ViewCommand::Fit` when nothing has been recomputed.
    pub fn send_view_command(&mut self, command: ViewCommand) -> DocumentResult<()> {
        let bounds = self.bounding_box();
        if command == ViewCommand::Fit && bounds.is_none() {
            return Err(DocumentError::NothingToFit);
        }
        self.view.apply(command, bounds.as_ref());
        Ok(())
    }

    /// Switch the view to the axonometric orientation
    pub fn view_axonometric(&mut self) {
        self.view.view_axonometric();
    }
}

/// Explicit handle on a kernel and its open documents
pub struct CadContext {
    kernel: Box<dyn CadKernel>,
    documents: Vec<Document>,
    active: Option<usize>,
}

impl Default for CadContext {
    fn default() -> Self {
        Self::new(default_kernel())
    }
}

impl CadContext {
    /// Create a context around a kernel
    pub fn new(kernel: Box<dyn CadKernel>) -> Self {
        Self {
            kernel,
            documents: Vec::new(),
            active: None,
        }
    }

    /// Get the kernel
    pub fn kernel(&self) -> &dyn CadKernel {
        self.kernel.as_ref()
    }

    /// Get all open documents
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Open a new document and make it active
    ///
    /// Document names are made unique the same way object names are.
    pub fn new_document(&mut self, name: &str) -> &mut Document {
        let base = sanitize_object_name(name);
        let mut unique = base.clone();
        let mut suffix = 0u32;
        while self.documents.iter().any(|d| d.name == unique) {
            suffix += 1;
            unique = format!("{base}{suffix}");
        }

        tracing::info!(document = %unique, kernel = self.kernel.name(), "new document");
        self.documents.push(Document::new(unique));
        let index = self.documents.len() - 1;
        self.active = Some(index);
        &mut self.documents[index]
    }

    /// Make the named document active
    pub fn set_active_document(&mut self, name: &str) -> DocumentResult<()> {
        let index = self
            .documents
            .iter()
            .position(|d| d.name == name)
            .ok_or_else(|| DocumentError::DocumentNotFound(name.to_string()))?;
        self.active = Some(index);
        Ok(())
    }

    /// Get the active document
    pub fn active_document(&self) -> DocumentResult<&Document> {
        self.active
            .and_then(|i| self.documents.get(i))
            .ok_or(DocumentError::NoActiveDocument)
    }

    /// Get the active document mutably
    pub fn active_document_mut(&mut self) -> DocumentResult<&mut Document> {
        self.active
            .and_then(|i| self.documents.get_mut(i))
            .ok_or(DocumentError::NoActiveDocument)
    }

    /// Recompute the active document with this context's kernel
    pub fn recompute(&mut self) -> DocumentResult<usize> {
        let index = self.active.ok_or(DocumentError::NoActiveDocument)?;
        let document = self
            .documents
            .get_mut(index)
            .ok_or(DocumentError::NoActiveDocument)?;
        document.recompute(self.kernel.as_ref())
    }

    /// Close a document by name
    pub fn close_document(&mut self, name: &str) -> Option<Document> {
        let index = self.documents.iter().position(|d| d.name == name)?;
        let document = self.documents.remove(index);
        self.active = match self.active {
            Some(active) if active == index => None,
            Some(active) if active > index => Some(active - 1),
            other => other,
        };
        Some(document)
    }
}
