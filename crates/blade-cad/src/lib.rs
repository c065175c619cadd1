//! Geometry Kernel Abstraction and Document Model
//!
//! This crate provides:
//! - An abstract CAD kernel trait for polygon, cylinder, loft and fuse operations
//! - A pure Rust polygonal mesh kernel implementing it
//! - A document model (objects, recompute, view) addressed through an explicit context

pub mod document;
pub mod kernel;

// Re-exports for convenience
pub use document::{
    AXONOMETRIC_DIRECTION, CadContext, Camera, DEFAULT_TESSELLATION_TOLERANCE, Document,
    DocumentError, DocumentObject, DocumentResult, View, ViewCommand,
};
pub use kernel::{
    BoundingBox, CadError, CadKernel, CadResult, MeshKernel, NullKernel, Solid, TessellatedMesh,
    Wire, default_kernel,
};
