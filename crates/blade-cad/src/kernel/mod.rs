//! Geometry kernel abstraction
//!
//! `CadKernel` is the seam between blade generation and whatever builds the
//! actual geometry. `MeshKernel` is the built-in polygonal implementation.

mod loft;
mod mesh;
mod primitive;
mod traits;

pub use loft::{DEFAULT_TENSION, MAX_LOFT_STEPS};
pub use mesh::MeshKernel;
pub use primitive::{MAX_CYLINDER_SEGMENTS, MIN_CYLINDER_SEGMENTS};
pub use traits::*;
