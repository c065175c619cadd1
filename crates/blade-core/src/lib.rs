//! Turbine Blade Core
//!
//! This crate contains the blade-specific logic:
//! - Airfoil: NACA thickness profile sampling
//! - Station: radial cross-sections and their validation
//! - Design: rotor sizing and station measurements from turbine inputs
//! - Blade: the loft-and-fuse pipeline driven through a CAD context
//! - Export: STL, FreeCAD macro and OpenSCAD output
//! - Project: serializable project file

pub mod airfoil;
pub mod blade;
pub mod constants;
pub mod design;
pub mod export;
pub mod project;
pub mod section;
pub mod station;
pub mod stl;

pub use airfoil::*;
pub use blade::*;
pub use constants::*;
pub use design::*;
pub use export::*;
pub use project::*;
pub use section::*;
pub use station::*;
pub use stl::*;
