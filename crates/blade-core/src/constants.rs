//! Global constants for blade-core

/// Maximum thickness of the NACA 4412 profile, as a fraction of chord
pub const NACA_MAX_THICKNESS: f64 = 0.12;

/// NACA 4-digit thickness coefficients a0..a3
pub const NACA_COEFFICIENTS: [f64; 4] = [0.2969, -0.126, -0.3516, 0.2843];

/// a4 giving a zero-thickness trailing edge
pub const NACA_A4_CLOSED: f64 = -0.1036;

/// a4 of the classic open trailing edge
pub const NACA_A4_OPEN: f64 = -0.1015;

/// Default chordwise samples per airfoil surface
pub const DEFAULT_AIRFOIL_SAMPLES: usize = 100;

/// Hub radius as a fraction of the root station radius
pub const DEFAULT_HUB_RADIUS_RATIO: f64 = 0.2;

/// Default hub cylinder length, in model units
pub const DEFAULT_HUB_LENGTH: f64 = 100.0;

/// Name of the document created for a blade
pub const DEFAULT_DOCUMENT_NAME: &str = "TurbineBlade";

/// Name of the document object holding the fused blade
pub const DEFAULT_OBJECT_NAME: &str = "TurbineBlade";

/// Document object type for plain shapes
pub const PART_FEATURE_TYPE: &str = "Part::Feature";

/// Project file format version
pub const PROJECT_VERSION: u32 = 1;
