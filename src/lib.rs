//! Shapelab: the engine behind a pile of small interactive graphics toys.
//!
//! The heart of the crate is a 2D shape model (points, segments, polygons
//! over shared vertices) with an affine-transform pipeline and a bag of
//! geometric queries: containment by two strategies, point-side
//! classification, segment intersection, cubic Bezier evaluation. A
//! [`crate::session::Session`] ties those together into a mode-driven
//! editing surface that a host UI feeds with clicks and drags.
//!
//! On the side there are grammar-driven fractal curve generators
//! ([`crate::l_system`] plus [`crate::turtle`]) and a midpoint-displacement
//! line generator ([`crate::displace`]), which produce continuous
//! `geo_types` polylines ready for whatever the host draws with.
//!
//! The crate never opens a window and never renders anything itself; hosts
//! implement [`crate::surface::Surface`] and deliver input events.

/// Shape primitives: points, segments, polygons, and the shared-vertex
/// model that keeps them in sync under transforms.
pub mod geometry;

/// Pivoted affine matrix builders (rotate/scale/shear/translate).
pub mod transform;

/// Geometric queries: containment, point-side, segment intersection.
pub mod query;

/// Cubic Bezier evaluation, single and chained.
pub mod curve;

/// The mode-driven editing session a host UI drives.
pub mod session;

/// The drawing-surface collaborator contract, plus a recording stub.
pub mod surface;

/// Error types for the editor and the grammar parser.
pub mod errors;

/// L-system grammars, with parsing and expansion.
pub mod l_system;

/// Turtle graphics: replays expanded grammars into line art.
pub mod turtle;

/// Midpoint-displacement line generator.
pub mod displace;

/// One stop shopping. Import prelude::* and get on with your day.
pub mod prelude {
    pub use crate::curve::{chained_bezier, cubic_bezier};
    pub use crate::displace::Displacer;
    pub use crate::errors::{EditorError, GrammarError};
    pub use crate::geometry::{shared, Line, Point, Polygon, Shape, SharedPoint};
    pub use crate::l_system::{BranchAngle, LSystem};
    pub use crate::query::{
        contains_convex, contains_raycast, rotate_edge_90, segment_intersection, side_of, RayCast,
        Side,
    };
    pub use crate::session::{
        Mode, QueryKind, QueryOutcome, Session, ShapeKind, ShapeRef, TransformKind,
    };
    pub use crate::surface::{RecordingSurface, Surface};
    pub use crate::transform::{rotation_about, scale_about, shear_about, translation};
    pub use crate::turtle::{degrees, Turtle, TurtleTrait};
}
