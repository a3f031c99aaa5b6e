//! Pose input model and preprocessing
//!
//! - Landmark and pose-frame types (MediaPipe 33-landmark layout)
//! - Geometry helpers
//! - Timestamp resolution
//! - Tracked-point trajectories
//! - Rolling frame window for streaming
//! - Deterministic synthetic swings

pub mod geometry;
pub mod landmark;
pub mod synthetic;
pub mod timestamps;
pub mod trajectory;
pub mod window;

pub use geometry::Point3;
pub use landmark::{BodySide, Joint, Landmark, PoseFrame, LANDMARK_COUNT};
