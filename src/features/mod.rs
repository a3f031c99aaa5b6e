//! Feature extraction modules
//!
//! This module contains all per-frame signal extraction:
//! - Confidence-weighted consensus (shared by impact and club path)
//! - Finite-difference kinematics
//! - Body measurements (rotation, weight split, posture)
//! - Phase segmentation
//! - Club-head path estimation (3 candidates + consensus)
//! - Impact detection (4 methods + consensus)

pub mod body;
pub mod club_path;
pub mod consensus;
pub mod impact;
pub mod kinematics;
pub mod phase;
