//! # Workflows Module
//!
//! Top-level entry points for library users.
//!
//! - **Detection Workflow** ([`detect`]) - Atom spheres in, ranked pockets out: layer-0
//!   placement, accretion to a fixed point, density selection and clustering.

pub mod detect;
