//! # Core Models Module
//!
//! Plain geometric data consumed and produced by the pocket engine.
//!
//! - [`sphere`] - Center + radius, the common representation of atoms and probes
//! - [`probe`] - A probe sphere with its burial count and layer of origin
//! - [`pocket`] - Reported pocket spheres and the pockets they are grouped into

pub mod pocket;
pub mod probe;
pub mod sphere;
