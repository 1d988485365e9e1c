//! # Core Module
//!
//! Stateless building blocks shared by every detection run.
//!
//! - **Geometric Models** ([`models`]) - Spheres, probes, and reported pocket spheres
//! - **Geometry** ([`geometry`]) - Closed-form tangent-sphere constructions
//! - **File I/O** ([`io`]) - Reading atom spheres and writing pocket pseudo-atoms
//!
//! Nothing in this module keeps state between calls; the engine layer owns all
//! per-run buffers.

pub mod geometry;
pub mod io;
pub mod models;
