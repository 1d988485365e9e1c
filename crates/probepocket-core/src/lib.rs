//! # probepocket Core Library
//!
//! Detection of candidate ligand-binding cavities ("pockets") on a molecular surface by
//! packing probe spheres into solvent-excluded regions and growing them by accretion.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Sphere`, `Probe`, `PocketSphere`),
//!   pure geometry (the Apollonius tangent-sphere solver and the three-sphere probe placer),
//!   and plain-text I/O for atom and pocket files.
//!
//! - **[`engine`]: The Logic Core.** Run-scoped machinery: configuration, the uniform-grid
//!   `SpatialIndex`, the CSR `NeighborGraph`, the weeding `ProbeSet`, and the tasks that
//!   place, accrete, select and cluster probes.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into a single
//!   detection run over an in-memory atom set.
//!
//! All working state is owned by a single run, so independent runs may execute concurrently.

pub mod core;
pub mod engine;
pub mod workflows;
