//! Closed-form sphere constructions used by the pocket engine.
//!
//! - [`tangent_sphere`] - Apollonius' problem: the sphere tangent to four given spheres
//!   (standalone; not called by detection)
//! - [`triple_placer`] - Probe centers touching three given spheres at once
//!
//! Degenerate configurations are reported as "no solution" (`None` or an empty list),
//! never as errors: callers skip them and continue.

pub mod tangent_sphere;
pub mod triple_placer;
