//! # Engine Module
//!
//! Run-scoped machinery for pocket detection. Every buffer created here (the
//! neighbor graphs, the growing probe set, the scratch vectors used during
//! triplet enumeration) belongs to exactly one run.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Required detection parameters, optional tuning knobs and their validation
//! - **Error Handling** ([`error`]) - Engine-specific error types
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Spatial Queries** ([`spatial`]) - Uniform grid over atom centers for burial and clash checks
//! - **Proximity Graph** ([`neighbors`]) - CSR adjacency and triplet enumeration
//! - **Probe Storage** ([`probe_set`]) - Append-or-replace probe set with weeding
//! - **Tasks** ([`tasks`]) - Layer-0 placement, accretion, density selection and clustering
//!
//! ## Parallelism
//!
//! With the `parallel` feature, candidate evaluation for a layer runs on the
//! rayon pool. Weeding is applied afterwards in triplet order, so the output
//! does not depend on the feature or the thread count.

pub mod config;
pub mod context;
pub mod error;
pub mod neighbors;
pub mod probe_set;
pub mod progress;
pub mod spatial;
pub mod tasks;
