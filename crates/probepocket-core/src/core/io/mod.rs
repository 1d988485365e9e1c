//! Provides input/output for plain-text sphere formats.
//!
//! Atom spheres are read from whitespace-separated XYZR files; detected pocket
//! spheres are written either back as XYZR (with score and pocket rank columns)
//! or as PDB `HETATM` pseudo-atoms for viewing next to the original structure.

pub mod pdb;
pub mod traits;
pub mod xyzr;
