use super::traits::{PocketSink, rank_by_sphere};
use crate::core::models::pocket::{Pocket, PocketSphere};
use std::io::{self, Write};
use thiserror::Error;

const RESIDUE_NAME: &str = "POC";
const ATOM_NAME: &str = " C  ";
const ELEMENT: &str = "C";
const MAX_SERIAL: usize = 99_999;
const MAX_B_FACTOR: f64 = 999.99;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Too many pocket spheres for PDB serial numbers: {0} (limit 99999)")]
    SerialOverflow(usize),
}

/// PDB `HETATM` output of pocket pseudo-atoms.
///
/// Each sphere becomes one `POC` residue numbered by its pocket rank; the burial
/// score goes into the B-factor column (capped at 999.99). Sphere radii are not
/// encoded, readers are expected to use the probe radius.
pub struct PdbFile;

impl PocketSink for PdbFile {
    type Error = PdbError;

    fn write_to(
        spheres: &[PocketSphere],
        pockets: &[Pocket],
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        if spheres.len() > MAX_SERIAL {
            return Err(PdbError::SerialOverflow(spheres.len()));
        }
        let ranks = rank_by_sphere(spheres.len(), pockets);

        writeln!(writer, "REMARK   1 POCKET SPHERES: {}", spheres.len())?;
        writeln!(writer, "REMARK   1 POCKETS: {}", pockets.len())?;
        for (i, (sphere, rank)) in spheres.iter().zip(ranks).enumerate() {
            writeln!(
                writer,
                "HETATM{:>5} {}{}{:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                i + 1,
                ATOM_NAME,
                ' ',
                RESIDUE_NAME,
                'P',
                rank % 10_000,
                ' ',
                sphere.center.x,
                sphere.center.y,
                sphere.center.z,
                1.0,
                (sphere.score as f64).min(MAX_B_FACTOR),
                ELEMENT,
            )?;
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}
