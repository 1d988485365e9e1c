use crate::core::models::pocket::{Pocket, PocketSphere};
use crate::core::models::sphere::Sphere;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// A format atom spheres can be read from.
pub trait AtomSource {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads atom spheres, in file order, from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is malformed or the reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Sphere>, Self::Error>;

    /// Reads atom spheres from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Sphere>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

/// A format pocket spheres can be written to.
pub trait PocketSink {
    /// The error type for write operations.
    type Error: Error + From<io::Error>;

    /// Writes every pocket sphere, tagged with the rank of the pocket it belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(
        spheres: &[PocketSphere],
        pockets: &[Pocket],
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes pocket spheres to a file path, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        spheres: &[PocketSphere],
        pockets: &[Pocket],
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(spheres, pockets, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Maps every sphere index to the rank of its pocket; 0 marks an unassigned sphere.
pub(crate) fn rank_by_sphere(sphere_count: usize, pockets: &[Pocket]) -> Vec<usize> {
    let mut ranks = vec![0; sphere_count];
    for pocket in pockets {
        for &index in &pocket.sphere_indices {
            if let Some(slot) = ranks.get_mut(index) {
                *slot = pocket.rank;
            }
        }
    }
    ranks
}
