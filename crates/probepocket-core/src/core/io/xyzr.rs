use super::traits::{AtomSource, PocketSink, rank_by_sphere};
use crate::core::models::pocket::{Pocket, PocketSphere};
use crate::core::models::sphere::Sphere;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XyzrError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzrParseErrorKind },
}

#[derive(Debug, Error, PartialEq)]
pub enum XyzrParseErrorKind {
    #[error("Expected at least 4 columns (x y z r), found {found}")]
    TooFewColumns { found: usize },
    #[error("Invalid float format in column {column} (value: '{value}')")]
    InvalidFloat { column: usize, value: String },
}

/// Whitespace-separated `x y z r` records, one sphere per line.
///
/// Blank lines and lines starting with `#` are skipped; columns past the fourth
/// are ignored on input.
pub struct XyzrFile;

impl AtomSource for XyzrFile {
    type Error = XyzrError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Sphere>, Self::Error> {
        let mut spheres = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            if fields.len() < 4 {
                return Err(XyzrError::Parse {
                    line: line_num,
                    kind: XyzrParseErrorKind::TooFewColumns {
                        found: fields.len(),
                    },
                });
            }

            let mut values = [0.0; 4];
            for (column, (slot, raw)) in values.iter_mut().zip(&fields).enumerate() {
                *slot = raw.parse().map_err(|_| XyzrError::Parse {
                    line: line_num,
                    kind: XyzrParseErrorKind::InvalidFloat {
                        column: column + 1,
                        value: raw.to_string(),
                    },
                })?;
            }
            let [x, y, z, r] = values;
            spheres.push(Sphere::from_coords(x, y, z, r));
        }

        Ok(spheres)
    }
}

impl PocketSink for XyzrFile {
    type Error = XyzrError;

    fn write_to(
        spheres: &[PocketSphere],
        pockets: &[Pocket],
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let ranks = rank_by_sphere(spheres.len(), pockets);
        writeln!(writer, "# x y z r score pocket")?;
        for (sphere, rank) in spheres.iter().zip(ranks) {
            writeln!(
                writer,
                "{:.3} {:.3} {:.3} {:.3} {} {}",
                sphere.center.x, sphere.center.y, sphere.center.z, sphere.radius, sphere.score, rank
            )?;
        }
        Ok(())
    }
}
