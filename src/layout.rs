//! Binary container for feature banks.
//!
//! ```text
//! offset 0      i32   header[0]
//! offset 4      i32   header[1]
//! offset 8+4k   f32   payload[k]
//! ```
//!
//! Everything is little-endian with no padding, magic number or checksum.
//! Which of the two layouts a file holds is known only by convention.
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::matrix::FeatureMatrix;

/// Size of the `[i32; 2]` shape header in bytes.
pub const HEADER_LEN: usize = 2 * 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Layout {
    /// "1-to-1": header `[n, d]`, one full vector per record.
    Pairwise,
    /// "1-to-n": header `[d, n]`, one embedding coordinate of every vector
    /// per record.
    Batch,
}

impl Layout {
    /// Filename tag used by the matching tools.
    pub fn tag(&self) -> &'static str {
        match self {
            Layout::Pairwise => "1-to-1",
            Layout::Batch => "1-to-n",
        }
    }

    pub fn header(&self, matrix: &FeatureMatrix) -> Result<[i32; 2]> {
        let shape_err = || Error::ShapeMismatch {
            rows: matrix.rows(),
            dim: matrix.dim(),
        };
        let n = i32::try_from(matrix.rows()).map_err(|_| shape_err())?;
        let d = i32::try_from(matrix.dim()).map_err(|_| shape_err())?;
        Ok(match self {
            Layout::Pairwise => [n, d],
            Layout::Batch => [d, n],
        })
    }

    /// Total container size for a `(rows, dim)` bank.
    pub fn encoded_len(rows: usize, dim: usize) -> usize {
        HEADER_LEN + 4 * rows * dim
    }
}

fn write_floats<W: Write>(w: &mut W, values: impl IntoIterator<Item = f32>) -> Result<()> {
    for v in values {
        w.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

/// Write `matrix` to any sink in the given layout.
pub fn write_to<W: Write>(w: &mut W, matrix: &FeatureMatrix, layout: Layout) -> Result<()> {
    for h in layout.header(matrix)? {
        w.write_all(&h.to_le_bytes())?;
    }
    match layout {
        Layout::Pairwise => write_floats(w, matrix.as_slice().iter().copied()),
        Layout::Batch => write_floats(w, matrix.transpose().into_vec()),
    }
}

/// Create `path` and write `matrix` to it. The file is flushed and closed
/// before returning; on error whatever was written must be considered invalid.
pub fn encode(matrix: &FeatureMatrix, layout: Layout, path: &Path) -> Result<usize> {
    // Reject bad shapes before touching the filesystem.
    layout.header(matrix)?;

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    write_to(&mut writer, matrix, layout)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;

    let len = Layout::encoded_len(matrix.rows(), matrix.dim());
    tracing::info!(path = %path.display(), bytes = len, layout = layout.tag(), "wrote feature bank");
    Ok(len)
}

/// Header `[n, d]`, payload row-major over `(n, d)`.
pub fn encode_pairwise(matrix: &FeatureMatrix, path: &Path) -> Result<usize> {
    encode(matrix, Layout::Pairwise, path)
}

/// Header `[d, n]`, payload row-major over the transposed `(d, n)` shape.
pub fn encode_batch(matrix: &FeatureMatrix, path: &Path) -> Result<usize> {
    encode(matrix, Layout::Batch, path)
}

/// Raw contents of a container, not yet interpreted by layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    header: [i32; 2],
    payload: Vec<f32>,
}

impl Container {
    pub fn header(&self) -> [i32; 2] {
        self.header
    }

    pub fn payload(&self) -> &[f32] {
        &self.payload
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::Truncated {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }
        let (head, body) = bytes.split_at(HEADER_LEN);
        let header = [
            i32::from_le_bytes([head[0], head[1], head[2], head[3]]),
            i32::from_le_bytes([head[4], head[5], head[6], head[7]]),
        ];
        let [a, b] = header;
        let (a, b) = match (usize::try_from(a), usize::try_from(b)) {
            (Ok(a), Ok(b)) if a > 0 && b > 0 => (a, b),
            _ => {
                return Err(Error::ShapeMismatch {
                    rows: a.max(0) as usize,
                    dim: b.max(0) as usize,
                })
            }
        };

        let expected = Layout::encoded_len(a, b);
        if bytes.len() < expected {
            return Err(Error::Truncated {
                expected,
                actual: bytes.len(),
            });
        }
        if bytes.len() > expected {
            return Err(Error::TrailingBytes(bytes.len() - expected));
        }

        let payload = body
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(Self { header, payload })
    }

    pub fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        let mut bytes = Vec::new();
        r.read_to_end(&mut bytes)?;
        Self::parse(&bytes)
    }

    /// Recover the `(n, d)` bank this container was written from.
    pub fn into_matrix(self, layout: Layout) -> Result<FeatureMatrix> {
        let [a, b] = self.header;
        let m = FeatureMatrix::from_vec(a as usize, b as usize, self.payload)?;
        Ok(match layout {
            Layout::Pairwise => m,
            Layout::Batch => m.transpose(),
        })
    }
}

pub fn read_container(path: &Path) -> Result<Container> {
    Container::read_from(&mut File::open(path)?)
}

/// Read only the shape header of `path`.
pub fn read_header(path: &Path) -> Result<[i32; 2]> {
    let mut head = [0u8; HEADER_LEN];
    File::open(path)?.read_exact(&mut head)?;
    Ok([
        i32::from_le_bytes([head[0], head[1], head[2], head[3]]),
        i32::from_le_bytes([head[4], head[5], head[6], head[7]]),
    ])
}

/// Read `path` back into an `(n, d)` bank.
pub fn decode(path: &Path, layout: Layout) -> Result<FeatureMatrix> {
    let bytes = fs::read(path)?;
    Container::parse(&bytes)?.into_matrix(layout)
}
