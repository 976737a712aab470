//! Binary formats for operators and spectral data.
//!
//! All formats are little-endian and start with a four byte tag:
//!
//! | Tag    | Payload                                                              |
//! |--------|----------------------------------------------------------------------|
//! | `MSPM` | `nrows u64`, `ncols u64`, `nnz u64`, `nnz` x (`row u64`, `col u64`, `value f64`) |
//! | `MMOD` | `len u64`, `count u64`, `count` eigenvalues, `count` columns of `len` values |
//! | `MFUN` | `len u64`, `len` values                                              |
//!
//! Sparse entries are written in row-major order. Readers reject a wrong tag,
//! truncated payloads, out-of-range or repeated matrix coordinates, and bytes past
//! the declared payload. Matrix headers larger than [`MAX_MATRIX_DIMENSION`] in
//! either direction are rejected before anything is allocated. Nothing is
//! returned from a failed read.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use nalgebra::{DMatrix, DVector};

use crate::error::{ModesError, Result};
use crate::sparse::CsrMatrix;
use crate::spectral::{FunctionData, ModeData};

/// Tag of the sparse matrix format.
pub const MATRIX_MAGIC: [u8; 4] = *b"MSPM";
/// Tag of the mode data format.
pub const MODES_MAGIC: [u8; 4] = *b"MMOD";
/// Tag of the function data format.
pub const FUNCTION_MAGIC: [u8; 4] = *b"MFUN";

const MATRIX_FORMAT: &str = "sparse matrix";
const MODES_FORMAT: &str = "mode data";
const FUNCTION_FORMAT: &str = "function data";

// Upper bound for preallocation driven by untrusted length fields
const MAX_PREALLOC: usize = 1 << 20;

/// Largest row or column count accepted when reading a sparse matrix.
pub const MAX_MATRIX_DIMENSION: usize = u32::MAX as usize;

/// Write a sparse matrix.
pub fn write_matrix<W: Write>(writer: &mut W, matrix: &CsrMatrix) -> Result<()> {
    writer.write_all(&MATRIX_MAGIC)?;
    writer.write_u64::<LittleEndian>(matrix.nrows() as u64)?;
    writer.write_u64::<LittleEndian>(matrix.ncols() as u64)?;
    writer.write_u64::<LittleEndian>(matrix.nnz() as u64)?;

    for (row, col, value) in matrix.triplet_iter() {
        writer.write_u64::<LittleEndian>(row as u64)?;
        writer.write_u64::<LittleEndian>(col as u64)?;
        writer.write_f64::<LittleEndian>(value)?;
    }
    Ok(())
}

/// Read a sparse matrix.
pub fn read_matrix<R: Read>(reader: &mut R) -> Result<CsrMatrix> {
    let mut input = Input::new(reader, MATRIX_FORMAT);
    input.expect_magic(MATRIX_MAGIC)?;

    let nrows = input.read_len()?;
    let ncols = input.read_len()?;
    if nrows > MAX_MATRIX_DIMENSION || ncols > MAX_MATRIX_DIMENSION {
        return Err(ModesError::malformed(
            MATRIX_FORMAT,
            format!("{nrows}x{ncols} exceeds the dimension limit {MAX_MATRIX_DIMENSION}"),
        ));
    }
    let nnz = input.read_len()?;

    let mut triplets = Vec::with_capacity(nnz.min(MAX_PREALLOC));
    for _ in 0..nnz {
        let row = input.read_len()?;
        let col = input.read_len()?;
        let value = input.read_f64()?;
        triplets.push((row, col, value));
    }
    input.expect_end()?;

    let matrix = CsrMatrix::from_triplets(nrows, ncols, triplets).map_err(|e| match e {
        ModesError::EntryOutOfBounds { .. } | ModesError::MatrixTooLarge { .. } => {
            ModesError::malformed(MATRIX_FORMAT, e)
        }
        other => other,
    })?;

    // Repeated coordinates were merged by the assembly
    if matrix.nnz() != nnz {
        return Err(ModesError::malformed(
            MATRIX_FORMAT,
            format!("{} repeated coordinates", nnz - matrix.nnz()),
        ));
    }
    Ok(matrix)
}

/// Write mode data.
pub fn write_modes<W: Write>(writer: &mut W, data: &ModeData) -> Result<()> {
    writer.write_all(&MODES_MAGIC)?;
    writer.write_u64::<LittleEndian>(data.len() as u64)?;
    writer.write_u64::<LittleEndian>(data.count() as u64)?;

    for &eigenvalue in data.eigenvalues().iter() {
        writer.write_f64::<LittleEndian>(eigenvalue)?;
    }
    // Column-major storage is written column by column
    for &value in data.modes().iter() {
        writer.write_f64::<LittleEndian>(value)?;
    }
    Ok(())
}

/// Read mode data.
pub fn read_modes<R: Read>(reader: &mut R) -> Result<ModeData> {
    let mut input = Input::new(reader, MODES_FORMAT);
    input.expect_magic(MODES_MAGIC)?;

    let len = input.read_len()?;
    let count = input.read_len()?;
    let total = len
        .checked_mul(count)
        .ok_or_else(|| ModesError::malformed(MODES_FORMAT, "mode matrix size overflows"))?;

    let eigenvalues = input.read_values(count)?;
    let values = input.read_values(total)?;
    input.expect_end()?;

    ModeData::new(
        DMatrix::from_vec(len, count, values),
        DVector::from_vec(eigenvalues),
    )
}

/// Write function data.
pub fn write_function<W: Write>(writer: &mut W, data: &FunctionData) -> Result<()> {
    writer.write_all(&FUNCTION_MAGIC)?;
    writer.write_u64::<LittleEndian>(data.len() as u64)?;
    for &value in data.values().iter() {
        writer.write_f64::<LittleEndian>(value)?;
    }
    Ok(())
}

/// Read function data.
pub fn read_function<R: Read>(reader: &mut R) -> Result<FunctionData> {
    let mut input = Input::new(reader, FUNCTION_FORMAT);
    input.expect_magic(FUNCTION_MAGIC)?;

    let len = input.read_len()?;
    let values = input.read_values(len)?;
    input.expect_end()?;

    Ok(FunctionData::from(values))
}

/// Save a sparse matrix to a file.
pub fn save_matrix<P: AsRef<Path>>(path: P, matrix: &CsrMatrix) -> Result<()> {
    save_with(path.as_ref(), |w| write_matrix(w, matrix))
}

/// Load a sparse matrix from a file.
pub fn load_matrix<P: AsRef<Path>>(path: P) -> Result<CsrMatrix> {
    load_with(path.as_ref(), read_matrix)
}

/// Save mode data to a file.
pub fn save_modes<P: AsRef<Path>>(path: P, data: &ModeData) -> Result<()> {
    save_with(path.as_ref(), |w| write_modes(w, data))
}

/// Load mode data from a file.
pub fn load_modes<P: AsRef<Path>>(path: P) -> Result<ModeData> {
    load_with(path.as_ref(), read_modes)
}

/// Save function data to a file.
pub fn save_function<P: AsRef<Path>>(path: P, data: &FunctionData) -> Result<()> {
    save_with(path.as_ref(), |w| write_function(w, data))
}

/// Load function data from a file.
pub fn load_function<P: AsRef<Path>>(path: P) -> Result<FunctionData> {
    load_with(path.as_ref(), read_function)
}

fn save_with<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}

fn load_with<T, F>(path: &Path, read: F) -> Result<T>
where
    F: FnOnce(&mut BufReader<File>) -> Result<T>,
{
    let mut reader = BufReader::new(File::open(path)?);
    read(&mut reader)
}

/// Reader that reports end-of-input as truncation of `format`.
struct Input<'a, R> {
    reader: &'a mut R,
    format: &'static str,
}

impl<'a, R: Read> Input<'a, R> {
    fn new(reader: &'a mut R, format: &'static str) -> Self {
        Self { reader, format }
    }

    fn truncated(&self, error: std::io::Error) -> ModesError {
        if error.kind() == ErrorKind::UnexpectedEof {
            ModesError::Truncated {
                format: self.format,
            }
        } else {
            ModesError::Io(error)
        }
    }

    fn expect_magic(&mut self, expected: [u8; 4]) -> Result<()> {
        let mut found = [0u8; 4];
        self.reader
            .read_exact(&mut found)
            .map_err(|e| self.truncated(e))?;
        if found != expected {
            return Err(ModesError::BadMagic {
                expected: self.format,
                found,
            });
        }
        Ok(())
    }

    fn read_len(&mut self) -> Result<usize> {
        let value = self
            .reader
            .read_u64::<LittleEndian>()
            .map_err(|e| self.truncated(e))?;
        usize::try_from(value)
            .map_err(|_| ModesError::malformed(self.format, format!("length {value} too large")))
    }

    fn read_f64(&mut self) -> Result<f64> {
        self.reader
            .read_f64::<LittleEndian>()
            .map_err(|e| self.truncated(e))
    }

    fn read_values(&mut self, count: usize) -> Result<Vec<f64>> {
        let mut values = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            values.push(self.read_f64()?);
        }
        Ok(values)
    }

    fn expect_end(&mut self) -> Result<()> {
        let mut probe = [0u8; 1];
        loop {
            match self.reader.read(&mut probe) {
                Ok(0) => return Ok(()),
                Ok(_) => {
                    return Err(ModesError::malformed(
                        self.format,
                        "trailing bytes after payload",
                    ))
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ModesError::Io(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures;
    use crate::operator::{MeshOperator, OperatorOptions};

    fn to_bytes<F: FnOnce(&mut Vec<u8>) -> Result<()>>(write: F) -> Vec<u8> {
        let mut buffer = Vec::new();
        write(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_matrix_round_trip() {
        let op = MeshOperator::build(&fixtures::grid(3), &OperatorOptions::default()).unwrap();
        let matrix = op.full_laplacian();

        let bytes = to_bytes(|w| write_matrix(w, matrix));
        assert_eq!(bytes.len(), 4 + 24 + 24 * matrix.nnz());
        assert_eq!(&read_matrix(&mut bytes.as_slice()).unwrap(), matrix);
    }

    #[test]
    fn test_zero_matrix_round_trip() {
        for matrix in [CsrMatrix::zeros(0, 0), CsrMatrix::zeros(3, 5)] {
            let bytes = to_bytes(|w| write_matrix(w, &matrix));
            assert_eq!(read_matrix(&mut bytes.as_slice()).unwrap(), matrix);
        }
    }

    #[test]
    fn test_explicit_zero_round_trip() {
        let matrix =
            CsrMatrix::from_triplets(2, 2, vec![(0, 1, 0.0), (1, 0, -0.0), (1, 1, 2.5)]).unwrap();
        let bytes = to_bytes(|w| write_matrix(w, &matrix));
        let read = read_matrix(&mut bytes.as_slice()).unwrap();

        assert_eq!(read.nnz(), 3);
        assert!(read.contains(0, 1));
        assert_eq!(read, matrix);
    }

    #[test]
    fn test_matrix_bad_magic() {
        let mut bytes = to_bytes(|w| write_matrix(w, &CsrMatrix::zeros(1, 1)));
        bytes[..4].copy_from_slice(b"MMOD");
        assert!(matches!(
            read_matrix(&mut bytes.as_slice()),
            Err(ModesError::BadMagic { found, .. }) if &found == b"MMOD"
        ));
    }

    #[test]
    fn test_matrix_truncated() {
        let matrix = CsrMatrix::from_triplets(2, 2, vec![(0, 0, 1.0), (1, 1, 2.0)]).unwrap();
        let bytes = to_bytes(|w| write_matrix(w, &matrix));

        for cut in [2, 10, bytes.len() - 1] {
            assert!(matches!(
                read_matrix(&mut &bytes[..cut]),
                Err(ModesError::Truncated { .. })
            ));
        }
    }

    #[test]
    fn test_matrix_trailing_bytes() {
        let mut bytes = to_bytes(|w| write_matrix(w, &CsrMatrix::zeros(2, 2)));
        bytes.push(0);
        assert!(matches!(
            read_matrix(&mut bytes.as_slice()),
            Err(ModesError::Malformed { .. })
        ));
    }

    fn raw_matrix(nrows: u64, ncols: u64, entries: &[(u64, u64, f64)]) -> Vec<u8> {
        let mut bytes = MATRIX_MAGIC.to_vec();
        bytes.write_u64::<LittleEndian>(nrows).unwrap();
        bytes.write_u64::<LittleEndian>(ncols).unwrap();
        bytes.write_u64::<LittleEndian>(entries.len() as u64).unwrap();
        for &(r, c, v) in entries {
            bytes.write_u64::<LittleEndian>(r).unwrap();
            bytes.write_u64::<LittleEndian>(c).unwrap();
            bytes.write_f64::<LittleEndian>(v).unwrap();
        }
        bytes
    }

    #[test]
    fn test_matrix_out_of_range_entry() {
        let bytes = raw_matrix(2, 2, &[(0, 0, 1.0), (2, 1, 1.0)]);
        assert!(matches!(
            read_matrix(&mut bytes.as_slice()),
            Err(ModesError::Malformed { .. })
        ));
    }

    #[test]
    fn test_matrix_repeated_coordinate() {
        let bytes = raw_matrix(2, 2, &[(0, 1, 1.0), (0, 1, 2.0)]);
        assert!(matches!(
            read_matrix(&mut bytes.as_slice()),
            Err(ModesError::Malformed { .. })
        ));
    }

    #[test]
    fn test_modes_round_trip() {
        let modes = DMatrix::from_row_slice(3, 2, &[1.0, -1.0, 2.0, -2.0, 3.0, -3.0]);
        let data = ModeData::new(modes, DVector::from_vec(vec![0.25, 0.75])).unwrap();

        let bytes = to_bytes(|w| write_modes(w, &data));
        let read = read_modes(&mut bytes.as_slice()).unwrap();
        assert_eq!(read, data);

        // Pairing survives the round trip
        let (mode, eigenvalue) = read.mode(1).unwrap();
        assert_eq!(eigenvalue, 0.75);
        assert_eq!(mode, DVector::from_vec(vec![-1.0, -2.0, -3.0]));
    }

    #[test]
    fn test_modes_truncated_and_trailing() {
        let data = ModeData::new(DMatrix::from_element(2, 2, 1.0), DVector::zeros(2)).unwrap();
        let mut bytes = to_bytes(|w| write_modes(w, &data));

        assert!(matches!(
            read_modes(&mut &bytes[..bytes.len() - 8]),
            Err(ModesError::Truncated { .. })
        ));
        bytes.extend_from_slice(&[0; 8]);
        assert!(matches!(
            read_modes(&mut bytes.as_slice()),
            Err(ModesError::Malformed { .. })
        ));
    }

    #[test]
    fn test_modes_size_overflow() {
        let mut bytes = MODES_MAGIC.to_vec();
        bytes.write_u64::<LittleEndian>(u64::MAX).unwrap();
        bytes.write_u64::<LittleEndian>(4).unwrap();
        assert!(read_modes(&mut bytes.as_slice()).is_err());
    }

    #[test]
    fn test_matrix_huge_dimensions() {
        for (nrows, ncols) in [(u64::MAX, 0), (1 << 40, 1), (1, 1 << 40), (1 << 33, 1 << 33)] {
            let bytes = raw_matrix(nrows, ncols, &[]);
            assert_eq!(bytes.len(), 28);
            assert!(matches!(
                read_matrix(&mut bytes.as_slice()),
                Err(ModesError::Malformed { .. })
            ));
        }
    }

    #[test]
    fn test_function_round_trip() {
        let data = FunctionData::from(vec![1.0, 2.0, 3.0]);
        let bytes = to_bytes(|w| write_function(w, &data));
        assert_eq!(bytes.len(), 4 + 8 + 24);
        assert_eq!(read_function(&mut bytes.as_slice()).unwrap(), data);
    }

    #[test]
    fn test_function_read_as_modes() {
        let data = FunctionData::from(vec![1.0, 2.0, 3.0]);
        let bytes = to_bytes(|w| write_function(w, &data));

        let modes = ModeData::from_function(&read_function(&mut bytes.as_slice()).unwrap());
        assert_eq!(modes.count(), 1);
        let (mode, eigenvalue) = modes.mode(0).unwrap();
        assert_eq!(mode, DVector::from_vec(vec![1.0, 2.0, 3.0]));
        assert_eq!(eigenvalue, 0.0);
    }

    #[test]
    fn test_function_is_not_modes() {
        let bytes = to_bytes(|w| write_function(w, &FunctionData::from(vec![1.0])));
        assert!(matches!(
            read_modes(&mut bytes.as_slice()),
            Err(ModesError::BadMagic { .. })
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("meshmodes-serialize-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let matrix = CsrMatrix::from_triplets(2, 3, vec![(0, 2, 1.5), (1, 0, -1.0)]).unwrap();
        let matrix_path = dir.join("operator.bin");
        save_matrix(&matrix_path, &matrix).unwrap();
        assert_eq!(load_matrix(&matrix_path).unwrap(), matrix);

        let function = FunctionData::from(vec![0.5, -0.5]);
        let function_path = dir.join("function.bin");
        save_function(&function_path, &function).unwrap();
        assert_eq!(load_function(&function_path).unwrap(), function);

        let modes = ModeData::from_function(&function);
        let modes_path = dir.join("modes.bin");
        save_modes(&modes_path, &modes).unwrap();
        assert_eq!(load_modes(&modes_path).unwrap(), modes);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("meshmodes-does-not-exist.bin");
        assert!(matches!(load_matrix(path), Err(ModesError::Io(_))));
    }
}
