//! Traits for format-agnostic parsing and serialization in lang2csv.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, Write},
    path::Path,
};

use crate::error::Error;

/// A trait for parsing and writing one file of a supported format.
///
/// Both the flat CSV table and the PHP translation modules implement it, so
/// the pipelines read and write them the same way.
///
/// # Example
///
/// ```rust,no_run
/// use lang2csv::traits::Parser;
/// let format = lang2csv::formats::php::Format::read_from("lang/en/auth.php")?;
/// format.write_to("lang/en/auth_copy.php")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::unreadable(path, e))?;
        Self::from_reader(BufReader::new(file)).map_err(|e| e.in_file(path))
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::write_failure(path, e))?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)
            .map_err(|e| e.into_write_failure(path))?;
        writer.flush().map_err(|e| Error::write_failure(path, e))
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }
}
