use crate::core::models::protein::Protein;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading structure file formats into a [`Protein`].
///
/// Implementors parse whole-file text; buffered readers and paths are provided on
/// top of [`StructureFile::read_str`].
pub trait StructureFile {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Parses the complete text of a structure file.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid structure of this format.
    fn read_str(&self, text: &str) -> Result<Protein, Self::Error>;

    /// Reads a structure from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the content does not parse.
    fn read_from(&self, reader: &mut impl BufRead) -> Result<Protein, Self::Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.read_str(&text)
    }

    /// Reads a structure from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(&self, path: P) -> Result<Protein, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.read_from(&mut reader)
    }
}
