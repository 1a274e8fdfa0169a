//! Transparent decompression for input files.
//!
//! A file is treated as gzip when its name ends in `.gz` or its first two bytes
//! are the gzip magic number. Without the `compression-gzip` feature every file
//! is read as-is.

use crate::error::{Error, Result};
use std::fs::File;
#[cfg(feature = "compression-gzip")]
use std::io::BufRead;
use std::io::{BufReader, Read};
use std::path::Path;

#[cfg(feature = "compression-gzip")]
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Open `path` for reading, wrapping it in a decoder when it is compressed.
pub fn open_reader(path: &Path) -> Result<Box<dyn Read>> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    #[cfg_attr(not(feature = "compression-gzip"), allow(unused_mut))]
    let mut reader = BufReader::new(file);

    #[cfg(feature = "compression-gzip")]
    {
        let by_extension = path.extension().is_some_and(|e| e == "gz");
        let by_magic = reader.fill_buf().map_err(io_err)?.starts_with(&GZIP_MAGIC);
        if by_extension || by_magic {
            return Ok(Box::new(flate2::read::MultiGzDecoder::new(reader)));
        }
    }

    Ok(Box::new(reader))
}
