use std::fs;
use std::io;
use std::io::{Read, Write};
use std::path::Path;

use flate2;
use flate2::Compression;


fn is_gzip(path: &Path) -> bool {
	matches!(path.extension(), Some(x) if x == "gz")
}

/// Open a file for reading, transparently decompressing `.gz` files.
pub fn magic_open<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Read>> {
	let path = path.as_ref();
	let f = fs::File::open(path)?;
	if is_gzip(path) {
		Ok(Box::new(flate2::read::GzDecoder::new(f)))
	} else {
		Ok(Box::new(f))
	}
}

/// Write `data` to `path`, gzip-compressing it if the path ends in `.gz`.
pub fn magic_write<P: AsRef<Path>>(path: P, data: &[u8]) -> io::Result<()> {
	let path = path.as_ref();
	let f = fs::File::create(path)?;
	if is_gzip(path) {
		let mut enc = flate2::write::GzEncoder::new(f, Compression::default());
		enc.write_all(data)?;
		enc.finish()?;
	} else {
		let mut f = io::BufWriter::new(f);
		f.write_all(data)?;
		f.flush()?;
	}
	Ok(())
}
