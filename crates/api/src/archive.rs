//! Zip bundling of a submission's export files.

use std::io::{Cursor, Write};

use catapult_core::export::ExportFile;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

/// Pack `files` into an in-memory zip, one entry per file.
pub fn build_zip(files: &[ExportFile]) -> Result<Vec<u8>, zip::result::ZipError> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        writer.start_file(file.name.as_str(), options)?;
        writer.write_all(file.content.as_bytes())?;
    }
    Ok(writer.finish()?.into_inner())
}
