// abixml corpus archives
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of ABIR.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Corpora stored as ZIP archives of translation units.
//!
//! Each archive entry is a complete `abi-instr` document;
//!   entries are read in archive order and no index entry is required.
//! An entry's name becomes the translation unit's path unless the
//!   document declares its own `path` attribute.
//!
//! An entry that cannot be read or parsed is skipped rather than
//!   aborting the archive;
//!     the reported count covers only the units actually read.

use super::error::AbixmlResult;
use super::reader::read_translation_unit_from_buffer;
use crate::ir::{Corpus, TranslationUnit};
use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Granularity of entry reads.
const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Read a corpus from a ZIP archive,
///   appending each successfully parsed translation unit to `corp`.
///
/// Returns the number of translation units read.
///
/// Errors
/// ======
/// - [`AbixmlError::ZipError`](super::AbixmlError::ZipError) if the
///   archive itself cannot be opened.
pub fn read_corpus_from_archive<R: Read + Seek>(
    corp: &mut Corpus,
    archive: R,
) -> AbixmlResult<usize> {
    let mut archive = ZipArchive::new(archive)?;
    let mut nb_read = 0;

    for i in 0..archive.len() {
        let mut entry = match archive.by_index(i) {
            Ok(entry) => entry,
            Err(_) => continue,
        };

        let name = entry.name().to_owned();

        let input = match read_entry(&mut entry) {
            Ok(input) => input,
            Err(_) => continue,
        };

        let mut tu = TranslationUnit::new(name);
        if read_translation_unit_from_buffer(&input, &mut tu).is_ok() {
            corp.add(tu);
            nb_read += 1;
        }
    }

    Ok(nb_read)
}

/// Read a corpus from the ZIP archive at `path`.
///
/// Returns the number of translation units read.
pub fn read_corpus_from_archive_file<P: AsRef<Path>>(
    corp: &mut Corpus,
    path: P,
) -> AbixmlResult<usize> {
    let file = File::open(path)?;
    read_corpus_from_archive(corp, file)
}

/// Read a corpus from the ZIP archive at `path`,
///   constructing the corpus with the archive's path.
pub fn corpus_from_archive_file<P: AsRef<Path>>(path: P) -> AbixmlResult<Corpus> {
    let path = path.as_ref();

    let mut corp = Corpus::new(path.to_string_lossy());
    read_corpus_from_archive_file(&mut corp, path)?;
    Ok(corp)
}

/// Read an entry to completion,
///   growing the buffer [`READ_CHUNK_SIZE`] bytes at a time.
fn read_entry<R: Read>(entry: &mut R) -> io::Result<String> {
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];
    let mut contents = Vec::new();

    loop {
        let n = entry.read(&mut chunk)?;
        if n == 0 {
            break;
        }

        contents.extend_from_slice(&chunk[..n]);
    }

    Ok(String::from_utf8_lossy(&contents).into_owned())
}
