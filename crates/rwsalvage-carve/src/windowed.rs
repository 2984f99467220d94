//! Windowed carving for blobs too large to load at once.
//!
//! The scan slides a fixed-size read buffer over the file. Marker hits
//! whose header runs off the buffer edge realign the window to the hit
//! and refill; windows with no hit advance by the buffer length minus
//! the last `RECORD_HEADER_SIZE - 1` bytes so a magic straddling the
//! boundary is seen on the next pass. Carved records are read straight
//! from the file and may be larger than the window.

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use memchr::memmem;

use crate::marker::{parse_record_header, RECORD_HEADER_SIZE};
use crate::names::NameFeed;
use crate::report::CarveReport;
use crate::scanner::Carver;
use crate::Result;

/// Default sliding window, large enough that realignments are rare.
pub const DEFAULT_WINDOW_SIZE: usize = 10 * 1024 * 1024;

impl Carver {
    /// Carve `input` without mapping or loading it whole.
    ///
    /// Produces the same records and the same report counts as
    /// [`Carver::carve_slice`] on the full file contents.
    pub fn carve_windowed(
        &self,
        input: &Path,
        feed: &mut NameFeed,
        out_dir: &Path,
        window_size: usize,
    ) -> Result<CarveReport> {
        let window_size = window_size.max(RECORD_HEADER_SIZE);
        let mut file = File::open(input)?;
        let file_size = file.metadata()?.len();
        fs::create_dir_all(out_dir)?;

        let magic = self.marker.magic();
        let finder = memmem::Finder::new(&magic);

        let mut report = CarveReport {
            names_total: feed.total(),
            ..CarveReport::default()
        };
        let mut buffer = vec![0u8; window_size];
        let mut base: u64 = 0;

        while base < file_size {
            let want = window_size.min((file_size - base) as usize);
            file.seek(SeekFrom::Start(base))?;
            file.read_exact(&mut buffer[..want])?;
            let window = &buffer[..want];

            let relative = match finder.find(window) {
                Some(relative) => relative,
                None => {
                    if base + want as u64 >= file_size {
                        break;
                    }
                    // Keep the window tail so a magic split across the
                    // boundary is found on the next pass.
                    base += (want - (RECORD_HEADER_SIZE - 1)) as u64;
                    continue;
                }
            };
            let found = base + relative as u64;

            if relative + RECORD_HEADER_SIZE > want {
                if found + RECORD_HEADER_SIZE as u64 > file_size {
                    report.errors += 1;
                    report.note(found, "record header truncated at end of input");
                    break;
                }
                // Header split across the window edge, realign and
                // refill.
                base = found;
                continue;
            }

            let header = match parse_record_header(
                self.marker,
                &window[relative..relative + RECORD_HEADER_SIZE],
            ) {
                Some(header) => header,
                None => {
                    report.errors += 1;
                    report.note(found, "implausible record length, skipping marker");
                    base = found + 1;
                    continue;
                }
            };

            let partition = match header.form_type {
                None => None,
                Some(form) => match self.routing.route(&form) {
                    Some(extension) => Some(extension.to_string()),
                    None => {
                        report.note(
                            found,
                            format!(
                                "unrouted RIFF form '{}', skipping record",
                                String::from_utf8_lossy(&form)
                            ),
                        );
                        base = (found + header.total_size).min(file_size);
                        continue;
                    }
                },
            };

            let mut end = found + header.total_size;
            if end > file_size {
                report.adjusted += 1;
                report.note(
                    found,
                    format!(
                        "declared length {} runs past end of input, clamped",
                        header.total_size
                    ),
                );
                end = file_size;
            }

            let extension = partition.as_deref();
            let name = match feed.peek(extension) {
                Some(name) => name.to_string(),
                None => {
                    report.exhausted = true;
                    report.note(found, "filename list exhausted, stopping scan");
                    break;
                }
            };

            let mut record = vec![0u8; (end - found) as usize];
            file.seek(SeekFrom::Start(found))?;
            file.read_exact(&mut record)?;
            match fs::write(out_dir.join(&name), &record) {
                Ok(()) => {
                    feed.commit(extension);
                    report.carved += 1;
                    base = end;
                }
                Err(err) => {
                    report.errors += 1;
                    report.note(found, format!("failed to write {name}: {err}"));
                    base = found + 1;
                }
            }
        }

        report.names_used = feed.used();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use byteorder::{LittleEndian, WriteBytesExt};

    use crate::marker::{Marker, CLUMP_TYPE_ID};

    use super::*;

    fn rw_record(body: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.write_u32::<LittleEndian>(CLUMP_TYPE_ID).unwrap();
        bytes
            .write_u32::<LittleEndian>(body.len() as u32)
            .unwrap();
        bytes.write_u32::<LittleEndian>(0x1803_FFFF).unwrap();
        bytes.extend_from_slice(body);
        bytes
    }

    // Records straddling window edges, a record larger than the
    // window, and a junk stretch longer than the window.
    fn awkward_blob() -> Vec<u8> {
        let mut blob = vec![0u8; 27];
        blob.extend(rw_record(&[0xAA; 20]));
        blob.extend(vec![0u8; 100]);
        blob.extend(rw_record(&[0xBB; 60]));
        blob.extend(vec![0u8; 5]);
        blob.extend(rw_record(&[0xCC; 8]));
        blob
    }

    #[test]
    fn test_small_window_matches_in_memory_scan() {
        let blob = awkward_blob();
        let input = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(input.path(), &blob).unwrap();

        let names = || {
            vec![
                "a.dff".to_string(),
                "b.dff".to_string(),
                "c.dff".to_string(),
            ]
        };
        let carver = Carver::new(Marker::RwChunk(CLUMP_TYPE_ID));

        let slice_dir = tempfile::tempdir().unwrap();
        let mut slice_feed = NameFeed::single(names());
        let slice_report = carver
            .carve_slice(&blob, &mut slice_feed, slice_dir.path())
            .unwrap();

        let window_dir = tempfile::tempdir().unwrap();
        let mut window_feed = NameFeed::single(names());
        let window_report = carver
            .carve_windowed(input.path(), &mut window_feed, window_dir.path(), 32)
            .unwrap();

        assert_eq!(window_report.carved, slice_report.carved);
        assert_eq!(window_report.carved, 3);
        assert_eq!(window_report.errors, slice_report.errors);
        assert_eq!(window_report.adjusted, slice_report.adjusted);
        for name in names() {
            let from_slice = std::fs::read(slice_dir.path().join(&name)).unwrap();
            let from_window = std::fs::read(window_dir.path().join(&name)).unwrap();
            assert_eq!(from_slice, from_window, "{name}");
        }
    }

    #[test]
    fn test_header_split_across_window_edge() {
        // Window of 16 puts the first record's header at bytes 10..22,
        // forcing a realign-and-refill pass.
        let mut blob = vec![0u8; 10];
        blob.extend(rw_record(&[0xEE; 24]));

        let input = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(input.path(), &blob).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let mut feed = NameFeed::single(vec!["split.dff".into()]);
        let report = Carver::new(Marker::RwChunk(CLUMP_TYPE_ID))
            .carve_windowed(input.path(), &mut feed, dir.path(), 16)
            .unwrap();

        assert_eq!(report.carved, 1);
        let out = std::fs::read(dir.path().join("split.dff")).unwrap();
        assert_eq!(out.len(), 36);
        assert_eq!(out[12..], [0xEE; 24]);
    }
}
