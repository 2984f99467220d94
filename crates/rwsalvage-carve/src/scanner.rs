//! In-memory carving scan.
//!
//! The combined blob of an archive pair has no table of contents. Each
//! record starts with a known 4-byte magic and carries its own length
//! in the header, so the scan walks marker hits, validates the embedded
//! length, slices the record out and writes it under the next recovered
//! filename. Names pair with records positionally; a record that fails
//! to write does not consume its name.

use std::fs::{self, File};
use std::path::Path;

use memchr::memmem;
use memmap2::Mmap;

use crate::marker::{parse_record_header, Marker, RiffRouting, RECORD_HEADER_SIZE};
use crate::names::NameFeed;
use crate::report::CarveReport;
use crate::Result;

/// Carves records of a single marker type out of a combined blob.
#[derive(Debug, Clone)]
pub struct Carver {
    pub(crate) marker: Marker,
    pub(crate) routing: RiffRouting,
}

impl Carver {
    pub fn new(marker: Marker) -> Self {
        Self {
            marker,
            routing: RiffRouting::default(),
        }
    }

    /// Same scanner with a custom RIFF form-type routing. Only
    /// meaningful for [`Marker::Riff`].
    pub fn with_routing(mut self, routing: RiffRouting) -> Self {
        self.routing = routing;
        self
    }

    /// Scan a fully loaded blob and write carved records into
    /// `out_dir`, which must already exist.
    pub fn carve_slice(
        &self,
        data: &[u8],
        feed: &mut NameFeed,
        out_dir: &Path,
    ) -> Result<CarveReport> {
        let magic = self.marker.magic();
        let finder = memmem::Finder::new(&magic);

        let mut report = CarveReport {
            names_total: feed.total(),
            ..CarveReport::default()
        };
        let mut cursor = 0usize;

        while cursor < data.len() {
            let found = match finder.find(&data[cursor..]) {
                Some(relative) => cursor + relative,
                None => break,
            };

            if found + RECORD_HEADER_SIZE > data.len() {
                report.errors += 1;
                report.note(found as u64, "record header truncated at end of input");
                break;
            }

            let header = match parse_record_header(
                self.marker,
                &data[found..found + RECORD_HEADER_SIZE],
            ) {
                Some(header) => header,
                None => {
                    report.errors += 1;
                    report.note(found as u64, "implausible record length, skipping marker");
                    cursor = found + 1;
                    continue;
                }
            };

            // RIFF records route to a per-extension name queue by form
            // type. Unrouted forms are not errors, the whole record is
            // simply not ours to carve.
            let partition = match header.form_type {
                None => None,
                Some(form) => match self.routing.route(&form) {
                    Some(extension) => Some(extension.to_string()),
                    None => {
                        report.note(
                            found as u64,
                            format!(
                                "unrouted RIFF form '{}', skipping record",
                                String::from_utf8_lossy(&form)
                            ),
                        );
                        let skip_to = (found as u64 + header.total_size).min(data.len() as u64);
                        cursor = skip_to as usize;
                        continue;
                    }
                },
            };

            let mut end = found as u64 + header.total_size;
            if end > data.len() as u64 {
                report.adjusted += 1;
                report.note(
                    found as u64,
                    format!(
                        "declared length {} runs past end of input, clamped",
                        header.total_size
                    ),
                );
                end = data.len() as u64;
            }

            let extension = partition.as_deref();
            let name = match feed.peek(extension) {
                Some(name) => name.to_string(),
                None => {
                    report.exhausted = true;
                    report.note(found as u64, "filename list exhausted, stopping scan");
                    break;
                }
            };

            match fs::write(out_dir.join(&name), &data[found..end as usize]) {
                Ok(()) => {
                    feed.commit(extension);
                    report.carved += 1;
                    cursor = end as usize;
                }
                Err(err) => {
                    report.errors += 1;
                    report.note(found as u64, format!("failed to write {name}: {err}"));
                    cursor = found + 1;
                }
            }
        }

        report.names_used = feed.used();
        Ok(report)
    }

    /// Memory-map `input` and carve it, creating `out_dir` if needed.
    pub fn carve_path(
        &self,
        input: &Path,
        feed: &mut NameFeed,
        out_dir: &Path,
    ) -> Result<CarveReport> {
        let file = File::open(input)?;
        // Safety: the mapping is read-only and outlives every borrow
        // taken during the scan.
        let mmap = unsafe { Mmap::map(&file)? };
        fs::create_dir_all(out_dir)?;
        self.carve_slice(&mmap, feed, out_dir)
    }
}

#[cfg(test)]
mod tests {
    use byteorder::{LittleEndian, WriteBytesExt};

    use crate::marker::{ANIMATION_TYPE_ID, CLUMP_TYPE_ID};

    use super::*;

    fn rw_record(type_id: u32, body: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.write_u32::<LittleEndian>(type_id).unwrap();
        bytes
            .write_u32::<LittleEndian>(body.len() as u32)
            .unwrap();
        bytes.write_u32::<LittleEndian>(0x1803_FFFF).unwrap();
        bytes.extend_from_slice(body);
        bytes
    }

    fn riff_record(form: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes
            .write_u32::<LittleEndian>((body.len() + 4) as u32)
            .unwrap();
        bytes.extend_from_slice(form);
        bytes.extend_from_slice(body);
        bytes
    }

    #[test]
    fn test_carves_records_in_name_order() {
        let mut blob = vec![0xFFu8; 7];
        blob.extend(rw_record(CLUMP_TYPE_ID, &[0xAA; 20]));
        blob.extend([0xEE, 0xEE, 0xEE]);
        blob.extend(rw_record(CLUMP_TYPE_ID, &[0xBB; 30]));

        let dir = tempfile::tempdir().unwrap();
        let mut feed = NameFeed::single(vec!["a.dff".into(), "b.dff".into()]);
        let report = Carver::new(Marker::RwChunk(CLUMP_TYPE_ID))
            .carve_slice(&blob, &mut feed, dir.path())
            .unwrap();

        assert_eq!(report.carved, 2);
        assert_eq!(report.errors, 0);
        assert_eq!(report.names_used, 2);

        let a = std::fs::read(dir.path().join("a.dff")).unwrap();
        let b = std::fs::read(dir.path().join("b.dff")).unwrap();
        assert_eq!(a.len(), 32);
        assert_eq!(a[12..], [0xAA; 20]);
        assert_eq!(b.len(), 42);
        assert_eq!(b[12..], [0xBB; 30]);
    }

    #[test]
    fn test_embedded_magic_is_not_rescanned() {
        // The first record's payload contains a byte run identical to
        // the marker. Jumping the cursor past the record must hide it.
        let mut inner = vec![0u8; 4];
        inner.extend(CLUMP_TYPE_ID.to_le_bytes());
        inner.extend([0x01, 0x00, 0x00, 0x00]);
        inner.extend([0x55; 8]);
        let mut blob = rw_record(CLUMP_TYPE_ID, &inner);
        blob.extend(rw_record(CLUMP_TYPE_ID, &[0xCC; 4]));

        let dir = tempfile::tempdir().unwrap();
        let mut feed = NameFeed::single(vec!["a.dff".into(), "b.dff".into()]);
        let report = Carver::new(Marker::RwChunk(CLUMP_TYPE_ID))
            .carve_slice(&blob, &mut feed, dir.path())
            .unwrap();

        assert_eq!(report.carved, 2);
        let b = std::fs::read(dir.path().join("b.dff")).unwrap();
        assert_eq!(b[12..], [0xCC; 4]);
    }

    #[test]
    fn test_zero_length_marker_hit_advances_one_byte() {
        let mut blob = Vec::new();
        blob.extend(CLUMP_TYPE_ID.to_le_bytes());
        blob.extend([0u8; 8]);
        blob.extend(rw_record(CLUMP_TYPE_ID, &[0xDD; 6]));

        let dir = tempfile::tempdir().unwrap();
        let mut feed = NameFeed::single(vec!["real.dff".into()]);
        let report = Carver::new(Marker::RwChunk(CLUMP_TYPE_ID))
            .carve_slice(&blob, &mut feed, dir.path())
            .unwrap();

        assert_eq!(report.errors, 1);
        assert_eq!(report.carved, 1);
        let real = std::fs::read(dir.path().join("real.dff")).unwrap();
        assert_eq!(real[12..], [0xDD; 6]);
    }

    #[test]
    fn test_declared_length_clamped_to_end_of_input() {
        let mut blob = rw_record(ANIMATION_TYPE_ID, &[0x11; 16]);
        // Inflate the declared body size past the blob end.
        blob[4..8].copy_from_slice(&1000u32.to_le_bytes());

        let dir = tempfile::tempdir().unwrap();
        let mut feed = NameFeed::single(vec!["short.ame".into()]);
        let report = Carver::new(Marker::RwChunk(ANIMATION_TYPE_ID))
            .carve_slice(&blob, &mut feed, dir.path())
            .unwrap();

        assert_eq!(report.adjusted, 1);
        assert_eq!(report.carved, 1);
        assert_eq!(report.errors, 0);
        let out = std::fs::read(dir.path().join("short.ame")).unwrap();
        assert_eq!(out.len(), 28);
    }

    #[test]
    fn test_riff_form_types_route_to_partitions() {
        let mut blob = riff_record(b"WAVE", &[0x01; 10]);
        blob.extend(riff_record(b"DMSG", &[0x02; 6]));
        blob.extend(riff_record(b"WAVE", &[0x03; 4]));

        let dir = tempfile::tempdir().unwrap();
        let names = vec![
            "0_0_1.wav".to_string(),
            "0_0_1.sgt".to_string(),
            "0_0_2.wav".to_string(),
        ];
        let mut feed = NameFeed::partitioned(names, &["wav", "sgt"]);
        let report = Carver::new(Marker::Riff)
            .carve_slice(&blob, &mut feed, dir.path())
            .unwrap();

        assert_eq!(report.carved, 3);
        let wav = std::fs::read(dir.path().join("0_0_2.wav")).unwrap();
        assert_eq!(wav[12..], [0x03; 4]);
        let sgt = std::fs::read(dir.path().join("0_0_1.sgt")).unwrap();
        assert_eq!(sgt[12..], [0x02; 6]);
    }

    #[test]
    fn test_unrouted_riff_form_skips_whole_record() {
        let mut blob = riff_record(b"AVI ", &[0x0A; 8]);
        blob.extend(riff_record(b"WAVE", &[0x0B; 8]));

        let dir = tempfile::tempdir().unwrap();
        let mut feed = NameFeed::partitioned(vec!["0_0_1.wav".to_string()], &["wav", "sgt"]);
        let report = Carver::new(Marker::Riff)
            .carve_slice(&blob, &mut feed, dir.path())
            .unwrap();

        assert_eq!(report.carved, 1);
        assert_eq!(report.names_used, 1);
        let wav = std::fs::read(dir.path().join("0_0_1.wav")).unwrap();
        assert_eq!(wav[12..], [0x0B; 8]);
    }

    #[test]
    fn test_name_exhaustion_stops_scan_and_keeps_output() {
        let mut blob = rw_record(CLUMP_TYPE_ID, &[0x21; 4]);
        blob.extend(rw_record(CLUMP_TYPE_ID, &[0x22; 4]));

        let dir = tempfile::tempdir().unwrap();
        let mut feed = NameFeed::single(vec!["only.dff".into()]);
        let report = Carver::new(Marker::RwChunk(CLUMP_TYPE_ID))
            .carve_slice(&blob, &mut feed, dir.path())
            .unwrap();

        assert_eq!(report.carved, 1);
        assert!(report.exhausted);
        assert!(dir.path().join("only.dff").exists());
    }

    #[test]
    fn test_riff_surplus_records_exhaust_one_partition() {
        // Three WAVE records but only one wav name: the first is
        // carved, the surplus stops the scan, nothing is overwritten.
        let mut blob = riff_record(b"WAVE", &[0x31; 4]);
        blob.extend(riff_record(b"WAVE", &[0x32; 4]));
        blob.extend(riff_record(b"WAVE", &[0x33; 4]));

        let dir = tempfile::tempdir().unwrap();
        let mut feed = NameFeed::partitioned(vec!["0_0_1.wav".to_string()], &["wav", "sgt"]);
        let report = Carver::new(Marker::Riff)
            .carve_slice(&blob, &mut feed, dir.path())
            .unwrap();

        assert_eq!(report.carved, 1);
        assert!(report.exhausted);
        assert_eq!(report.names_used, 1);
        let wav = std::fs::read(dir.path().join("0_0_1.wav")).unwrap();
        assert_eq!(wav[12..], [0x31; 4]);
    }

    #[test]
    fn test_carving_twice_yields_identical_output() {
        let mut blob = vec![0x00u8; 5];
        blob.extend(rw_record(CLUMP_TYPE_ID, &[0x41; 24]));
        blob.extend(rw_record(CLUMP_TYPE_ID, &[0x42; 12]));
        let names = vec!["a.dff".to_string(), "b.dff".to_string()];
        let carver = Carver::new(Marker::RwChunk(CLUMP_TYPE_ID));

        let first = tempfile::tempdir().unwrap();
        let mut first_feed = NameFeed::single(names.clone());
        carver
            .carve_slice(&blob, &mut first_feed, first.path())
            .unwrap();

        let second = tempfile::tempdir().unwrap();
        let mut second_feed = NameFeed::single(names.clone());
        carver
            .carve_slice(&blob, &mut second_feed, second.path())
            .unwrap();

        for name in &names {
            let a = std::fs::read(first.path().join(name)).unwrap();
            let b = std::fs::read(second.path().join(name)).unwrap();
            assert_eq!(a, b, "{name}");
        }
    }

    #[test]
    fn test_truncated_header_at_end_of_input() {
        let mut blob = vec![0xFFu8; 3];
        blob.extend(CLUMP_TYPE_ID.to_le_bytes());
        blob.extend([0x10, 0x00]);

        let dir = tempfile::tempdir().unwrap();
        let mut feed = NameFeed::single(vec!["never.dff".into()]);
        let report = Carver::new(Marker::RwChunk(CLUMP_TYPE_ID))
            .carve_slice(&blob, &mut feed, dir.path())
            .unwrap();

        assert_eq!(report.carved, 0);
        assert_eq!(report.errors, 1);
        assert!(!dir.path().join("never.dff").exists());
    }
}
