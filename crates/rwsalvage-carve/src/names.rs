//! Filename recovery from metadata blobs.
//!
//! The side metadata blob of each archive pair lists original filenames
//! in archive order but stores no reliable per-file offsets. Filenames
//! are recovered by pattern match, kept in first-seen order, and handed
//! out strictly FIFO to the carving scanner: the positional pairing of
//! names and physical records is the only link between them.

use regex::bytes::Regex;

use crate::marker::{Marker, ANIMATION_TYPE_ID, CLUMP_TYPE_ID};
use crate::Result;

/// The asset families this pipeline recovers, each with its own
/// filename pattern and record marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFamily {
    /// 3D models (`NNN_NNN_NNNNN.dff`), carved on the Clump chunk.
    Model,
    /// Animations (`NNN_NNN_NNNNN_NNN.ame`), carved on the Animation
    /// chunk.
    Animation,
    /// Audio (`N_N_N.wav` / `.sgt`, variable widths), carved on RIFF
    /// headers and routed by form type.
    Sound,
}

impl AssetFamily {
    /// Byte-regex matching this family's filenames in a metadata blob.
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::Model => r"\d{3}_\d{3}_\d{5}\.dff",
            Self::Animation => r"\d{3}_\d{3}_\d{5}_\d{3}\.ame",
            Self::Sound => r"\d+_\d+_\d+\.(?:wav|sgt)",
        }
    }

    /// Record-start marker to scan the combined blob for.
    pub fn marker(&self) -> Marker {
        match self {
            Self::Model => Marker::RwChunk(CLUMP_TYPE_ID),
            Self::Animation => Marker::RwChunk(ANIMATION_TYPE_ID),
            Self::Sound => Marker::Riff,
        }
    }
}

/// Filenames recovered from one metadata blob, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct RecoveredNames {
    pub names: Vec<String>,
    /// Matches dropped because they were not clean ASCII.
    pub skipped: usize,
}

/// Scan a metadata blob for filenames of the given family.
///
/// Order is load-bearing: the scanner later zips these names
/// positionally against carved records.
pub fn recover_filenames(metadata: &[u8], family: AssetFamily) -> Result<RecoveredNames> {
    let pattern = Regex::new(family.pattern())?;
    let mut recovered = RecoveredNames::default();
    for found in pattern.find_iter(metadata) {
        match std::str::from_utf8(found.as_bytes()) {
            Ok(name) if name.is_ascii() => recovered.names.push(sanitize(name)),
            _ => recovered.skipped += 1,
        }
    }
    Ok(recovered)
}

/// Replace path separators and NULs so a recovered name can never
/// escape the output directory.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect()
}

/// An ordered filename list consumed front to back. A name handed out
/// and committed is never reused.
#[derive(Debug, Clone, Default)]
pub struct NameQueue {
    names: Vec<String>,
    next: usize,
}

impl NameQueue {
    pub fn new(names: Vec<String>) -> Self {
        Self { names, next: 0 }
    }

    /// The next unused name, if any. Does not consume it.
    pub fn peek(&self) -> Option<&str> {
        self.names.get(self.next).map(String::as_str)
    }

    /// Consume the name last returned by [`NameQueue::peek`].
    pub fn commit(&mut self) {
        self.next += 1;
    }

    pub fn used(&self) -> usize {
        self.next
    }

    pub fn total(&self) -> usize {
        self.names.len()
    }
}

/// The scanner's name supply: one queue for chunk-typed formats, one
/// queue per extension for RIFF form-type routing.
#[derive(Debug, Clone)]
pub struct NameFeed {
    partitions: Vec<(Option<String>, NameQueue)>,
}

impl NameFeed {
    /// A single undifferentiated queue.
    pub fn single(names: Vec<String>) -> Self {
        Self {
            partitions: vec![(None, NameQueue::new(names))],
        }
    }

    /// Split an ordered name list into per-extension queues, keeping
    /// relative order within each partition.
    pub fn partitioned(names: Vec<String>, extensions: &[&str]) -> Self {
        let mut partitions: Vec<(Option<String>, NameQueue)> = extensions
            .iter()
            .map(|ext| (Some((*ext).to_string()), NameQueue::default()))
            .collect();
        for name in names {
            let ext = name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
            if let Some((_, queue)) = partitions
                .iter_mut()
                .find(|(key, _)| key.as_deref() == Some(ext.as_str()))
            {
                queue.names.push(name);
            }
        }
        Self { partitions }
    }

    /// Build the feed the way the family's scanner expects it.
    pub fn for_family(names: Vec<String>, family: AssetFamily) -> Self {
        match family {
            AssetFamily::Sound => Self::partitioned(names, &["wav", "sgt"]),
            AssetFamily::Model | AssetFamily::Animation => Self::single(names),
        }
    }

    /// Whether a partition exists for this extension (`None` addresses
    /// the single undifferentiated queue).
    pub fn has_partition(&self, ext: Option<&str>) -> bool {
        self.find(ext).is_some()
    }

    /// Next unused name in the given partition, without consuming it.
    pub fn peek(&self, ext: Option<&str>) -> Option<&str> {
        self.find(ext)
            .and_then(|idx| self.partitions[idx].1.peek())
    }

    /// Consume the name last returned by [`NameFeed::peek`].
    pub fn commit(&mut self, ext: Option<&str>) {
        if let Some(idx) = self.find(ext) {
            self.partitions[idx].1.commit();
        }
    }

    pub fn used(&self) -> usize {
        self.partitions.iter().map(|(_, q)| q.used()).sum()
    }

    pub fn total(&self) -> usize {
        self.partitions.iter().map(|(_, q)| q.total()).sum()
    }

    fn find(&self, ext: Option<&str>) -> Option<usize> {
        match ext {
            None => (!self.partitions.is_empty()).then_some(0),
            Some(ext) => self
                .partitions
                .iter()
                .position(|(key, _)| key.as_deref() == Some(ext)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_names_in_first_seen_order() {
        let metadata =
            b"junk\x00\x01002_001_00017.dff\xFF\xFEgarbage000_000_00001.dff more 001_005_00003.dff";
        let recovered = recover_filenames(metadata, AssetFamily::Model).unwrap();
        assert_eq!(
            recovered.names,
            vec![
                "002_001_00017.dff",
                "000_000_00001.dff",
                "001_005_00003.dff"
            ]
        );
        assert_eq!(recovered.skipped, 0);
    }

    #[test]
    fn test_animation_pattern_requires_fourth_segment() {
        let metadata = b"000_000_00001.ame 000_000_00002_001.ame";
        let recovered = recover_filenames(metadata, AssetFamily::Animation).unwrap();
        assert_eq!(recovered.names, vec!["000_000_00002_001.ame"]);
    }

    #[test]
    fn test_sound_pattern_mixes_extensions() {
        let metadata = b"0_0_1.wav 100_011_00047.sgt 0_0_2.wav";
        let recovered = recover_filenames(metadata, AssetFamily::Sound).unwrap();
        assert_eq!(
            recovered.names,
            vec!["0_0_1.wav", "100_011_00047.sgt", "0_0_2.wav"]
        );
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("a/b\\c\0d.dff"), "a_b_c_d.dff");
    }

    #[test]
    fn test_queue_is_fifo_and_never_reuses() {
        let mut queue = NameQueue::new(vec!["a.dff".into(), "b.dff".into()]);
        assert_eq!(queue.peek(), Some("a.dff"));
        assert_eq!(queue.peek(), Some("a.dff"));
        queue.commit();
        assert_eq!(queue.peek(), Some("b.dff"));
        queue.commit();
        assert_eq!(queue.peek(), None);
        assert_eq!(queue.used(), 2);
    }

    #[test]
    fn test_partitioned_feed_preserves_relative_order() {
        let names = vec![
            "0_0_1.wav".to_string(),
            "0_0_1.sgt".to_string(),
            "0_0_2.wav".to_string(),
        ];
        let mut feed = NameFeed::partitioned(names, &["wav", "sgt"]);

        assert_eq!(feed.peek(Some("wav")), Some("0_0_1.wav"));
        feed.commit(Some("wav"));
        assert_eq!(feed.peek(Some("wav")), Some("0_0_2.wav"));
        assert_eq!(feed.peek(Some("sgt")), Some("0_0_1.sgt"));
        assert!(!feed.has_partition(Some("ogg")));
        assert_eq!(feed.total(), 3);
        assert_eq!(feed.used(), 1);
    }
}
