//! Per-run carving statistics.

use std::fmt;

/// What one carving run did. Per-record problems land here instead of
/// aborting the scan.
#[derive(Debug, Clone, Default)]
pub struct CarveReport {
    /// Records written to disk.
    pub carved: usize,
    /// Marker hits rejected or records that failed to write.
    pub errors: usize,
    /// Records whose declared length ran past the end of the input and
    /// were clamped.
    pub adjusted: usize,
    /// Filenames consumed from the feed.
    pub names_used: usize,
    /// Filenames the feed started with.
    pub names_total: usize,
    /// The scan stopped early because a name queue ran dry.
    pub exhausted: bool,
    /// Human-readable notes about individual records.
    pub notes: Vec<String>,
}

impl CarveReport {
    pub(crate) fn note(&mut self, offset: u64, message: impl Into<String>) {
        self.notes.push(format!("0x{offset:X}: {}", message.into()));
    }
}

impl fmt::Display for CarveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "carved {} file(s), {} error(s), {} adjusted, names used {}/{}",
            self.carved, self.errors, self.adjusted, self.names_used, self.names_total
        )?;
        if self.exhausted {
            write!(f, " (name list exhausted)")?;
        }
        Ok(())
    }
}
