//! The wire format shared by workers and the collector.

use core::fmt;

/// One discovered prime, tagged with the identity of the worker that found
/// it.
///
/// Records are immutable: a worker creates one per discovery, appends it to
/// its process's output channel, and never touches it again. On disk a record
/// is one comma-separated line, `process_id,thread_id,value`, with no header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimeRecord {
    pub process_id: u64,
    pub thread_id: u64,
    pub value: u64,
}

impl PrimeRecord {
    pub const fn new(process_id: u64, thread_id: u64, value: u64) -> Self {
        Self {
            process_id,
            thread_id,
            value,
        }
    }

    /// Parses one channel line.
    ///
    /// The caller supplies file/line context; this only reports the reason.
    pub(crate) fn parse_line(line: &str) -> core::result::Result<Self, String> {
        let mut fields = line.split(',');
        let mut next = |name: &str| {
            fields
                .next()
                .ok_or_else(|| format!("missing {name} field"))?
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("invalid {name} field: {e}"))
        };
        let process_id = next("process_id")?;
        let thread_id = next("thread_id")?;
        let value = next("value")?;
        if fields.next().is_some() {
            return Err("expected exactly 3 fields".into());
        }
        Ok(Self {
            process_id,
            thread_id,
            value,
        })
    }
}

impl fmt::Display for PrimeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.process_id, self.thread_id, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_then_parse_round_trips() {
        let record = PrimeRecord::new(3, 1, 104_729);
        assert_eq!(record.to_string(), "3,1,104729");
        assert_eq!(PrimeRecord::parse_line("3,1,104729"), Ok(record));
    }

    #[test]
    fn rejects_wrong_field_counts() {
        assert!(PrimeRecord::parse_line("1,2").is_err());
        assert!(PrimeRecord::parse_line("1,2,3,4").is_err());
        assert!(PrimeRecord::parse_line("").is_err());
    }

    #[test]
    fn rejects_non_numeric_fields() {
        assert!(PrimeRecord::parse_line("a,2,3").is_err());
        assert!(PrimeRecord::parse_line("1,2,-3").is_err());
    }
}
