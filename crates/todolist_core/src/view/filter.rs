//! Record predicates.

use crate::model::record::Record;

/// Single capability: decide whether a record belongs in a derived list.
///
/// Implemented for every `Fn(&Record) -> bool`, so closures work directly.
pub trait RecordFilter {
    fn pass(&self, record: &Record) -> bool;
}

impl<F> RecordFilter for F
where
    F: Fn(&Record) -> bool,
{
    fn pass(&self, record: &Record) -> bool {
        self(record)
    }
}

/// Records shown on the primary list: everything not archived.
pub fn active() -> impl RecordFilter + Copy {
    |record: &Record| !record.is_archived()
}

/// Records shown on the archive list.
pub fn archived() -> impl RecordFilter + Copy {
    |record: &Record| record.is_archived()
}

/// Passes every record.
pub fn everything() -> impl RecordFilter + Copy {
    |_: &Record| true
}
