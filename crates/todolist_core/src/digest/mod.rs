//! Plain-text digest of a todo list, used for export/sharing.
//!
//! # Responsibility
//! - Render the records passing a filter as a fixed-format text block.
//!
//! # Invariants
//! - Output always starts with `DIGEST_HEADER` and ends with `DIGEST_FOOTER`.
//! - Entries keep source order and are separated by one blank line.
//! - An empty selection renders header and footer only.

use crate::model::record::Record;
use crate::view::filter::RecordFilter;

pub const DIGEST_HEADER: &str = "==== Todo List ====";
pub const DIGEST_FOOTER: &str = "===================";
const DONE_MARKER: &str = "[X]";
const OPEN_MARKER: &str = "[ ]";
const ARCHIVED_SUFFIX: &str = " (archived)";
const BODY_INDENT: &str = "    ";

/// Builder for the text digest.
///
/// Defaults to passing every record of the source.
pub struct DigestBuilder<'a> {
    source: &'a [Record],
    filter: Box<dyn RecordFilter + 'a>,
}

impl<'a> DigestBuilder<'a> {
    pub fn new(source: &'a [Record]) -> Self {
        Self {
            source,
            filter: Box::new(|_: &Record| true),
        }
    }

    pub fn source(mut self, source: &'a [Record]) -> Self {
        self.source = source;
        self
    }

    pub fn filter(mut self, filter: impl RecordFilter + 'a) -> Self {
        self.filter = Box::new(filter);
        self
    }

    /// Export option: archived records are included only when asked for.
    pub fn include_archived(self, include: bool) -> Self {
        self.filter(move |record: &Record| include || !record.is_archived())
    }

    pub fn build(&self) -> String {
        let entries = self
            .source
            .iter()
            .filter(|record| self.filter.pass(record))
            .map(render_entry)
            .collect::<Vec<_>>();

        let mut digest = String::new();
        digest.push_str(DIGEST_HEADER);
        digest.push_str("\n\n");
        if !entries.is_empty() {
            digest.push_str(&entries.join("\n"));
        }
        digest.push_str(DIGEST_FOOTER);
        digest.push('\n');
        digest
    }
}

fn render_entry(record: &Record) -> String {
    let marker = if record.is_done() {
        DONE_MARKER
    } else {
        OPEN_MARKER
    };
    let mut entry = format!("{marker} {}", record.title());
    if record.is_archived() {
        entry.push_str(ARCHIVED_SUFFIX);
    }
    entry.push('\n');

    if record.body().is_empty() {
        entry.push_str(BODY_INDENT);
        entry.push('\n');
    }
    for line in record.body().lines() {
        entry.push_str(BODY_INDENT);
        entry.push_str(line);
        entry.push('\n');
    }
    entry
}
