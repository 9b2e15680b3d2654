//! Pipe-delimited record parsing.
//!
//! Record files hold one record per line with `|` separated fields. Only the
//! last field may contain `|`; every earlier field is split off first.

use crate::domain::{CategoryLink, Namespace, PageId, RedirectEdge, Stub};
use crate::error::{FilterError, Result};
use crate::progress::{ProgressSink, Stage, REPORT_INTERVAL};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Malformed records logged individually per scan before going quiet.
const MAX_LOGGED_SKIPS: u64 = 5;

/// Counts from one pass over a record store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub records: u64,
    pub skipped: u64,
}

impl ScanStats {
    pub fn merge(&mut self, other: ScanStats) {
        self.records += other.records;
        self.skipped += other.skipped;
    }
}

pub fn parse_stub(line: &str) -> Result<Stub> {
    let mut fields = line.splitn(3, '|');
    let (Some(id), Some(ns), Some(title)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(malformed("stub", format!("expected 3 fields in {line:?}")));
    };
    Ok(Stub { id: parse_id("stub", id)?, ns: parse_ns("stub", ns)?, title: title.to_string() })
}

pub fn parse_category_link(line: &str) -> Result<CategoryLink> {
    let fields: Vec<&str> = line.splitn(5, '|').collect();
    let [cat_id, cat_title, page_id, page_ns, page_title] = fields.as_slice() else {
        return Err(malformed("category", format!("expected 5 fields in {line:?}")));
    };
    Ok(CategoryLink {
        cat_id: parse_id("category", cat_id)?,
        cat_title: (*cat_title).to_string(),
        page_id: parse_id("category", page_id)?,
        page_ns: parse_ns("category", page_ns)?,
        page_title: (*page_title).to_string(),
    })
}

/// Accepts both the namespace-qualified 6-field and the 4-field layouts. A
/// line is read as 6 fields only when both namespace fields are numeric, so
/// a 4-field destination title containing `|` still parses.
pub fn parse_redirect(line: &str) -> Result<RedirectEdge> {
    let fields: Vec<&str> = line.splitn(6, '|').collect();
    if let [src_id, src_ns, src_title, dst_id, dst_ns, dst_title] = fields.as_slice() {
        if let (Ok(src_ns), Ok(dst_ns)) = (src_ns.parse::<Namespace>(), dst_ns.parse::<Namespace>()) {
            return Ok(RedirectEdge {
                src_id: parse_id("redirect", src_id)?,
                src_ns: Some(src_ns),
                src_title: (*src_title).to_string(),
                dst_id: parse_id("redirect", dst_id)?,
                dst_ns: Some(dst_ns),
                dst_title: (*dst_title).to_string(),
            });
        }
    }

    let fields: Vec<&str> = line.splitn(4, '|').collect();
    let [src_id, src_title, dst_id, dst_title] = fields.as_slice() else {
        return Err(malformed("redirect", format!("expected 4 or 6 fields in {line:?}")));
    };
    Ok(RedirectEdge {
        src_id: parse_id("redirect", src_id)?,
        src_ns: None,
        src_title: (*src_title).to_string(),
        dst_id: parse_id("redirect", dst_id)?,
        dst_ns: None,
        dst_title: (*dst_title).to_string(),
    })
}

/// Stream every record of `path` through `visit`, skipping malformed lines.
pub(crate) fn scan_file<T>(
    path: &Path,
    kind: &'static str,
    parse: fn(&str) -> Result<T>,
    visit: &mut dyn FnMut(&T),
    progress: Option<(&dyn ProgressSink, Stage)>,
) -> Result<ScanStats> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut stats = ScanStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        match parse(line) {
            Ok(record) => {
                stats.records += 1;
                visit(&record);
            }
            Err(err) => {
                stats.skipped += 1;
                if stats.skipped <= MAX_LOGGED_SKIPS {
                    tracing::debug!("{}:{}: skipping {} record: {}", path.display(), index + 1, kind, err);
                }
            }
        }
        if let Some((sink, stage)) = progress {
            if stats.records % REPORT_INTERVAL == 0 && stats.records > 0 {
                sink.advance(stage, stats.records);
            }
        }
    }

    if stats.skipped > 0 {
        tracing::warn!("{}: skipped {} malformed {} record(s)", path.display(), stats.skipped, kind);
    }
    Ok(stats)
}

fn parse_id(kind: &'static str, raw: &str) -> Result<PageId> {
    raw.parse().map_err(|_| malformed(kind, format!("invalid page id {raw:?}")))
}

fn parse_ns(kind: &'static str, raw: &str) -> Result<Namespace> {
    raw.parse().map_err(|_| malformed(kind, format!("invalid namespace {raw:?}")))
}

fn malformed(kind: &'static str, reason: String) -> FilterError {
    FilterError::MalformedRecord { kind, reason }
}
