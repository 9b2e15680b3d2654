//! Page text store: streaming reader for MediaWiki XML exports.

use crate::domain::Namespace;
use crate::error::{FilterError, Result};
use crate::progress::{ProgressSink, Stage, REPORT_INTERVAL};
use crate::store::records::ScanStats;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageText {
    pub title: String,
    pub ns: Option<Namespace>,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Ns,
    Text,
}

pub struct PageDump {
    path: PathBuf,
}

impl PageDump {
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf() }
    }

    pub fn for_each_page(
        &self,
        visit: &mut dyn FnMut(PageText),
        progress: &dyn ProgressSink,
    ) -> Result<ScanStats> {
        let file = File::open(&self.path)?;
        read_pages(BufReader::new(file), visit, progress).map_err(|reason| FilterError::PageDump {
            path: self.path.display().to_string(),
            reason,
        })
    }
}

/// Walk `<page>` elements, handing each complete page to `visit`.
///
/// Only `<title>`, `<ns>` and `<text>` are collected; everything else in the
/// export is ignored. A page without a title is counted as skipped.
pub fn read_pages<R: BufRead>(
    source: R,
    visit: &mut dyn FnMut(PageText),
    progress: &dyn ProgressSink,
) -> std::result::Result<ScanStats, String> {
    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::new();
    let mut stats = ScanStats::default();
    let mut page: Option<PageText> = None;
    let mut field: Option<Field> = None;
    let mut title_seen = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Err(err) => return Err(format!("at byte {}: {}", reader.buffer_position(), err)),
            Ok(Event::Start(start)) => match start.local_name().as_ref() {
                b"page" => {
                    page = Some(PageText::default());
                    title_seen = false;
                }
                b"title" if page.is_some() => {
                    field = Some(Field::Title);
                    title_seen = true;
                }
                b"ns" if page.is_some() => field = Some(Field::Ns),
                b"text" if page.is_some() => field = Some(Field::Text),
                _ => {}
            },
            Ok(Event::Text(text)) => {
                if let (Some(current), Some(target)) = (page.as_mut(), field) {
                    let value = text.unescape().map_err(|err| err.to_string())?;
                    append(current, target, &value);
                }
            }
            Ok(Event::CData(data)) => {
                if let (Some(current), Some(target)) = (page.as_mut(), field) {
                    let raw = data.into_inner();
                    append(current, target, &String::from_utf8_lossy(&raw));
                }
            }
            Ok(Event::End(end)) => match end.local_name().as_ref() {
                b"page" => {
                    if let Some(done) = page.take() {
                        if title_seen && !done.title.is_empty() {
                            stats.records += 1;
                            visit(done);
                            if stats.records % REPORT_INTERVAL == 0 {
                                progress.advance(Stage::Pages, stats.records);
                            }
                        } else {
                            stats.skipped += 1;
                        }
                    }
                    field = None;
                }
                b"title" | b"ns" | b"text" => field = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            _ => {}
        }
        buf.clear();
    }

    if page.is_some() {
        stats.skipped += 1;
        tracing::warn!("page dump ended inside an unterminated <page>");
    }
    Ok(stats)
}

fn append(page: &mut PageText, field: Field, value: &str) {
    match field {
        Field::Title => page.title.push_str(value),
        Field::Text => page.text.push_str(value),
        Field::Ns => page.ns = value.parse().ok(),
    }
}
