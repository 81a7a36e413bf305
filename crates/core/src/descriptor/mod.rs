//! Build descriptor (`CMakeLists.txt`) synthesis.
//!
//! The descriptor is a user-owned document with a handful of generated
//! regions. Each region is bounded by a BEGIN and an END marker:
//!
//! ```text
//! # GENERATED: SOURCES - DO NOT MODIFY - BEGIN
//! ...
//! # GENERATED: SOURCES - DO NOT MODIFY - END
//! ```
//!
//! `regenerate` indexes the marker spans once, then splices freshly rendered
//! text into each span. Bytes outside the spans are copied through untouched.
//! A region whose markers are missing or misspelled is left alone. Markers
//! only count when they sit on a line of their own.

mod render;
mod template;

use std::fmt;

use serde::Serialize;

use crate::selection::AggregateBuildInputs;

pub use render::render_region;
pub use template::{seed_document, DEFAULT_TEMPLATE};

/// Named regions the synthesizer owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    Sources,
    Includes,
    Definitions,
    CustomDefinitions,
    CustomLinkerFlags,
    /// Spans both chipset branches: FT90X BEGIN through FT93X END.
    PrecompileLibs,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Sources,
        Region::Includes,
        Region::Definitions,
        Region::CustomDefinitions,
        Region::CustomLinkerFlags,
        Region::PrecompileLibs,
    ];

    /// Name carried by the BEGIN marker.
    pub fn begin_name(self) -> &'static str {
        match self {
            Region::Sources => "SOURCES",
            Region::Includes => "INCLUDES",
            Region::Definitions => "DEFINITIONS",
            Region::CustomDefinitions => "CUSTOM DEFINITIONS",
            Region::CustomLinkerFlags => "CUSTOM LINKER FLAGS",
            Region::PrecompileLibs => PRECOMPILE_FT90X,
        }
    }

    /// Name carried by the END marker; only differs for the paired region.
    pub fn end_name(self) -> &'static str {
        match self {
            Region::PrecompileLibs => PRECOMPILE_FT93X,
            other => other.begin_name(),
        }
    }

    pub fn begin_marker(self) -> String {
        begin_marker(self.begin_name())
    }

    pub fn end_marker(self) -> String {
        end_marker(self.end_name())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::PrecompileLibs => f.write_str("PRE-COMPILE LIBS"),
            other => f.write_str(other.begin_name()),
        }
    }
}

pub(crate) const PRECOMPILE_FT90X: &str = "PRE-COMPILE LIBS FT90X";
pub(crate) const PRECOMPILE_FT93X: &str = "PRE-COMPILE LIBS FT93X";

/// Leading text shared by every region marker.
pub const MARKER_PREFIX: &str = "# GENERATED:";

pub(crate) fn begin_marker(name: &str) -> String {
    format!("{MARKER_PREFIX} {name} - DO NOT MODIFY - BEGIN")
}

pub(crate) fn end_marker(name: &str) -> String {
    format!("{MARKER_PREFIX} {name} - DO NOT MODIFY - END")
}

/// Whether a user-supplied value can be emitted as one descriptor line
/// without being mistaken for a region marker.
pub fn is_verbatim_safe(value: &str) -> bool {
    !value.contains(['\n', '\r']) && !value.contains(MARKER_PREFIX)
}

/// Byte offset of `marker` on the first line at or after `from` that holds
/// nothing else but surrounding whitespace.
fn find_marker_line(text: &str, from: usize, marker: &str) -> Option<usize> {
    let mut offset = from;
    for line in text[from..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.trim_end() == marker {
            return Some(offset + (line.len() - trimmed.len()));
        }
        offset += line.len();
    }
    None
}

/// Byte range of one region, from the first byte of its BEGIN marker to the
/// last byte of its END marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionSpan {
    pub region: Region,
    pub start: usize,
    pub end: usize,
}

/// Region-indexed view over a descriptor document.
#[derive(Debug, Clone)]
pub struct DescriptorDocument<'a> {
    text: &'a str,
    spans: Vec<RegionSpan>,
}

impl<'a> DescriptorDocument<'a> {
    /// Locate every recognized region in `text`.
    ///
    /// The first BEGIN marker line of a region pairs with the first END marker
    /// line after it. Spans that overlap an earlier span are dropped.
    pub fn parse(text: &'a str) -> Self {
        let mut spans = Vec::new();
        for region in Region::ALL {
            let begin = region.begin_marker();
            let Some(start) = find_marker_line(text, 0, &begin) else {
                tracing::debug!(%region, "Region markers not found; leaving untouched");
                continue;
            };
            let end = region.end_marker();
            match find_marker_line(text, start + begin.len(), &end) {
                Some(end_start) => {
                    spans.push(RegionSpan { region, start, end: end_start + end.len() })
                }
                None => tracing::debug!(%region, "Region has no END marker; leaving untouched"),
            }
        }

        spans.sort_by_key(|span| span.start);
        let mut kept: Vec<RegionSpan> = Vec::with_capacity(spans.len());
        for span in spans {
            match kept.last() {
                Some(prev) if span.start < prev.end => {
                    tracing::debug!(
                        region = %span.region,
                        overlaps = %prev.region,
                        "Overlapping region skipped"
                    );
                }
                _ => kept.push(span),
            }
        }

        Self { text, spans: kept }
    }

    pub fn spans(&self) -> &[RegionSpan] {
        &self.spans
    }

    pub fn regions(&self) -> Vec<Region> {
        self.spans.iter().map(|span| span.region).collect()
    }

    pub fn contains(&self, region: Region) -> bool {
        self.spans.iter().any(|span| span.region == region)
    }

    /// Current text of a region, markers included.
    pub fn region_text(&self, region: Region) -> Option<&'a str> {
        self.spans
            .iter()
            .find(|span| span.region == region)
            .map(|span| &self.text[span.start..span.end])
    }

    /// Line terminator used when rendering into this document.
    pub fn line_ending(&self) -> &'static str {
        if self.text.contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    /// Rebuild the document, replacing each indexed span with `render(region)`.
    pub fn splice<F>(&self, mut render: F) -> String
    where
        F: FnMut(Region) -> String,
    {
        let mut out = String::with_capacity(self.text.len());
        let mut cursor = 0;
        for span in &self.spans {
            out.push_str(&self.text[cursor..span.start]);
            out.push_str(&render(span.region));
            cursor = span.end;
        }
        out.push_str(&self.text[cursor..]);
        out
    }
}

/// Rewrite every generated region of `document` from `inputs`.
///
/// Region content depends only on `inputs` (and the document's line ending),
/// so applying this twice with the same inputs is a no-op the second time.
pub fn regenerate(document: &str, inputs: &AggregateBuildInputs) -> String {
    let doc = DescriptorDocument::parse(document);
    let eol = doc.line_ending();
    let out = doc.splice(|region| render_region(region, inputs, eol));
    tracing::info!(regions = doc.spans().len(), "Regenerated build descriptor");
    out
}
