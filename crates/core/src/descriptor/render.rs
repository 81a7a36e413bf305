use crate::selection::AggregateBuildInputs;

use super::{
    begin_marker, end_marker, is_verbatim_safe, Region, PRECOMPILE_FT90X, PRECOMPILE_FT93X,
};

const INDENT: &str = "    ";
const LIB_INDENT: &str = "        ";

const HW_SOURCES: &str = "hw/src/*.c";
const HW_INCLUDES: &str = "hw/include";
const USB_SOURCES: &str = "usb/src/*.c";
const USB_INCLUDES: &str = "usb/include";
const DRIVER_SOURCES: &str = "drivers/*.c";
const DRIVER_INCLUDES: &str = "drivers";

const D2XX_STEM: &str = "d2xx";
const FT90X_PREFIX: &str = "ft900_";
const FT93X_PREFIX: &str = "ft930_";

/// Render the full replacement text for `region`, markers included.
///
/// The result starts at the BEGIN marker and ends right after the END
/// marker; whatever precedes BEGIN on its line belongs to the document.
pub fn render_region(region: Region, inputs: &AggregateBuildInputs, eol: &str) -> String {
    match region {
        Region::Sources => render_sources(inputs, eol),
        Region::Includes => render_includes(inputs, eol),
        Region::Definitions => render_blocks(
            region,
            &[Block::owned("# 3rd party libraries definitions", &inputs.third_party.definitions)],
            eol,
        ),
        Region::CustomDefinitions => {
            render_blocks(region, &[Block::verbatim(&inputs.custom_definitions)], eol)
        }
        Region::CustomLinkerFlags => {
            render_blocks(region, &[Block::verbatim(&inputs.custom_linker_flags)], eol)
        }
        Region::PrecompileLibs => render_precompile_libs(inputs, eol),
    }
}

struct Block<'a> {
    comment: Option<&'a str>,
    lines: Vec<&'a str>,
}

impl<'a> Block<'a> {
    fn fixed(comment: &'a str, line: &'a str) -> Self {
        Self { comment: Some(comment), lines: vec![line] }
    }

    fn owned(comment: &'a str, lines: &'a [String]) -> Self {
        Self { comment: Some(comment), lines: lines.iter().map(String::as_str).collect() }
    }

    /// User-supplied lines; any that could pose as a marker are dropped.
    fn verbatim(lines: &'a [String]) -> Self {
        let lines = lines
            .iter()
            .map(String::as_str)
            .filter(|line| {
                let safe = is_verbatim_safe(line);
                if !safe {
                    tracing::warn!(line, "Skipping custom entry that could break region markers");
                }
                safe
            })
            .collect();
        Self { comment: None, lines }
    }
}

fn render_sources(inputs: &AggregateBuildInputs, eol: &str) -> String {
    let mut blocks = Vec::new();
    if inputs.includes_hardware_libs {
        blocks.push(Block::fixed("# Hardware libraries sources", HW_SOURCES));
    }
    if inputs.includes_usb_libs {
        blocks.push(Block::fixed("# USB libraries sources", USB_SOURCES));
    }
    if inputs.includes_driver_libs {
        blocks.push(Block::fixed("# Driver libraries sources", DRIVER_SOURCES));
    }
    blocks.push(Block::owned("# 3rd party libraries sources", &inputs.third_party.source_paths));
    render_blocks(Region::Sources, &blocks, eol)
}

fn render_includes(inputs: &AggregateBuildInputs, eol: &str) -> String {
    let mut blocks = Vec::new();
    if inputs.includes_hardware_libs {
        blocks.push(Block::fixed("# Hardware libraries includes", HW_INCLUDES));
    }
    if inputs.includes_usb_libs {
        blocks.push(Block::fixed("# USB libraries includes", USB_INCLUDES));
    }
    if inputs.includes_driver_libs {
        blocks.push(Block::fixed("# Driver libraries includes", DRIVER_INCLUDES));
    }
    blocks.push(Block::owned("# 3rd party libraries includes", &inputs.third_party.include_paths));
    render_blocks(Region::Includes, &blocks, eol)
}

/// Empty blocks are skipped entirely, comment included.
fn render_blocks(region: Region, blocks: &[Block<'_>], eol: &str) -> String {
    let mut out = region.begin_marker();
    out.push_str(eol);
    for block in blocks.iter().filter(|b| !b.lines.is_empty()) {
        if let Some(comment) = block.comment {
            push_line(&mut out, INDENT, comment, eol);
        }
        for line in &block.lines {
            push_line(&mut out, INDENT, line, eol);
        }
    }
    out.push_str(INDENT);
    out.push_str(&region.end_marker());
    out
}

fn render_precompile_libs(inputs: &AggregateBuildInputs, eol: &str) -> String {
    let suffix = inputs.prebuilt_kind.target_suffix();

    let mut out = begin_marker(PRECOMPILE_FT90X);
    out.push_str(eol);
    if let Some(suffix) = suffix {
        push_line(&mut out, LIB_INDENT, &prebuilt_target(FT90X_PREFIX, suffix), eol);
    }
    push_line(&mut out, LIB_INDENT, &end_marker(PRECOMPILE_FT90X), eol);
    push_line(&mut out, INDENT, ")", eol);
    push_line(&mut out, "", "else (${TARGET} MATCHES ft93x)", eol);
    push_line(&mut out, INDENT, "set(LIB_FILES", eol);
    push_line(&mut out, LIB_INDENT, &begin_marker(PRECOMPILE_FT93X), eol);
    if let Some(suffix) = suffix {
        push_line(&mut out, LIB_INDENT, &prebuilt_target(FT93X_PREFIX, suffix), eol);
    }
    out.push_str(LIB_INDENT);
    out.push_str(&end_marker(PRECOMPILE_FT93X));
    out
}

/// `ft900_d2xx_dev`, `ft930_d2xx_dev_rtos`, ...
fn prebuilt_target(prefix: &str, suffix: &str) -> String {
    format!("{prefix}{D2XX_STEM}_{suffix}")
}

fn push_line(out: &mut String, indent: &str, line: &str, eol: &str) {
    out.push_str(indent);
    out.push_str(line);
    out.push_str(eol);
}
