use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One entry from `objdump -t`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Address as printed by the tool (hex, no prefix).
    pub address: String,
    /// Linkage flag: `l`, `g`, `u` or `!`. `None` when the column is blank.
    pub flag: Option<char>,
    /// Type flag, e.g. `F` (function), `O` (object), `d` (debug).
    #[serde(rename = "type")]
    pub symbol_type: Option<char>,
    pub section: String,
    pub size: u64,
    pub hidden: bool,
    pub name: String,
}

impl Symbol {
    /// Numeric value of `address`.
    pub fn address_value(&self) -> u64 {
        u64::from_str_radix(&self.address, 16).unwrap_or(0)
    }
}

/// Symbols of one binary grouped by section, each group sorted by address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    pub binary_file: String,
    pub sections: BTreeMap<String, Vec<Symbol>>,
}

impl SymbolTable {
    pub fn symbol_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn section(&self, name: &str) -> Option<&[Symbol]> {
        self.sections.get(name).map(Vec::as_slice)
    }

    /// Up to `limit` symbols across all sections, largest first.
    ///
    /// Equal sizes keep section-then-address order.
    pub fn largest(&self, limit: usize) -> Vec<&Symbol> {
        let mut all: Vec<&Symbol> = self.sections.values().flatten().collect();
        all.sort_by(|a, b| b.size.cmp(&a.size));
        all.truncate(limit);
        all
    }
}

// address, linkage flag?, type flag?, section, size, ".hidden"?, name
static SYMBOL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([0-9a-fA-F]+)\s+([lgu! ]?)\s+([wCWIiDdFfO ]?)\s+(\S+)\s+([0-9a-fA-F]+)\s*(\.hidden\s+)?(\S+)",
    )
    .expect("symbol line regex compiles")
});

/// Parse `objdump -t` output for `binary_file`.
///
/// Lines that do not look like symbol entries (banner, `SYMBOL TABLE:`
/// header, blank lines) are skipped.
pub fn parse_symbol_table(binary_file: &str, output: &str) -> SymbolTable {
    let mut sections: BTreeMap<String, Vec<Symbol>> = BTreeMap::new();
    let mut skipped = 0usize;

    for line in output.lines() {
        match parse_symbol_line(line) {
            Some(symbol) => sections.entry(symbol.section.clone()).or_default().push(symbol),
            None => skipped += 1,
        }
    }

    for symbols in sections.values_mut() {
        // sort_by_key is stable: equal addresses keep emission order.
        symbols.sort_by_key(Symbol::address_value);
    }

    tracing::debug!(binary = binary_file, sections = sections.len(), skipped, "Parsed symbol table");
    SymbolTable { binary_file: binary_file.to_string(), sections }
}

fn parse_symbol_line(line: &str) -> Option<Symbol> {
    let caps = SYMBOL_LINE.captures(line)?;
    // Overlong hex fields are treated like any other non-matching line.
    u64::from_str_radix(&caps[1], 16).ok()?;
    let size = u64::from_str_radix(&caps[5], 16).ok()?;

    Some(Symbol {
        address: caps[1].to_string(),
        flag: flag_char(&caps[2]),
        symbol_type: flag_char(&caps[3]),
        section: caps[4].to_string(),
        size,
        hidden: caps.get(6).is_some(),
        name: caps[7].to_string(),
    })
}

fn flag_char(raw: &str) -> Option<char> {
    raw.chars().next().filter(|c| !c.is_whitespace())
}
