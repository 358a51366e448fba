//! Star name table parsing.
//!
//! The name table is plain text with one entry per line:
//!
//! ```text
//! 32349:Sirius:Canicula
//! 91262:Vega
//! ```
//!
//! The first `:`-separated field is the HIP id, every following non-empty
//! field is a name for that star. Surrounding whitespace is trimmed from the
//! line and from each field; blank lines and `#` comments are ignored.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::record::StarRecord;

/// Counters collected while resolving a name table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Lines that named a loaded star.
    pub entries: usize,
    /// Names attached to loaded stars.
    pub names: usize,
    /// Lines skipped because their id is not in the star set.
    pub unknown_ids: usize,
    /// Lines with an unparsable id or no names.
    pub malformed: usize,
    /// Names that already pointed at a different star and were moved.
    pub reassigned: usize,
}

/// Name indices built by [`resolve_names`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameIndex {
    pub hip_by_name: HashMap<String, u32>,
    pub names_by_hip: HashMap<u32, Vec<String>>,
    pub stats: ResolveStats,
}

/// Resolve a name table against a star set.
///
/// Entries for ids missing from `stars_by_hip` are skipped. On duplicate
/// names the last entry wins in `hip_by_name`; `names_by_hip` keeps every
/// name that mapped to an id, in table order.
pub fn resolve_names(text: &str, stars_by_hip: &HashMap<u32, StarRecord>) -> NameIndex {
    let mut hip_by_name = HashMap::new();
    let mut names_by_hip = HashMap::new();
    let stats = resolve_into(text, stars_by_hip, &mut hip_by_name, &mut names_by_hip);
    NameIndex {
        hip_by_name,
        names_by_hip,
        stats,
    }
}

pub(crate) fn resolve_into(
    text: &str,
    stars_by_hip: &HashMap<u32, StarRecord>,
    hip_by_name: &mut HashMap<String, u32>,
    names_by_hip: &mut HashMap<u32, Vec<String>>,
) -> ResolveStats {
    let mut stats = ResolveStats::default();

    for (line_num, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((hip, names)) = parse_line(line) else {
            debug!(line = line_num + 1, "Skipping malformed name entry");
            stats.malformed += 1;
            continue;
        };

        if !stars_by_hip.contains_key(&hip) {
            stats.unknown_ids += 1;
            continue;
        }

        stats.entries += 1;
        let aliases = names_by_hip.entry(hip).or_default();
        for name in names {
            if let Some(previous) = hip_by_name.insert(name.to_string(), hip) {
                if previous != hip {
                    stats.reassigned += 1;
                }
            }
            if !aliases.iter().any(|n| n == name) {
                aliases.push(name.to_string());
            }
            stats.names += 1;
        }
    }

    debug!(
        entries = stats.entries,
        names = stats.names,
        unknown_ids = stats.unknown_ids,
        malformed = stats.malformed,
        "Resolved star names"
    );
    stats
}

fn parse_line(line: &str) -> Option<(u32, Vec<&str>)> {
    let mut fields = line.split(':');
    let hip: u32 = fields.next()?.trim().parse().ok()?;
    let names: Vec<&str> = fields.map(str::trim).filter(|n| !n.is_empty()).collect();
    if names.is_empty() {
        return None;
    }
    Some((hip, names))
}

/// Write `names_by_hip` back in name table form, ids ascending.
///
/// Names that would not read back unchanged (empty, containing `:` or a line
/// break, or with surrounding whitespace) are skipped with a warning. A star
/// left with no writable names gets no line.
pub fn format_names(names_by_hip: &HashMap<u32, Vec<String>>) -> String {
    let mut ids: Vec<u32> = names_by_hip.keys().copied().collect();
    ids.sort_unstable();

    let mut out = String::new();
    for hip in ids {
        let mut line = hip.to_string();
        for name in &names_by_hip[&hip] {
            if !is_writable(name) {
                warn!(hip, name = %name, "Skipping name that cannot be written to a name table");
                continue;
            }
            line.push(':');
            line.push_str(name);
        }
        if line.contains(':') {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

fn is_writable(name: &str) -> bool {
    !name.is_empty() && name.trim() == name && !name.contains([':', '\n', '\r'])
}
