//! Target-name normalization and the alias table.
//!
//! Archive exports spell the same star many ways (HATP11, HAT-P-11,
//! Hat-P-11A). Lookups normalize both sides into the archive's canonical
//! spelling before matching.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

/// Normalize a target name into the archive's standard spelling.
pub fn normalize_name(target: &str) -> String {
    let mut name = target.split_whitespace().collect::<Vec<_>>().join(" ");

    // Case fixes
    name = name.replace("KEPLER", "Kepler");
    name = name.replace("TRES", "TrES");
    name = name.replace("WOLF-", "Wolf ");
    name = name.replace("HATP", "HAT-P-");
    name = name.replace("AU-MIC", "AU Mic");
    name = name.replace("GL", "GJ");

    // Catalog prefixes: "HD-189733" and "HD189733" both become "HD 189733"
    const PREFIXES: [&str; 11] = [
        "L", "G", "HD", "GJ", "LTT", "LHS", "HIP", "WD", "LP", "2MASS", "PSR",
    ];
    for prefix in PREFIXES {
        let plen = prefix.len();
        if !name.starts_with(prefix) {
            continue;
        }
        let next = name.as_bytes().get(plen).copied();
        if matches!(next, Some(c) if !c.is_ascii_alphabetic()) {
            name = name.replace(&format!("{}-", prefix), &format!("{} ", prefix));
            if name.as_bytes().get(plen).copied() != Some(b' ') {
                name = format!("{} {}", prefix, &name[plen..]);
            }
        }
    }

    // Durchmusterung designations keep their zone sign: "BD+05-4868" ->
    // "BD+05 4868"
    for prefix in ["CD-", "BD-", "BD+"] {
        if !name.starts_with(prefix) {
            continue;
        }
        if let Some(dash) = name[prefix.len()..].find('-') {
            let dash = dash + prefix.len();
            name = format!("{} {}", &name[..dash], &name[dash + 1..]);
        }
    }

    // Main component of a binary gets a spaced suffix
    if name.ends_with('A') && name.len() >= 2 && !name.as_bytes()[name.len() - 2].is_ascii_whitespace()
    {
        name = format!("{} A", &name[..name.len() - 1]);
    }

    // Custom corrections seen in the observation lists
    if name == "55CNC" || name == "RHO01-CNC" {
        name = "55 Cnc".to_string();
    }
    name = name.replace("-offset", "");
    name = name.replace("-updated", "");
    if name.ends_with('-') {
        name.pop();
    }
    if name == "WD 1856" {
        name = "WD 1856+534".to_string();
    }
    if name.contains("V1298") {
        name = "V1298 Tau".to_string();
    }
    name
}

/// Name ends with a blank plus a lower-case letter: a confirmed planet.
pub fn is_letter(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 2
        && bytes[bytes.len() - 1].is_ascii_lowercase()
        && bytes[bytes.len() - 2] == b' '
}

/// Name ends with a dot plus two digits: a survey candidate.
pub fn is_candidate(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 3
        && bytes[bytes.len() - 3] == b'.'
        && bytes[bytes.len() - 2].is_ascii_digit()
        && bytes[bytes.len() - 1].is_ascii_digit()
}

/// Host-star part of a planet or candidate name.
pub fn host_of(name: &str) -> &str {
    if is_letter(name) {
        return &name[..name.len() - 2];
    }
    if is_candidate(name) {
        if let Some(idx) = name.rfind('.') {
            return &name[..idx];
        }
    }
    name
}

/// Parse the alias table: one `canonical:alias,alias` row per planet.
pub fn parse_aliases(text: &str) -> anyhow::Result<HashMap<String, String>> {
    let mut aliases = HashMap::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (name, tail) = line
            .split_once(':')
            .with_context(|| format!("alias row {} has no ':' separator: {:?}", idx + 1, raw))?;
        for alias in tail.split(',') {
            let alias = alias.trim();
            if !alias.is_empty() && alias != name {
                aliases.insert(alias.to_string(), name.to_string());
            }
        }
    }
    Ok(aliases)
}

/// Load the alias table from a file.
pub fn load_aliases(path: &Path) -> anyhow::Result<HashMap<String, String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read alias file {}", path.display()))?;
    parse_aliases(&text)
}

/// Invert an alias->name map into name->aliases.
pub fn invert_aliases(aliases: &HashMap<String, String>) -> HashMap<String, Vec<String>> {
    let mut aka: HashMap<String, Vec<String>> = HashMap::new();
    for (alias, name) in aliases {
        aka.entry(name.clone()).or_default().push(alias.clone());
    }
    for names in aka.values_mut() {
        names.sort();
    }
    aka
}
