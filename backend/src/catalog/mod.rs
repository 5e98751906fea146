//! Bundled target catalog: parsing, alias resolution, and lookup.
//!
//! The catalog is loaded once from the plain-text files shipped under
//! `data/` and then serves name/alias lookups for the resolver.

pub mod aliases;
pub mod parser;
pub mod programs;

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

use crate::archive::ArchiveError;
use crate::models::Target;
use aliases::{host_of, invert_aliases, normalize_name};

/// In-memory catalog with canonical-name and alias indices.
pub struct Catalog {
    targets: Vec<Target>,
    by_name: HashMap<String, usize>,
    by_alias: HashMap<String, Vec<usize>>,
}

fn index_key(name: &str) -> String {
    normalize_name(name).to_lowercase()
}

impl Catalog {
    /// Load the catalog files from a data directory: `nea_data.txt`,
    /// `nea_aliases.txt`, and `jwst_programs.csv`.
    pub fn load(data_dir: &Path) -> anyhow::Result<Self> {
        let mut targets = parser::load_targets(&data_dir.join("nea_data.txt"))?;

        let alias_map = aliases::load_aliases(&data_dir.join("nea_aliases.txt"))?;
        let aka = invert_aliases(&alias_map);
        for target in &mut targets {
            if let Some(names) = aka.get(&target.name) {
                target.aliases = names.clone();
            }
        }

        let programs = programs::load_programs(&data_dir.join("jwst_programs.csv"))
            .context("Failed to load JWST program table")?;
        let jwst_hosts = programs::jwst_hosts(&programs);
        for target in &mut targets {
            let mut host_names = vec![normalize_name(&target.host)];
            host_names.extend(target.aliases.iter().map(|a| normalize_name(host_of(a))));
            target.has_jwst_observations =
                target.is_transiting() && host_names.iter().any(|h| jwst_hosts.contains(h));
        }

        log::info!(
            "loaded catalog: {} planets, {} aliases, {} JWST hosts",
            targets.len(),
            alias_map.len(),
            jwst_hosts.len(),
        );
        Ok(Self::from_targets(targets))
    }

    /// Build a catalog from already-populated targets (aliases attached).
    pub fn from_targets(targets: Vec<Target>) -> Self {
        let mut by_name = HashMap::new();
        let mut by_alias: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, target) in targets.iter().enumerate() {
            by_name.insert(index_key(&target.name), idx);
            for alias in &target.aliases {
                let entry = by_alias.entry(index_key(alias)).or_default();
                if !entry.contains(&idx) {
                    entry.push(idx);
                }
            }
        }
        Self {
            targets,
            by_name,
            by_alias,
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// All canonical planet names, in catalog order.
    pub fn planet_names(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.name.as_str())
    }

    /// Look up a target by canonical name or alias.
    ///
    /// Canonical names win outright; an alias that fans out to more than
    /// one planet is ambiguous and the caller must disambiguate.
    pub fn lookup(&self, name: &str) -> Result<&Target, ArchiveError> {
        let key = index_key(name);
        if let Some(&idx) = self.by_name.get(&key) {
            return Ok(&self.targets[idx]);
        }
        match self.by_alias.get(&key) {
            None => Err(ArchiveError::NotFound(name.to_string())),
            Some(indices) if indices.len() == 1 => Ok(&self.targets[indices[0]]),
            Some(indices) => Err(ArchiveError::Ambiguous {
                name: name.to_string(),
                candidates: indices
                    .iter()
                    .map(|&idx| self.targets[idx].name.clone())
                    .collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(name: &str, host: &str, aliases: &[&str]) -> Target {
        Target {
            name: name.to_string(),
            host: host.to_string(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            ra: qtty::Degrees::new(0.0),
            dec: qtty::Degrees::new(0.0),
            ks_mag: Some(9.0),
            teff: Some(5000.0),
            logg_star: Some(4.5),
            metal_star: Some(0.0),
            rstar: Some(1.0),
            mstar: Some(1.0),
            rplanet: Some(10.0),
            mplanet: Some(100.0),
            transit_dur: Some(qtty::Hours::new(2.5)),
            period: Some(qtty::Days::new(3.0)),
            sma: Some(0.04),
            eq_temp: Some(1000.0),
            is_confirmed: true,
            has_jwst_observations: false,
        }
    }

    #[test]
    fn test_lookup_canonical_name() {
        let catalog = Catalog::from_targets(vec![target("WASP-39 b", "WASP-39", &[])]);
        assert_eq!(catalog.lookup("WASP-39 b").unwrap().name, "WASP-39 b");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = Catalog::from_targets(vec![target("WASP-39 b", "WASP-39", &[])]);
        assert!(catalog.lookup("wasp-39 B").is_ok());
    }

    #[test]
    fn test_lookup_normalizes_input() {
        let catalog = Catalog::from_targets(vec![target("HAT-P-11 b", "HAT-P-11", &[])]);
        assert_eq!(catalog.lookup("HATP11 b").unwrap().name, "HAT-P-11 b");
    }

    #[test]
    fn test_lookup_by_alias() {
        let catalog = Catalog::from_targets(vec![target(
            "GJ 486 b",
            "GJ 486",
            &["Wolf 437 b", "TOI-1827.01"],
        )]);
        assert_eq!(catalog.lookup("Wolf 437 b").unwrap().name, "GJ 486 b");
        assert_eq!(catalog.lookup("TOI-1827.01").unwrap().name, "GJ 486 b");
    }

    #[test]
    fn test_lookup_not_found() {
        let catalog = Catalog::from_targets(vec![target("WASP-39 b", "WASP-39", &[])]);
        let err = catalog.lookup("HD 209458 b").unwrap_err();
        assert!(matches!(err, ArchiveError::NotFound(_)));
    }

    #[test]
    fn test_lookup_ambiguous_alias() {
        let catalog = Catalog::from_targets(vec![
            target("Kepler-51 b", "Kepler-51", &["KOI-620 b"]),
            target("Kepler-51 c", "Kepler-51", &["KOI-620 b"]),
        ]);
        let err = catalog.lookup("KOI-620 b").unwrap_err();
        match err {
            ArchiveError::Ambiguous { candidates, .. } => {
                assert_eq!(candidates.len(), 2);
                assert!(candidates.contains(&"Kepler-51 b".to_string()));
            }
            other => panic!("expected Ambiguous, got {:?}", other),
        }
    }

    #[test]
    fn test_canonical_name_wins_over_alias() {
        // An alias that collides with another planet's canonical name must
        // not shadow it.
        let catalog = Catalog::from_targets(vec![
            target("WASP-39 b", "WASP-39", &[]),
            target("WASP-39 c", "WASP-39", &["WASP-39 b"]),
        ]);
        assert_eq!(catalog.lookup("WASP-39 b").unwrap().name, "WASP-39 b");
    }
}
