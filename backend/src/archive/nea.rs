//! Live NASA Exoplanet Archive backend.
//!
//! Resolution goes through the TAP sync endpoint (planetary-systems table)
//! and falls back to the alias-lookup endpoint when the name is not a
//! canonical planet name. No retries: failures surface to the caller.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{ArchiveError, ExoplanetArchive};
use crate::catalog::aliases::normalize_name;
use crate::config::ServiceSettings;
use crate::models::Target;

const PS_COLUMNS: &str = "hostname,pl_name,default_flag,sy_kmag,ra,dec,\
                          st_teff,st_logg,st_met,st_rad,st_mass,\
                          pl_trandur,pl_orbper,pl_orbsmax,pl_rade,pl_masse,pl_eqt";

/// One row of the planetary-systems table. Most columns are nullable.
#[derive(Debug, Clone, Deserialize)]
struct PsRow {
    hostname: String,
    pl_name: String,
    default_flag: Option<i64>,
    sy_kmag: Option<f64>,
    ra: Option<f64>,
    dec: Option<f64>,
    st_teff: Option<f64>,
    st_logg: Option<f64>,
    st_met: Option<f64>,
    st_rad: Option<f64>,
    st_mass: Option<f64>,
    pl_trandur: Option<f64>,
    pl_orbper: Option<f64>,
    pl_orbsmax: Option<f64>,
    pl_rade: Option<f64>,
    pl_masse: Option<f64>,
    pl_eqt: Option<f64>,
}

/// HTTP client for the NASA Exoplanet Archive.
pub struct NeaArchiveClient {
    client: reqwest::Client,
    tap_endpoint: String,
    alias_endpoint: String,
    jwst_hosts: HashSet<String>,
}

impl NeaArchiveClient {
    pub fn new(settings: &ServiceSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            tap_endpoint: settings.nea_tap_endpoint.clone(),
            alias_endpoint: settings.nea_alias_endpoint.clone(),
            jwst_hosts: HashSet::new(),
        })
    }

    /// Attach a set of normalized JWST host names used for the
    /// prior-observation provenance flag.
    pub fn with_jwst_hosts(mut self, hosts: HashSet<String>) -> Self {
        self.jwst_hosts = hosts;
        self
    }

    async fn query_planet(&self, planet: &str) -> Result<Vec<PsRow>, ArchiveError> {
        // ADQL string literals double their quotes
        let escaped = planet.replace('\'', "''");
        let query = format!(
            "select {} from ps where pl_name='{}'",
            PS_COLUMNS, escaped
        );
        let response = self
            .client
            .get(&self.tap_endpoint)
            .query(&[("query", query.as_str()), ("format", "json")])
            .send()
            .await
            .map_err(|e| ArchiveError::Service(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ArchiveError::Service(format!(
                "TAP query failed with status {}",
                response.status()
            )));
        }
        response
            .json::<Vec<PsRow>>()
            .await
            .map_err(|e| ArchiveError::Service(format!("bad TAP response: {}", e)))
    }

    /// Ask the alias-lookup endpoint which canonical planets carry this
    /// name. Also returns the alias list of each matched planet.
    async fn lookup_aliases(
        &self,
        name: &str,
    ) -> Result<Vec<(String, Vec<String>)>, ArchiveError> {
        let response = self
            .client
            .get(&self.alias_endpoint)
            .query(&[("objname", name)])
            .send()
            .await
            .map_err(|e| ArchiveError::Service(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ArchiveError::Service(format!(
                "alias lookup failed with status {}",
                response.status()
            )));
        }
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ArchiveError::Service(format!("bad alias response: {}", e)))?;

        let status = body
            .pointer("/manifest/lookup_status")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        if status == "System Not Found" {
            return Err(ArchiveError::NotFound(name.to_string()));
        }

        let mut matches = Vec::new();
        let planets = body
            .pointer("/system/objects/planet_set/planets")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();
        let wanted = normalize_name(name).to_lowercase();
        for (planet, entry) in planets {
            let aliases: Vec<String> = entry
                .pointer("/alias_set/aliases")
                .and_then(|v| v.as_array())
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|a| a.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            let is_match = normalize_name(&planet).to_lowercase() == wanted
                || aliases
                    .iter()
                    .any(|a| normalize_name(a).to_lowercase() == wanted);
            if is_match {
                matches.push((planet, aliases));
            }
        }
        Ok(matches)
    }

    /// Merge duplicate rows for one planet: the default row wins, the rest
    /// fill its gaps in order.
    fn merge_rows(&self, mut rows: Vec<PsRow>, aliases: Vec<String>) -> Option<Target> {
        if rows.is_empty() {
            return None;
        }
        let default_idx = rows
            .iter()
            .position(|r| r.default_flag == Some(1))
            .unwrap_or(0);
        let mut best = rows.swap_remove(default_idx);
        for row in rows {
            best.sy_kmag = best.sy_kmag.or(row.sy_kmag);
            best.ra = best.ra.or(row.ra);
            best.dec = best.dec.or(row.dec);
            best.st_teff = best.st_teff.or(row.st_teff);
            best.st_logg = best.st_logg.or(row.st_logg);
            best.st_met = best.st_met.or(row.st_met);
            best.st_rad = best.st_rad.or(row.st_rad);
            best.st_mass = best.st_mass.or(row.st_mass);
            best.pl_trandur = best.pl_trandur.or(row.pl_trandur);
            best.pl_orbper = best.pl_orbper.or(row.pl_orbper);
            best.pl_orbsmax = best.pl_orbsmax.or(row.pl_orbsmax);
            best.pl_rade = best.pl_rade.or(row.pl_rade);
            best.pl_masse = best.pl_masse.or(row.pl_masse);
            best.pl_eqt = best.pl_eqt.or(row.pl_eqt);
        }

        let is_transiting = best.pl_trandur.is_some();
        let has_jwst = is_transiting
            && self
                .jwst_hosts
                .contains(&normalize_name(&best.hostname));
        Some(Target {
            name: best.pl_name,
            host: best.hostname,
            aliases,
            ra: qtty::Degrees::new(best.ra.unwrap_or(0.0)),
            dec: qtty::Degrees::new(best.dec.unwrap_or(0.0)),
            ks_mag: best.sy_kmag,
            teff: best.st_teff,
            logg_star: best.st_logg,
            metal_star: best.st_met,
            rstar: best.st_rad,
            mstar: best.st_mass,
            rplanet: best.pl_rade,
            mplanet: best.pl_masse,
            transit_dur: best.pl_trandur.map(qtty::Hours::new),
            period: best.pl_orbper.map(qtty::Days::new),
            sma: best.pl_orbsmax,
            eq_temp: best.pl_eqt,
            is_confirmed: true,
            has_jwst_observations: has_jwst,
        })
    }
}

#[async_trait]
impl ExoplanetArchive for NeaArchiveClient {
    fn source_name(&self) -> &'static str {
        "nea"
    }

    async fn resolve(&self, name: &str) -> Result<Target, ArchiveError> {
        let normalized = normalize_name(name);

        // Canonical planet name first
        let rows = self.query_planet(&normalized).await?;
        if !rows.is_empty() {
            let aliases = match self.lookup_aliases(&normalized).await {
                Ok(matches) => matches
                    .into_iter()
                    .find(|(planet, _)| normalize_name(planet) == normalized)
                    .map(|(_, aliases)| aliases)
                    .unwrap_or_default(),
                Err(e) => {
                    log::warn!("alias lookup failed for '{}': {}", normalized, e);
                    Vec::new()
                }
            };
            return self
                .merge_rows(rows, aliases)
                .ok_or_else(|| ArchiveError::NotFound(name.to_string()));
        }

        // Alias lookup second
        let mut matches = self.lookup_aliases(&normalized).await?;
        match matches.len() {
            0 => Err(ArchiveError::NotFound(name.to_string())),
            1 => {
                let (planet, aliases) = matches.remove(0);
                let rows = self.query_planet(&planet).await?;
                self.merge_rows(rows, aliases)
                    .ok_or_else(|| ArchiveError::NotFound(name.to_string()))
            }
            _ => Err(ArchiveError::Ambiguous {
                name: name.to_string(),
                candidates: matches.into_iter().map(|(planet, _)| planet).collect(),
            }),
        }
    }

    async fn health(&self) -> bool {
        self.client
            .get(&self.tap_endpoint)
            .query(&[("query", "select top 1 pl_name from ps"), ("format", "json")])
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}
