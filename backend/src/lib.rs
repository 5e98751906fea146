//! # Gen TSO Rust Backend
//!
//! Observation-planning engine for JWST exoplanet time-series observations.
//!
//! This crate provides a Rust backend for the Gen TSO planner: it resolves
//! exoplanet targets from catalog data, holds the observing-scene and
//! instrument configuration for an interactive session, and orchestrates
//! radiometric simulations against an external Pandeia-equivalent calculator.
//! The backend exposes a REST API via Axum for the GUI frontend.
//!
//! ## Features
//!
//! - **Target Resolution**: name/alias lookup with catalog normalization and
//!   JWST prior-observation provenance
//! - **Scene Configuration**: SED model, observation type, model spectra,
//!   requested duration
//! - **Instrument Configuration**: disperser/filter/subarray/readout
//!   validation and MULTIACCUM integration timing
//! - **Simulation Orchestration**: cancellable background runs with an
//!   append-only run history for comparison
//! - **HTTP API**: RESTful endpoints plus SSE progress streaming
//!
//! ## Architecture
//!
//! - [`models`]: Target, scene, instrument, and simulation-run data types
//! - [`catalog`]: bundled catalog parsing and target-name normalization
//! - [`archive`]: exoplanet archive backends (bundled files or live NEA)
//! - [`calculator`]: radiometric calculator backends (Pandeia service or a
//!   deterministic synthetic stand-in)
//! - [`session`]: mutable per-session state with validation
//! - [`services`]: resolver, orchestrator, saturation advisory, sky view
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;
pub mod archive;
pub mod calculator;
pub mod catalog;
pub mod config;
pub mod models;
pub mod services;
pub mod session;

#[cfg(feature = "http-server")]
pub mod http;
