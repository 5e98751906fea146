use serde::{Deserialize, Serialize};

/// Solar radius in meters.
const R_SUN_M: f64 = 6.957e8;
/// Earth radius in meters.
const R_EARTH_M: f64 = 6.371e6;

/// A resolved exoplanet target: one planet plus its host star.
///
/// Targets are immutable once fetched from an archive; re-resolving a name
/// replaces the value wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Planet name as listed by the archive (e.g. "WASP-39 b")
    pub name: String,
    /// Host star name (e.g. "WASP-39")
    pub host: String,
    /// Known alternative names for the planet
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Right ascension (J2000)
    pub ra: qtty::Degrees,
    /// Declination (J2000)
    pub dec: qtty::Degrees,
    /// Ks-band magnitude of the host
    pub ks_mag: Option<f64>,
    /// Stellar effective temperature [K]
    pub teff: Option<f64>,
    /// Stellar surface gravity, log10(cgs)
    pub logg_star: Option<f64>,
    /// Stellar metallicity [dex]
    pub metal_star: Option<f64>,
    /// Stellar radius [R_sun]
    pub rstar: Option<f64>,
    /// Stellar mass [M_sun]
    pub mstar: Option<f64>,
    /// Planet radius [R_earth]
    pub rplanet: Option<f64>,
    /// Planet mass [M_earth]
    pub mplanet: Option<f64>,
    /// Transit duration (T14)
    pub transit_dur: Option<qtty::Hours>,
    /// Orbital period
    pub period: Option<qtty::Days>,
    /// Semi-major axis [AU]
    pub sma: Option<f64>,
    /// Planet equilibrium temperature [K]
    pub eq_temp: Option<f64>,
    /// Confirmed planet (false for survey candidates, e.g. "TOI-5205.01")
    pub is_confirmed: bool,
    /// The host already has JWST observations on record
    pub has_jwst_observations: bool,
}

impl Target {
    /// A target is transiting when the archive lists a transit duration.
    pub fn is_transiting(&self) -> bool {
        self.transit_dur.is_some()
    }

    /// Planet-to-star radius ratio, when both radii are known.
    pub fn rprs(&self) -> Option<f64> {
        match (self.rplanet, self.rstar) {
            (Some(rp), Some(rs)) if rs > 0.0 => Some(rp * R_EARTH_M / (rs * R_SUN_M)),
            _ => None,
        }
    }

    /// Expected transit depth, (Rp/Rs)^2.
    pub fn transit_depth(&self) -> Option<f64> {
        self.rprs().map(|r| r * r)
    }

    /// Crude eclipse-depth estimate: the transit depth scaled by the
    /// equilibrium-to-stellar temperature ratio (Rayleigh-Jeans limit).
    pub fn eclipse_depth(&self) -> Option<f64> {
        let depth = self.transit_depth()?;
        let teq = self.eq_temp?;
        let teff = self.teff?;
        if teff <= 0.0 {
            return None;
        }
        Some(depth * teq / teff)
    }

    /// Stellar parameters needed to pick an SED model are all present.
    pub fn has_stellar_parameters(&self) -> bool {
        self.teff.is_some() && self.logg_star.is_some() && self.ks_mag.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_target() -> Target {
        Target {
            name: "WASP-80 b".to_string(),
            host: "WASP-80".to_string(),
            aliases: vec![],
            ra: qtty::Degrees::new(303.1673),
            dec: qtty::Degrees::new(-2.1444),
            ks_mag: Some(8.351),
            teff: Some(4143.0),
            logg_star: Some(4.663),
            metal_star: Some(-0.13),
            rstar: Some(0.586),
            mstar: Some(0.577),
            rplanet: Some(11.02),
            mplanet: Some(173.0),
            transit_dur: Some(qtty::Hours::new(2.131)),
            period: Some(qtty::Days::new(3.0679)),
            sma: Some(0.0344),
            eq_temp: Some(825.0),
            is_confirmed: true,
            has_jwst_observations: true,
        }
    }

    #[test]
    fn test_rprs_from_radii() {
        let target = sample_target();
        let rprs = target.rprs().unwrap();
        // 11.02 R_earth over 0.586 R_sun
        assert!((rprs - 0.1722).abs() < 1e-3, "rprs = {}", rprs);
    }

    #[test]
    fn test_transit_depth_is_rprs_squared() {
        let target = sample_target();
        let rprs = target.rprs().unwrap();
        assert_eq!(target.transit_depth().unwrap(), rprs * rprs);
    }

    #[test]
    fn test_eclipse_depth_smaller_than_transit_depth() {
        let target = sample_target();
        assert!(target.eclipse_depth().unwrap() < target.transit_depth().unwrap());
    }

    #[test]
    fn test_missing_radius_gives_no_depth() {
        let mut target = sample_target();
        target.rstar = None;
        assert!(target.rprs().is_none());
        assert!(target.transit_depth().is_none());
    }

    #[test]
    fn test_is_transiting_follows_transit_duration() {
        let mut target = sample_target();
        assert!(target.is_transiting());
        target.transit_dur = None;
        assert!(!target.is_transiting());
    }

    #[test]
    fn test_serde_round_trip() {
        let target = sample_target();
        let json = serde_json::to_string(&target).unwrap();
        let back: Target = serde_json::from_str(&json).unwrap();
        assert_eq!(back, target);
    }
}
