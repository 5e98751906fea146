//! Field-of-view links for the external sky viewer.

/// Base URL of the ESASky viewer.
pub const ESASKY_BASE: &str = "https://sky.esa.int/esasky/";

/// Build an embeddable sky-view URL centered on the target coordinates.
pub fn sky_view_url(ra: qtty::Degrees, dec: qtty::Degrees, fov_deg: f64) -> String {
    format!(
        "{}?target={:.5}%20{:.5}&fov={}&sci=true",
        ESASKY_BASE,
        ra.value(),
        dec.value(),
        fov_deg,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_contains_coordinates_and_fov() {
        let url = sky_view_url(qtty::Degrees::new(217.3266), qtty::Degrees::new(-3.4445), 0.25);
        assert!(url.starts_with(ESASKY_BASE));
        assert!(url.contains("target=217.32660%20-3.44450"));
        assert!(url.contains("fov=0.25"));
    }
}
