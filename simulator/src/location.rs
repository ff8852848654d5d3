use rand::Rng;

// San Francisco center, roughly a 5km box around it.
pub const CENTER_LAT: f64 = 37.7749;
pub const CENTER_LNG: f64 = -122.4194;
pub const RADIUS_DEG: f64 = 0.05;

#[derive(Debug, Copy, Clone)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Uniform sample within the box around the city center, each axis independent.
#[must_use]
pub fn random_location() -> Location {
    let mut rng = rand::thread_rng();
    Location {
        lat: CENTER_LAT + rng.gen_range(-RADIUS_DEG..=RADIUS_DEG),
        lng: CENTER_LNG + rng.gen_range(-RADIUS_DEG..=RADIUS_DEG),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampled_locations_stay_within_radius() {
        for _ in 0..10_000 {
            let loc = random_location();
            assert!((loc.lat - CENTER_LAT).abs() <= RADIUS_DEG);
            assert!((loc.lng - CENTER_LNG).abs() <= RADIUS_DEG);
        }
    }
}
