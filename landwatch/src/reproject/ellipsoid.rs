//! Définitions des ellipsoïdes

/// Paramètres d'un ellipsoïde de révolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Demi-grand axe (rayon équatorial) en mètres
    pub a: f64,
    /// Aplatissement
    pub f: f64,
}

impl Ellipsoid {
    /// WGS84 (GPS, EPSG:4326 et UTM 326xx/327xx)
    pub const WGS84: Self = Self {
        a: 6378137.0,
        f: 1.0 / 298.257223563,
    };

    /// GRS80 (SIRGAS 2000, EPSG:4674 et UTM 319xx)
    /// Note: Quasi identique à WGS84, différence < 0.1mm
    pub const GRS80: Self = Self {
        a: 6378137.0,
        f: 1.0 / 298.257222101,
    };

    /// Première excentricité au carré
    pub fn e2(&self) -> f64 {
        2.0 * self.f - self.f * self.f
    }

    /// Deuxième excentricité au carré
    pub fn ep2(&self) -> f64 {
        let e2 = self.e2();
        e2 / (1.0 - e2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wgs84_eccentricity() {
        let e = Ellipsoid::WGS84.e2().sqrt();
        assert!((e - 0.0818191908426215).abs() < 1e-12);
    }

    #[test]
    fn test_grs80_close_to_wgs84() {
        assert!((Ellipsoid::GRS80.e2() - Ellipsoid::WGS84.e2()).abs() < 1e-9);
    }
}
