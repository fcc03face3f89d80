//! Keplerian orbits from mean orbital elements.
//!
//! Elements are linear in `d`, the day number counted from 2000-01-00.0 UT
//! (so 2000-01-01 00:00 UT is `d = 1`). Angles are stored in degrees,
//! positions are ecliptic rectangular coordinates.

use std::ops::{Add, Neg, Sub};

use crate::body::Body;

/// Mean radius of the Earth in astronomical units (6378.137 km / 149 597 870.7 km).
pub const EARTH_RADIUS_AU: f64 = 6378.137 / 149_597_870.7;

const KEPLER_MAX_ITERATIONS: usize = 16;
const KEPLER_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[must_use]
    pub fn scale(self, k: f64) -> Self {
        Self {
            x: self.x * k,
            y: self.y * k,
            z: self.z * k,
        }
    }

    #[must_use]
    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    fn from_spherical(lon_deg: f64, lat_deg: f64, r: f64) -> Self {
        let (lon, lat) = (lon_deg.to_radians(), lat_deg.to_radians());
        Self {
            x: r * lon.cos() * lat.cos(),
            y: r * lon.sin() * lat.cos(),
            z: r * lat.sin(),
        }
    }

    fn to_spherical(self) -> (f64, f64, f64) {
        let r = self.norm();
        let lon = self.y.atan2(self.x).to_degrees();
        let lat = self.z.atan2(self.x.hypot(self.y)).to_degrees();
        (lon, lat, r)
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        self.scale(-1.0)
    }
}

/// A quantity with a value at epoch and a rate per day.
#[derive(Debug, Clone, Copy)]
struct Secular(f64, f64);

impl Secular {
    fn at(self, d: f64) -> f64 {
        self.0 + self.1 * d
    }
}

/// Mean orbital elements with their secular rates.
#[derive(Debug, Clone, Copy)]
struct ElementRates {
    /// Longitude of the ascending node.
    node: Secular,
    inclination: Secular,
    /// Argument of perihelion (perigee for the Moon).
    perihelion: Secular,
    /// Semi-major axis: AU for planets and the Sun, Earth radii for the Moon.
    semi_major_axis: f64,
    eccentricity: Secular,
    mean_anomaly: Secular,
}

// The Sun's elements describe the Earth's orbit seen from the Earth.
const SUN: ElementRates = ElementRates {
    node: Secular(0.0, 0.0),
    inclination: Secular(0.0, 0.0),
    perihelion: Secular(282.9404, 4.709_35e-5),
    semi_major_axis: 1.0,
    eccentricity: Secular(0.016_709, -1.151e-9),
    mean_anomaly: Secular(356.0470, 0.985_600_258_5),
};

const MOON: ElementRates = ElementRates {
    node: Secular(125.1228, -0.052_953_808_3),
    inclination: Secular(5.1454, 0.0),
    perihelion: Secular(318.0634, 0.164_357_322_3),
    semi_major_axis: 60.2666,
    eccentricity: Secular(0.054_900, 0.0),
    mean_anomaly: Secular(115.3654, 13.064_992_950_9),
};

const MERCURY: ElementRates = ElementRates {
    node: Secular(48.3313, 3.245_87e-5),
    inclination: Secular(7.0047, 5.00e-8),
    perihelion: Secular(29.1241, 1.014_44e-5),
    semi_major_axis: 0.387_098,
    eccentricity: Secular(0.205_635, 5.59e-10),
    mean_anomaly: Secular(168.6562, 4.092_334_436_8),
};

const VENUS: ElementRates = ElementRates {
    node: Secular(76.6799, 2.465_90e-5),
    inclination: Secular(3.3946, 2.75e-8),
    perihelion: Secular(54.8910, 1.383_74e-5),
    semi_major_axis: 0.723_330,
    eccentricity: Secular(0.006_773, -1.302e-9),
    mean_anomaly: Secular(48.0052, 1.602_130_224_4),
};

const MARS: ElementRates = ElementRates {
    node: Secular(49.5574, 2.110_81e-5),
    inclination: Secular(1.8497, -1.78e-8),
    perihelion: Secular(286.5016, 2.929_61e-5),
    semi_major_axis: 1.523_688,
    eccentricity: Secular(0.093_405, 2.516e-9),
    mean_anomaly: Secular(18.6021, 0.524_020_776_6),
};

const JUPITER: ElementRates = ElementRates {
    node: Secular(100.4542, 2.768_54e-5),
    inclination: Secular(1.3030, -1.557e-7),
    perihelion: Secular(273.8777, 1.645_05e-5),
    semi_major_axis: 5.202_56,
    eccentricity: Secular(0.048_498, 4.469e-9),
    mean_anomaly: Secular(19.8950, 0.083_085_300_1),
};

const SATURN: ElementRates = ElementRates {
    node: Secular(113.6634, 2.389_80e-5),
    inclination: Secular(2.4886, -1.081e-7),
    perihelion: Secular(339.3939, 2.976_61e-5),
    semi_major_axis: 9.554_75,
    eccentricity: Secular(0.055_546, -9.499e-9),
    mean_anomaly: Secular(316.9670, 0.033_444_228_2),
};

impl ElementRates {
    /// Position in the orbit's reference frame (centre of attraction at the origin).
    fn position(&self, d: f64) -> Vector3 {
        let node = self.node.at(d).to_radians();
        let incl = self.inclination.at(d).to_radians();
        let peri = self.perihelion.at(d).to_radians();
        let a = self.semi_major_axis;
        let e = self.eccentricity.at(d);
        let m = self.mean_anomaly.at(d).rem_euclid(360.0).to_radians();

        let ecc_anomaly = solve_kepler(m, e);
        let xv = a * (ecc_anomaly.cos() - e);
        let yv = a * (1.0 - e * e).sqrt() * ecc_anomaly.sin();
        let true_anomaly = yv.atan2(xv);
        let r = xv.hypot(yv);

        let arg = true_anomaly + peri;
        Vector3 {
            x: r * (node.cos() * arg.cos() - node.sin() * arg.sin() * incl.cos()),
            y: r * (node.sin() * arg.cos() + node.cos() * arg.sin() * incl.cos()),
            z: r * arg.sin() * incl.sin(),
        }
    }

    fn mean_longitude(&self, d: f64) -> f64 {
        self.node.at(d) + self.perihelion.at(d) + self.mean_anomaly.at(d)
    }
}

/// Solves Kepler's equation `E - e sin E = M` for the eccentric anomaly (radians).
fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc = mean_anomaly + e * mean_anomaly.sin() * (1.0 + e * mean_anomaly.cos());
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta = (ecc - e * ecc.sin() - mean_anomaly) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }
    ecc
}

/// Geocentric lunar position in Earth radii, including the largest periodic
/// terms (evection, variation, yearly equation) in longitude, latitude and distance.
fn moon_geocentric(d: f64) -> Vector3 {
    let (lon, lat, r) = MOON.position(d).to_spherical();

    let sun_mean_anomaly = SUN.mean_anomaly.at(d).to_radians();
    let moon_mean_anomaly = MOON.mean_anomaly.at(d).to_radians();
    let elongation = (MOON.mean_longitude(d) - SUN.mean_longitude(d)).to_radians();
    let latitude_arg = (MOON.mean_longitude(d) - MOON.node.at(d)).to_radians();

    let lon = lon - 1.274 * (moon_mean_anomaly - 2.0 * elongation).sin()
        + 0.658 * (2.0 * elongation).sin()
        - 0.186 * sun_mean_anomaly.sin()
        - 0.059 * (2.0 * moon_mean_anomaly - 2.0 * elongation).sin()
        - 0.057 * (moon_mean_anomaly - 2.0 * elongation + sun_mean_anomaly).sin();
    let lat = lat - 0.173 * (latitude_arg - 2.0 * elongation).sin()
        - 0.055 * (moon_mean_anomaly - latitude_arg - 2.0 * elongation).sin();
    let r = r
        - 0.58 * (moon_mean_anomaly - 2.0 * elongation).cos()
        - 0.46 * (2.0 * elongation).cos();

    Vector3::from_spherical(lon, lat, r)
}

/// Heliocentric ecliptic position of `body` in astronomical units at day number `d`.
#[must_use]
pub fn heliocentric(body: Body, d: f64) -> Vector3 {
    match body {
        Body::Sun => Vector3::ZERO,
        Body::Earth => -SUN.position(d),
        Body::Moon => -SUN.position(d) + moon_geocentric(d).scale(EARTH_RADIUS_AU),
        Body::Mercury => MERCURY.position(d),
        Body::Venus => VENUS.position(d),
        Body::Mars => MARS.position(d),
        Body::Jupiter => JUPITER.position(d),
        Body::Saturn => SATURN.position(d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kepler_circular_orbit_is_identity() {
        for m in [0.0, 0.5, 1.0, 3.0, 6.0] {
            assert!((solve_kepler(m, 0.0) - m).abs() < 1e-12);
        }
    }

    #[test]
    fn test_kepler_satisfies_equation() {
        for e in [0.01, 0.1, 0.2, 0.5] {
            for m in [0.1, 1.0, 2.5, 4.0, 6.2] {
                let ecc = solve_kepler(m, e);
                assert!((ecc - e * ecc.sin() - m).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_planet_radii_stay_near_semi_major_axis() {
        for (body, a, e) in [
            (Body::Mercury, 0.387_098, 0.2057),
            (Body::Venus, 0.723_330, 0.0068),
            (Body::Mars, 1.523_688, 0.0934),
            (Body::Jupiter, 5.202_56, 0.0485),
            (Body::Saturn, 9.554_75, 0.0556),
        ] {
            for d in [0.0, 1000.0, 5000.0, 9000.0] {
                let r = heliocentric(body, d).norm();
                assert!(
                    r >= a * (1.0 - e) - 1e-6 && r <= a * (1.0 + e) + 1e-6,
                    "{body} at d={d}: r={r}"
                );
            }
        }
    }

    #[test]
    fn test_spherical_round_trip() {
        let v = Vector3 {
            x: 0.3,
            y: -1.2,
            z: 0.05,
        };
        let (lon, lat, r) = v.to_spherical();
        let back = Vector3::from_spherical(lon, lat, r);
        assert!((back - v).norm() < 1e-12);
    }
}
