//! Seeded synthetic demand and PV curves.
//!
//! Used when a scenario does not point at measured profile tables. Both
//! generators produce raw hourly shapes which are then normalized into a
//! [`DailyProfile`], so only the shape matters, not the absolute level.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::error::ProfileError;
use crate::profile::DailyProfile;
use crate::series::{PERIODS, PeriodSeries};

/// Draws Gaussian noise using the Box-Muller transform.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

fn normalized(table: &str, raw: &PeriodSeries, allow_zero: bool) -> Result<DailyProfile, ProfileError> {
    let total = raw.sum();
    if total <= 0.0 && allow_zero {
        return Ok(DailyProfile::zero());
    }
    let percentages: Vec<f64> = raw.iter().map(|v| v / total * 100.0).collect();
    DailyProfile::from_percentages(table, &percentages)
}

/// Residential demand shape: a daily sinusoid with an evening bump.
///
/// # Examples
///
/// ```
/// use community_dispatch::profile::synthetic::ResidentialLoad;
///
/// let profile = ResidentialLoad::default().profile(42).unwrap();
/// assert!((profile.fractions().sum() - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct ResidentialLoad {
    /// Baseline level (arbitrary units).
    pub base: f64,
    /// Amplitude of the daily sinusoid.
    pub amplitude: f64,
    /// Phase offset of the sinusoid in radians.
    pub phase_rad: f64,
    /// Extra demand added to the evening hours.
    pub evening_boost: f64,
    /// First evening hour (inclusive).
    pub evening_start: usize,
    /// Last evening hour (exclusive).
    pub evening_end: usize,
    /// Relative noise standard deviation.
    pub noise_std: f64,
}

impl Default for ResidentialLoad {
    fn default() -> Self {
        Self {
            base: 1.0,
            amplitude: 0.35,
            phase_rad: 4.0,
            evening_boost: 0.6,
            evening_start: 17,
            evening_end: 22,
            noise_std: 0.03,
        }
    }
}

impl ResidentialLoad {
    /// Raw, unnormalized hourly demand for the given seed.
    pub fn raw(&self, seed: u64) -> PeriodSeries {
        let mut rng = StdRng::seed_from_u64(seed);
        PeriodSeries::from_fn(|h| {
            let day_pos = h as f64 / PERIODS as f64;
            let angle = 2.0 * std::f64::consts::PI * day_pos + self.phase_rad;
            let evening = if (self.evening_start..self.evening_end).contains(&h) {
                self.evening_boost
            } else {
                0.0
            };
            let level = self.base + self.amplitude * angle.sin() + evening;
            let noise = 1.0 + gaussian_noise(&mut rng, self.noise_std);
            (level * noise).max(0.0)
        })
    }

    /// Normalized demand profile for the given seed.
    ///
    /// # Errors
    ///
    /// Fails only if the parameters produce a day without any demand.
    pub fn profile(&self, seed: u64) -> Result<DailyProfile, ProfileError> {
        normalized("synthetic demand", &self.raw(seed), false)
    }
}

/// Half-cosine PV shape between sunrise and sunset.
#[derive(Debug, Clone)]
pub struct SolarShape {
    /// Sunrise hour (inclusive).
    pub sunrise: usize,
    /// Sunset hour (exclusive).
    pub sunset: usize,
    /// Relative noise standard deviation.
    pub noise_std: f64,
}

impl Default for SolarShape {
    fn default() -> Self {
        Self {
            sunrise: 6,
            sunset: 19,
            noise_std: 0.05,
        }
    }
}

impl SolarShape {
    /// Fraction of peak output in hour `h`, zero outside daylight.
    fn daylight_frac(&self, h: usize) -> f64 {
        if h < self.sunrise || h >= self.sunset || self.sunset <= self.sunrise {
            return 0.0;
        }
        let span = (self.sunset - self.sunrise) as f64;
        let x = (h - self.sunrise) as f64 + 0.5;
        (std::f64::consts::PI * x / span).sin()
    }

    /// Raw, unnormalized hourly generation for the given seed.
    pub fn raw(&self, seed: u64) -> PeriodSeries {
        let mut rng = StdRng::seed_from_u64(seed);
        PeriodSeries::from_fn(|h| {
            let frac = self.daylight_frac(h);
            if frac <= 0.0 {
                return 0.0;
            }
            (frac * (1.0 + gaussian_noise(&mut rng, self.noise_std))).max(0.0)
        })
    }

    /// Normalized generation profile for the given seed.
    ///
    /// # Errors
    ///
    /// Never fails for a valid daylight window; an empty window yields the
    /// all-zero profile.
    pub fn profile(&self, seed: u64) -> Result<DailyProfile, ProfileError> {
        normalized("synthetic generation", &self.raw(seed), true)
    }
}
