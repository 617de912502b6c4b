//! Time-varying sources that drive input nodes.
//!
//! Band-limited noise is generated from an explicit seed, so two networks
//! built with the same seed see identical input.

use core::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{NefError, NefResult};

/// Largest number of sinusoids a [`FourierFunction`] may sum.
pub const MAX_COMPONENTS: usize = 10_000;

/// One sinusoidal component of a [`FourierFunction`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub frequency: f64,
    pub amplitude: f64,
    pub phase: f64,
}

/// Scalar sum of sinusoids at multiples of a fundamental frequency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FourierFunction {
    pub fundamental: f64,
    pub cutoff: f64,
    pub rms: f64,
    pub seed: u64,
    components: Vec<Component>,
}

impl FourierFunction {
    /// Random band-limited signal: one component per multiple of
    /// `fundamental` up to and including `cutoff` (Hz), random amplitudes and
    /// phases, scaled so the signal's RMS equals `rms`. At most
    /// [`MAX_COMPONENTS`] components are allowed.
    pub fn white_noise(fundamental: f64, cutoff: f64, rms: f64, seed: u64) -> NefResult<Self> {
        if !(fundamental > 0.0 && fundamental.is_finite()) {
            return Err(NefError::InvalidParameter(format!(
                "fundamental frequency must be positive, got {}",
                fundamental
            )));
        }
        if !(cutoff >= fundamental && cutoff.is_finite()) {
            return Err(NefError::InvalidParameter(format!(
                "cutoff {} is below fundamental {}",
                cutoff, fundamental
            )));
        }
        if !(rms >= 0.0 && rms.is_finite()) {
            return Err(NefError::InvalidParameter(format!(
                "rms must be non-negative, got {}",
                rms
            )));
        }

        // Small tolerance so e.g. 10.0 / 0.1 still includes the cutoff itself
        let ratio = (cutoff / fundamental + 1e-9).floor();
        if !(ratio <= MAX_COMPONENTS as f64) {
            return Err(NefError::InvalidParameter(format!(
                "cutoff {} / fundamental {} needs more than {} components",
                cutoff, fundamental, MAX_COMPONENTS
            )));
        }
        let count = ratio as usize;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut components: Vec<Component> = (1..=count)
            .map(|k| Component {
                frequency: fundamental * k as f64,
                amplitude: rng.gen_range(0.0..1.0),
                phase: rng.gen_range(0.0..TAU),
            })
            .collect();

        // RMS of a sum of sinusoids at distinct frequencies = sqrt(sum(a^2) / 2)
        let power: f64 = components.iter().map(|c| c.amplitude * c.amplitude).sum();
        let current = (power / 2.0).sqrt();
        if current > 0.0 {
            let scale = rms / current;
            for c in &mut components {
                c.amplitude *= scale;
            }
        }

        Ok(Self { fundamental, cutoff, rms, seed, components })
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn value_at(&self, t: f64) -> f64 {
        self.components
            .iter()
            .map(|c| c.amplitude * (TAU * c.frequency * t + c.phase).sin())
            .sum()
    }
}

/// The function an input node emits; its length fixes the node's dimensionality.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputFunction {
    Constant(Vec<f64>),
    Fourier(Vec<FourierFunction>),
}

impl InputFunction {
    pub fn dimensions(&self) -> usize {
        match self {
            InputFunction::Constant(values) => values.len(),
            InputFunction::Fourier(funcs) => funcs.len(),
        }
    }

    pub fn value_at(&self, t: f64) -> Vec<f64> {
        match self {
            InputFunction::Constant(values) => values.clone(),
            InputFunction::Fourier(funcs) => funcs.iter().map(|f| f.value_at(t)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampled_rms(f: &FourierFunction) -> f64 {
        // One full period of the fundamental, finely sampled
        let period = 1.0 / f.fundamental;
        let n = 20_000;
        let sum: f64 = (0..n)
            .map(|i| {
                let v = f.value_at(period * i as f64 / n as f64);
                v * v
            })
            .sum();
        (sum / n as f64).sqrt()
    }

    #[test]
    fn white_noise_is_deterministic_per_seed() {
        let a = FourierFunction::white_noise(0.1, 10.0, 0.5, 12).unwrap();
        let b = FourierFunction::white_noise(0.1, 10.0, 0.5, 12).unwrap();
        let c = FourierFunction::white_noise(0.1, 10.0, 0.5, 13).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.components(), c.components());
        assert_eq!(a.value_at(3.7), b.value_at(3.7));
    }

    #[test]
    fn white_noise_has_requested_rms() {
        let f = FourierFunction::white_noise(0.1, 10.0, 0.5, 12).unwrap();
        assert_eq!(f.components().len(), 100);
        assert!((sampled_rms(&f) - 0.5).abs() < 1e-2);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(FourierFunction::white_noise(0.0, 10.0, 0.5, 1).is_err());
        assert!(FourierFunction::white_noise(1.0, 0.5, 0.5, 1).is_err());
        assert!(FourierFunction::white_noise(1.0, 2.0, -1.0, 1).is_err());
    }

    #[test]
    fn component_count_is_bounded() {
        let huge = FourierFunction::white_noise(1e-9, 1e12, 0.5, 1);
        assert!(matches!(huge, Err(NefError::InvalidParameter(_))));
        let just_over = FourierFunction::white_noise(1.0, (MAX_COMPONENTS + 1) as f64, 0.5, 1);
        assert!(matches!(just_over, Err(NefError::InvalidParameter(_))));

        let at_limit = FourierFunction::white_noise(1.0, MAX_COMPONENTS as f64, 0.5, 1).unwrap();
        assert_eq!(at_limit.components().len(), MAX_COMPONENTS);
    }

    #[test]
    fn constant_function_dimensions() {
        let f = InputFunction::Constant(vec![0.0; 5]);
        assert_eq!(f.dimensions(), 5);
        assert_eq!(f.value_at(1.0), vec![0.0; 5]);
    }
}
