//! Beta distribution sampling for Thompson draws.
//!
//! Uses the standard construction from two Gamma variates:
//! `X ~ Gamma(a), Y ~ Gamma(b)  =>  X / (X + Y) ~ Beta(a, b)`,
//! with Marsaglia-Tsang for the Gamma samples. Reproducible under any
//! seeded [`rand::Rng`], which the tests rely on.

use rand::Rng;

/// Draws one sample from Beta(alpha, beta).
///
/// Shape parameters must be positive; the engine always passes
/// `count + 1 >= 1`. Beta(1, 1) is the uniform distribution, which gives
/// cold-start arms uniform-ish behavior for free.
pub fn sample_beta<R: Rng + ?Sized>(alpha: f64, beta: f64, rng: &mut R) -> f64 {
    debug_assert!(alpha > 0.0 && beta > 0.0);

    let x = sample_gamma(alpha, rng);
    let y = sample_gamma(beta, rng);
    let sum = x + y;
    if sum <= f64::MIN_POSITIVE {
        // Both gammas underflowed; fall back to the mean.
        return alpha / (alpha + beta);
    }
    x / sum
}

/// Marsaglia-Tsang squeeze method for Gamma(shape, 1).
///
/// For shape < 1 the sample is boosted from shape + 1 using
/// `Gamma(a) = Gamma(a + 1) * U^(1/a)`.
fn sample_gamma<R: Rng + ?Sized>(shape: f64, rng: &mut R) -> f64 {
    if shape < 1.0 {
        let u: f64 = open_unit(rng);
        return sample_gamma(shape + 1.0, rng) * u.powf(1.0 / shape);
    }

    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();

    loop {
        let x = sample_standard_normal(rng);
        let v = (1.0 + c * x).powi(3);
        if v <= 0.0 {
            continue;
        }

        let u: f64 = open_unit(rng);
        // Cheap squeeze first, exact log check as fallback.
        if u < 1.0 - 0.0331 * x.powi(4) {
            return d * v;
        }
        if u.ln() < 0.5 * x * x + d * (1.0 - v + v.ln()) {
            return d * v;
        }
    }
}

/// Box-Muller transform; avoids pulling in a distributions crate.
fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = open_unit(rng);
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Uniform draw from (0, 1]; ln(0) must never happen.
fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    1.0 - rng.gen::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn samples_stay_in_unit_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1_000 {
            let s = sample_beta(1.0, 1.0, &mut rng);
            assert!((0.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn same_seed_reproduces_samples() {
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..100 {
            assert_eq!(sample_beta(3.0, 5.0, &mut a), sample_beta(3.0, 5.0, &mut b));
        }
    }

    #[test]
    fn uniform_prior_has_mean_near_half() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| sample_beta(1.0, 1.0, &mut rng)).sum::<f64>() / n as f64;

        assert!((mean - 0.5).abs() < 0.02, "mean was {}", mean);
    }

    #[test]
    fn skewed_counts_shift_the_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let n = 20_000;
        let mean: f64 = (0..n)
            .map(|_| sample_beta(9.0, 1.0, &mut rng))
            .sum::<f64>()
            / n as f64;

        // Beta(9, 1) has mean 0.9.
        assert!((mean - 0.9).abs() < 0.02, "mean was {}", mean);
    }

    #[test]
    fn fractional_shapes_are_handled() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..1_000 {
            let s = sample_beta(0.5, 2.5, &mut rng);
            assert!((0.0..=1.0).contains(&s));
        }
    }
}
