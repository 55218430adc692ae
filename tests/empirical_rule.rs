use anomfit::stats::{DistributionSummary, bounds_at, fraction_within, mean, std_dev};
use anomfit::{Observation, Period, PolynomialModel, Series};
use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rand_distr::{Distribution, Normal};

fn normal_sample(n_vals: usize, mu: f64, sigma: f64) -> Vec<f64> {
    let mut rng = ChaCha12Rng::seed_from_u64(0x5eed);
    let dist = Normal::new(mu, sigma).expect("failed to build normal distribution");
    (0..n_vals).map(|_| dist.sample(&mut rng)).collect()
}

#[test]
fn normal_sample_follows_empirical_rule() {
    let vals = normal_sample(20_000, 0.45, 0.2);
    let mu = mean(&vals).unwrap();
    let sigma = std_dev(&vals).unwrap();
    assert_abs_diff_eq!(mu, 0.45, epsilon = 0.01);
    assert_abs_diff_eq!(sigma, 0.2, epsilon = 0.01);

    for (k, expected) in [(1.0, 0.6827), (2.0, 0.9545), (3.0, 0.9973)] {
        let (lower, upper) = bounds_at(mu, sigma, k);
        let fraction = fraction_within(&vals, lower, upper).unwrap();
        assert_abs_diff_eq!(fraction, expected, epsilon = 0.01);
    }
}

#[test]
fn summary_bands_match_direct_computation() {
    let vals = normal_sample(500, -0.1, 1.3);
    let summary = DistributionSummary::compute(&vals, &[1, 2, 3]).unwrap();
    assert_eq!(summary.bands.len(), 3);
    for band in &summary.bands {
        let (lower, upper) = bounds_at(summary.mean, summary.std_dev, band.k as f64);
        assert_eq!((band.lower, band.upper), (lower, upper));
        assert_eq!(band.fraction, fraction_within(&vals, lower, upper).unwrap());
    }
    assert!(summary.bands.windows(2).all(|w| w[0].fraction <= w[1].fraction));
}

#[test]
fn noisy_trend_fit_quality_is_in_unit_interval() {
    let noise = normal_sample(360, 0.0, 0.1);
    let series: Series = noise
        .iter()
        .enumerate()
        .map(|(i_month, eps)| Observation {
            period: Period::new(1994 + (i_month / 12) as i32, 1 + (i_month % 12) as u32)
                .unwrap(),
            value: 0.3 + 0.002 * i_month as f64 + eps,
        })
        .collect();

    for degree in [1, 3, 20] {
        let model = PolynomialModel::fit(&series, degree).unwrap();
        let r_squared = model.fit_quality(&series).unwrap().r_squared;
        assert!((0.0..=1.0).contains(&r_squared), "degree {degree}: {r_squared}");
    }
}
