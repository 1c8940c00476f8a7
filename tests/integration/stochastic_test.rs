//! Granger tests on independent random walks

use poly_leadlag::granger::SIGNIFICANCE_LEVEL;
use poly_leadlag::series::{Platform, Series};
use poly_leadlag::var::{VarRunner, VariableColumns};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

const TRIALS: u64 = 100;
const PERIODS: usize = 250;

fn random_walk(rng: &mut StdRng, steps: &Normal<f64>) -> Vec<Option<f64>> {
    let mut level = 0.5;
    (0..PERIODS)
        .map(|_| {
            level += steps.sample(rng);
            Some(level)
        })
        .collect()
}

#[test]
fn test_independent_series_rarely_significant() {
    let steps = Normal::new(0.0, 0.01).unwrap();
    let runner = VarRunner::new(SIGNIFICANCE_LEVEL);

    let mut significant = 0;
    let mut tests = 0;
    for seed in 0..TRIALS {
        let mut rng = StdRng::seed_from_u64(seed);
        let a = Series::from_values("mid", Platform::A, random_walk(&mut rng, &steps));
        let b = Series::from_values("mid", Platform::B, random_walk(&mut rng, &steps));
        let columns = VariableColumns::from_series(&a, &b).unwrap();

        let result = runner.analyze("mid", &columns);
        assert_eq!(result.n_observations, PERIODS - 2);

        for test in [&result.a_to_b, &result.b_to_a] {
            let test = test.as_ref().unwrap();
            assert!((0.0..=1.0).contains(&test.p_value));
            tests += 1;
            if test.significant {
                significant += 1;
            }
        }
    }

    // Expect about 5% false positives; allow generous slack
    let rate = significant as f64 / tests as f64;
    assert!(rate < 0.15, "false positive rate {}", rate);
}

#[test]
fn test_p_values_spread_under_null() {
    let steps = Normal::new(0.0, 0.01).unwrap();
    let runner = VarRunner::default();

    let p_values: Vec<f64> = (0..TRIALS)
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(1_000 + seed);
            let a = Series::from_values("vwap_yes", Platform::A, random_walk(&mut rng, &steps));
            let b = Series::from_values("vwap_yes", Platform::B, random_walk(&mut rng, &steps));
            let columns = VariableColumns::from_series(&a, &b).unwrap();
            runner
                .analyze("vwap_yes", &columns)
                .a_to_b
                .unwrap()
                .p_value
        })
        .collect();

    // Under the null p is roughly uniform, so its mean sits near 0.5
    let mean = p_values.iter().sum::<f64>() / p_values.len() as f64;
    assert!((0.35..0.65).contains(&mean), "mean p {}", mean);
}
