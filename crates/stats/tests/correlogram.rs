use kairos_stats::{acf, pacf_yw, significance_bound};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

fn ar1(phi: f64, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let mut x = vec![0.0; n];
    for t in 1..n {
        x[t] = phi * x[t - 1] + normal.sample(&mut rng);
    }
    x
}

#[test]
fn ar1_pacf_cuts_off_after_lag_one() {
    let x = ar1(0.7, 2000, 11);
    let p = pacf_yw(&x, 6).unwrap();
    assert!((p[1] - 0.7).abs() < 0.06, "pacf[1] = {}", p[1]);
    let bound = significance_bound(x.len());
    // Beyond lag 1 the PACF of an AR(1) is zero in population.
    let spikes = p[2..].iter().filter(|v| v.abs() > 2.0 * bound).count();
    assert_eq!(spikes, 0, "pacf = {p:?}");
}

#[test]
fn ar1_acf_decays_geometrically() {
    let x = ar1(0.7, 2000, 12);
    let r = acf(&x, 3).unwrap();
    assert!((r[1] - 0.7).abs() < 0.06);
    assert!((r[2] - 0.49).abs() < 0.08);
    assert!(r[3] < r[2] && r[2] < r[1]);
}

#[test]
fn pacf_lag_one_equals_adjusted_acf_ratio() {
    let x = ar1(0.3, 300, 13);
    let n = x.len() as f64;
    let m = x.iter().sum::<f64>() / n;
    let c0: f64 = x.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / n;
    let c1: f64 = x
        .windows(2)
        .map(|w| (w[0] - m) * (w[1] - m))
        .sum::<f64>()
        / (n - 1.0);
    let p = pacf_yw(&x, 1).unwrap();
    assert!((p[1] - c1 / c0).abs() < 1e-12);
}
