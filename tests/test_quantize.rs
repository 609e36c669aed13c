mod common;

use feature_bank::quantize::{check, error_bound, quantize, score, true_score};

const V_DIM: usize = common::V_DIM;
const N: usize = common::N;

#[test]
fn test_self_similarity_64() {
    let bank = common::build_bank(5, 64, 10);
    let report = check(&bank, &bank, 125).unwrap();
    let s = &report.approx;
    assert_eq!((s.rows(), s.cols()), (5, 5));

    for i in 0..5 {
        assert!((report.exact.get(i, i) - 1.0).abs() <= 1e-5);
        // One rounding step is 1/125; the diagonal drifts by a few thousandths.
        assert!((s.get(i, i) - 1.0).abs() <= 0.02, "diag {}", s.get(i, i));
        for j in (0..5).filter(|&j| j != i) {
            assert!(s.get(i, j).abs() < 0.6, "off-diagonal {}", s.get(i, j));
            assert_eq!(s.get(i, j), s.get(j, i));
        }
    }
}

#[test]
fn test_drift_within_analytic_bound() {
    for (seed, precision) in [(20, 50), (21, 125), (22, 500), (23, 1000)] {
        let gallery = common::build_bank(N, V_DIM, seed);
        let probe = common::build_bank(N, V_DIM, seed + 100);
        let report = check(&probe, &gallery, precision).unwrap();
        assert_eq!(report.bound, error_bound(V_DIM, precision));
        assert!(report.within_bound(), "p={precision}: {}", report.max_abs_error);
        assert!(report.mean_abs_error <= report.max_abs_error);
    }
}

#[test]
fn test_drift_regression() {
    // Observed drift is far below the worst case: a few tenths of a step.
    for (seed, precision) in [(30, 50), (31, 125), (32, 250)] {
        let gallery = common::build_bank(N, V_DIM, seed);
        let probe = common::build_bank(N, V_DIM, seed + 100);
        let report = check(&probe, &gallery, precision).unwrap();
        assert!(
            report.max_abs_error <= 3.0 / f64::from(precision),
            "p={precision}: {}",
            report.max_abs_error
        );
    }
}

#[test]
fn test_drift_shrinks_with_precision() {
    let gallery = common::build_bank(N, V_DIM, 40);
    let probe = common::build_bank(N, V_DIM, 41);
    let coarse = check(&probe, &gallery, 50).unwrap();
    let fine = check(&probe, &gallery, 5000).unwrap();
    assert!(fine.max_abs_error < coarse.max_abs_error);
}

#[test]
fn test_score_orientation() {
    let gallery = common::build_bank(7, 32, 50);
    let probe = common::build_bank(3, 32, 51);
    let qs = score(
        &quantize(&probe, 125).unwrap(),
        &quantize(&gallery, 125).unwrap(),
        125,
    )
    .unwrap();
    let exact = true_score(&probe, &gallery).unwrap();
    assert_eq!((qs.rows(), qs.cols()), (3, 7));
    assert_eq!((exact.rows(), exact.cols()), (3, 7));
}
