use super::*;

fn matrix(points: &[Vec<f64>]) -> DistanceMatrix {
    DistanceMatrix::from_points(points).unwrap()
}

fn line(coords: &[f64]) -> Vec<Vec<f64>> {
    coords.iter().map(|&x| vec![x]).collect()
}

#[test]
fn test_perfect_projection_scores_one() {
    let points = vec![
        vec![0.0, 0.0],
        vec![1.0, 0.0],
        vec![0.0, 2.0],
        vec![3.0, 3.0],
        vec![5.0, 1.0],
        vec![2.0, 5.0],
    ];
    let d = matrix(&points);
    assert!((continuity(&d, &d, 2).unwrap() - 1.0).abs() < 1e-12);
    assert!((trustworthiness(&d, &d, 2).unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn test_same_knn_ranking_scores_one() {
    // the projection rescales every coordinate, so each point's distance
    // ordering is unchanged
    let points = vec![
        vec![0.0, 0.0],
        vec![1.0, 1.0],
        vec![4.0, 0.0],
        vec![0.0, 6.0],
        vec![7.0, 7.0],
    ];
    let scaled: Vec<Vec<f64>> = points
        .iter()
        .map(|p| p.iter().map(|x| 0.25 * x).collect())
        .collect();
    let high = matrix(&points);
    let low = matrix(&scaled);
    assert!((continuity(&high, &low, 2).unwrap() - 1.0).abs() < 1e-12);
    assert!((trustworthiness(&high, &low, 2).unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn test_known_rank_penalties() {
    // five collinear points; the projection moves the last point between
    // points 2 and 3, changing three nearest-neighbor sets
    let high = matrix(&line(&[0.0, 1.0, 3.0, 6.0, 10.0]));
    let low = matrix(&line(&[0.0, 1.0, 3.0, 6.0, 4.5]));

    // hand-computed with k = 1: continuity penalty 3, trustworthiness 5,
    // normalization 2 / (5 * 1 * (2*5 - 3 - 1)) = 1/15
    let c = continuity(&high, &low, 1).unwrap();
    let t = trustworthiness(&high, &low, 1).unwrap();
    assert!((c - 0.8).abs() < 1e-12);
    assert!((t - (2.0 / 3.0)).abs() < 1e-12);
}

#[test]
fn test_asymmetry_of_the_two_metrics() {
    let high = matrix(&line(&[0.0, 1.0, 3.0, 6.0, 10.0]));
    let low = matrix(&line(&[0.0, 1.0, 3.0, 6.0, 4.5]));
    let c = continuity(&high, &low, 1).unwrap();
    let t = trustworthiness(&high, &low, 1).unwrap();
    assert!(c != t);
}

#[test]
fn test_shape_mismatch_is_fatal() {
    let a = matrix(&line(&[0.0, 1.0, 2.0]));
    let b = matrix(&line(&[0.0, 1.0]));
    assert!(matches!(
        continuity(&a, &b, 1),
        Err(crate::error::EvalError::ShapeMismatch(_))
    ));
    assert!(matches!(
        trustworthiness(&a, &b, 1),
        Err(crate::error::EvalError::ShapeMismatch(_))
    ));
}

#[test]
fn test_oversized_k_is_capped() {
    // k larger than (n-1)/2 must not panic or leave the metric's range
    let high = matrix(&line(&[0.0, 1.0, 2.0]));
    let low = matrix(&line(&[0.0, 1.0, 2.0]));
    let c = continuity(&high, &low, 10).unwrap();
    assert!((c - 1.0).abs() < 1e-12);
}

#[test]
fn test_degenerate_normalizer_input_stays_finite() {
    // with 8 points, k = 5 makes the raw constant 2N - 3k - 1 zero; the
    // cap to (n-1)/2 = 3 keeps both metrics finite and in range
    let high = matrix(&line(&[0.0, 1.0, 3.0, 6.0, 10.0, 15.0, 21.0, 28.0]));
    let low = matrix(&line(&[0.0, 1.0, 3.0, 6.0, 4.5, 15.0, 21.0, 28.0]));

    let c = continuity(&high, &low, 5).unwrap();
    let t = trustworthiness(&high, &low, 5).unwrap();
    assert!(c.is_finite() && t.is_finite());
    assert!((c - continuity(&high, &low, 3).unwrap()).abs() < 1e-12);
    assert!((t - trustworthiness(&high, &low, 3).unwrap()).abs() < 1e-12);
}

#[test]
fn test_fewer_than_three_points_is_an_error() {
    let d = matrix(&line(&[0.0, 1.0]));
    assert!(matches!(
        continuity(&d, &d, 1),
        Err(EvalError::TooFewPoints(2))
    ));
    assert!(matches!(
        trustworthiness(&d, &d, 1),
        Err(EvalError::TooFewPoints(2))
    ));
}
