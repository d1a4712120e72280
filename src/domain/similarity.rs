//! Vector arithmetic used for scoring. Inputs are `f32` embeddings,
//! accumulation is done in `f64`.

/// Sum of elementwise products. Both slices must have the same length.
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "dot on vectors of unequal length");
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| *x as f64 * *y as f64)
        .sum()
}

pub fn norm_squared(a: &[f32]) -> f64 {
    dot(a, a)
}

pub fn norm(a: &[f32]) -> f64 {
    norm_squared(a).sqrt()
}

/// Cosine similarity in `[-1, 1]`.
///
/// When either vector has zero norm the denominator is taken as `1`, so a
/// degenerate all-zero embedding scores `0` against everything instead of
/// producing NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let denom = norm(a) * norm(b);
    let denom = if denom == 0.0 { 1.0 } else { denom };
    dot(a, b) / denom
}

/// True for a non-empty vector of finite values.
pub fn is_valid(v: &[f32]) -> bool {
    !v.is_empty() && v.iter().all(|x| x.is_finite())
}
