//! Vector similarity used by the loop scoring passes

/// Cosine similarity `(a · b) / (|a| * |b|)`
///
/// Returns `0.0` when either vector has zero norm, so callers never see NaN.
/// Vectors are compared over their common prefix.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_product = norm(a) * norm(b);
    if norm_product == 0.0 {
        0.0
    } else {
        dot / norm_product
    }
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}
