use crate::models::taste::TasteVector;

/// Closeness of two taste vectors in `(0, 1]`: `1 / (1 + euclidean distance)`.
pub fn taste_similarity(a: &TasteVector, b: &TasteVector) -> f64 {
    1.0 / (1.0 + taste_distance(a, b))
}

pub fn taste_distance(a: &TasteVector, b: &TasteVector) -> f64 {
    let a = TasteVector::normalize(Some(a)).components();
    let b = TasteVector::normalize(Some(b)).components();

    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
