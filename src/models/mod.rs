pub mod assignment;
pub mod donation;
pub mod location;
pub mod ngo;
pub mod order;
pub mod restaurant;
pub mod scored;
pub mod taste;
pub mod user;

/// Replaces an absent or non-finite number with `default`.
///
/// Every optional numeric field of the records goes through here before it
/// reaches a scoring function.
pub fn number_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::number_or;

    #[test]
    fn missing_and_nan_fall_back() {
        assert_eq!(number_or(None, 3.0), 3.0);
        assert_eq!(number_or(Some(f64::NAN), 3.0), 3.0);
        assert_eq!(number_or(Some(f64::INFINITY), 4.0), 4.0);
        assert_eq!(number_or(Some(7.5), 3.0), 7.5);
    }
}
