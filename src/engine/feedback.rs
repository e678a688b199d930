use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::restaurant::Restaurant;
use crate::models::scored::round_to;
use crate::models::taste::TasteVector;

const MIN_RATING: f64 = 1.0;
const MAX_RATING: f64 = 5.0;

/// A diner's taste report for one order, on the same 0..=10 scale as taste
/// vectors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TasteFeedback {
    pub spice: f64,
    pub oil: f64,
    pub sweet: f64,
}

impl TasteFeedback {
    pub fn validate(&self) -> Result<(), AppError> {
        if [self.spice, self.oil, self.sweet]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(AppError::InvalidInput(
                "feedback values must be non-negative numbers".to_string(),
            ));
        }
        Ok(())
    }

    fn as_taste(&self) -> TasteVector {
        TasteVector::new(self.spice, self.oil, self.sweet)
    }

    /// Feedback mapped onto the 1..=5 rating scale.
    pub fn implied_rating(&self) -> f64 {
        let mean = (self.spice + self.oil + self.sweet) / 3.0;
        (mean / 2.0).clamp(MIN_RATING, MAX_RATING)
    }
}

fn running_mean(current: f64, count: f64, sample: f64) -> f64 {
    (current * count + sample) / (count + 1.0)
}

/// Folds one feedback into the restaurant's crowd taste tags and rating.
pub fn apply_to_restaurant(restaurant: &mut Restaurant, feedback: &TasteFeedback) {
    let count = f64::from(restaurant.feedback_count);
    let tags = restaurant.taste_tags();
    let sample = feedback.as_taste();

    restaurant.taste_tags = Some(TasteVector::new(
        running_mean(tags.spice, count, sample.spice).round(),
        running_mean(tags.oil, count, sample.oil).round(),
        running_mean(tags.sweet, count, sample.sweet).round(),
    ));
    restaurant.rating = Some(round_to(
        running_mean(restaurant.rating(), count, feedback.implied_rating()),
        1,
    ));
    restaurant.feedback_count = restaurant.feedback_count.saturating_add(1);
}

/// Moves a user's taste halfway towards what they just reported.
pub fn blend_user_taste(current: &TasteVector, feedback: &TasteFeedback) -> TasteVector {
    let current = TasteVector::normalize(Some(current));
    TasteVector::new(
        ((current.spice + feedback.spice) / 2.0).round(),
        ((current.oil + feedback.oil) / 2.0).round(),
        ((current.sweet + feedback.sweet) / 2.0).round(),
    )
}

#[cfg(test)]
mod tests {
    use super::{apply_to_restaurant, blend_user_taste, TasteFeedback};
    use crate::error::AppError;
    use crate::models::location::GeoPoint;
    use crate::models::restaurant::Restaurant;
    use crate::models::taste::TasteVector;

    fn feedback(spice: f64, oil: f64, sweet: f64) -> TasteFeedback {
        TasteFeedback { spice, oil, sweet }
    }

    #[test]
    fn first_feedback_replaces_defaults() {
        let mut r = Restaurant::new("r", GeoPoint::new(0.0, 0.0));
        apply_to_restaurant(&mut r, &feedback(8.0, 2.0, 5.0));

        assert_eq!(r.taste_tags, Some(TasteVector::new(8.0, 2.0, 5.0)));
        assert_eq!(r.feedback_count, 1);
        // mean 5 → rating 2.5, first sample replaces the default 4
        assert_eq!(r.rating, Some(2.5));
    }

    #[test]
    fn later_feedback_is_averaged() {
        let mut r = Restaurant::new("r", GeoPoint::new(0.0, 0.0))
            .with_taste_tags(TasteVector::new(4.0, 4.0, 4.0))
            .with_rating(4.0);
        r.feedback_count = 3;

        apply_to_restaurant(&mut r, &feedback(8.0, 0.0, 4.0));

        assert_eq!(r.taste_tags, Some(TasteVector::new(5.0, 3.0, 4.0)));
        // implied rating clamp(4 / 2) = 2, (4 * 3 + 2) / 4 = 3.5
        assert_eq!(r.rating, Some(3.5));
        assert_eq!(r.feedback_count, 4);
    }

    #[test]
    fn implied_rating_is_clamped() {
        assert_eq!(feedback(0.0, 0.0, 0.0).implied_rating(), 1.0);
        assert_eq!(feedback(10.0, 10.0, 10.0).implied_rating(), 5.0);
    }

    #[test]
    fn user_taste_moves_halfway() {
        let blended = blend_user_taste(&TasteVector::new(3.0, 3.0, 3.0), &feedback(8.0, 0.0, 3.0));
        assert_eq!(blended, TasteVector::new(6.0, 2.0, 3.0));
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(matches!(
            feedback(-1.0, 2.0, 2.0).validate(),
            Err(AppError::InvalidInput(_))
        ));
        assert!(feedback(0.0, 10.0, 2.0).validate().is_ok());
    }
}
