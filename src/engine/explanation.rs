const FALLBACK_REASON: &str = "Recommended by multiple people";
const SEPARATOR: &str = " & ";

/// Collects the reasons a restaurant or dish was recommended.
#[derive(Debug, Default)]
pub struct Explanation {
    parts: Vec<&'static str>,
}

impl Explanation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn taste(mut self, taste_score: f64) -> Self {
        if taste_score >= 0.7 {
            self.parts.push("matches your taste");
        } else if taste_score >= 0.4 {
            self.parts.push("somewhat matches your taste");
        }
        self
    }

    pub fn cuisine(mut self, matched: bool) -> Self {
        if matched {
            self.parts.push("fits your cuisine preference");
        }
        self
    }

    pub fn diet(mut self, matched: bool) -> Self {
        if matched {
            self.parts.push("matches your diet");
        }
        self
    }

    pub fn popularity(mut self, normalized_popularity: f64) -> Self {
        if normalized_popularity >= 0.6 {
            self.parts.push("popular among others");
        } else if normalized_popularity >= 0.2 {
            self.parts.push("somewhat popular");
        }
        self
    }

    pub fn restaurant_taste(mut self, restaurant_score: f64) -> Self {
        if restaurant_score >= 0.6 {
            self.parts.push("restaurant taste matches you");
        }
        self
    }

    pub fn render(self) -> String {
        if self.parts.is_empty() {
            return FALLBACK_REASON.to_string();
        }
        self.parts.join(SEPARATOR)
    }
}
