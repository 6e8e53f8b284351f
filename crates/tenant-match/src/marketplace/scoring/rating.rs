use serde::{Deserialize, Serialize};

/// Upper bound of every credential, overall and match score.
pub const MAX_SCORE: u8 = 100;

/// Label reported in place of a rating when tenant or listing data is missing.
pub const NOT_AVAILABLE_LABEL: &str = "N/A";

/// Qualitative band shared by credential scores and match reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreRating {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ScoreRating {
    pub const EXCELLENT_MIN: u8 = 85;
    pub const GOOD_MIN: u8 = 70;
    pub const FAIR_MIN: u8 = 60;

    pub const GOOD_MAX: f64 = (Self::EXCELLENT_MIN - 1) as f64;
    pub const FAIR_MAX: f64 = (Self::GOOD_MIN - 1) as f64;
    pub const POOR_MAX: f64 = (Self::FAIR_MIN - 1) as f64;

    pub const fn from_score(score: u8) -> Self {
        if score >= Self::EXCELLENT_MIN {
            ScoreRating::Excellent
        } else if score >= Self::GOOD_MIN {
            ScoreRating::Good
        } else if score >= Self::FAIR_MIN {
            ScoreRating::Fair
        } else {
            ScoreRating::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScoreRating::Excellent => "Excellent",
            ScoreRating::Good => "Good",
            ScoreRating::Fair => "Fair",
            ScoreRating::Poor => "Poor",
        }
    }
}

/// Label for a score using the shared thresholds.
pub const fn score_rating(score: u8) -> &'static str {
    ScoreRating::from_score(score).label()
}

/// Relative importance of the four credential categories.
///
/// The same weights combine credential sub-scores into the overall score and
/// category match percentages into the overall match score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryWeights {
    pub income: f64,
    pub credit: f64,
    pub rental_history: f64,
    pub employment: f64,
}

impl CategoryWeights {
    /// Ability to pay is weighted highest.
    pub const STANDARD: CategoryWeights = CategoryWeights {
        income: 0.35,
        credit: 0.30,
        rental_history: 0.20,
        employment: 0.15,
    };

    pub fn sum(&self) -> f64 {
        self.income + self.credit + self.rental_history + self.employment
    }

    /// Weighted sum of four values in `[0, 100]`, rounded to the nearest integer.
    pub fn combine(&self, income: u8, credit: u8, rental_history: u8, employment: u8) -> u8 {
        to_score(self.weighted(
            f64::from(income.min(MAX_SCORE)),
            f64::from(credit.min(MAX_SCORE)),
            f64::from(rental_history.min(MAX_SCORE)),
            f64::from(employment.min(MAX_SCORE)),
        ))
    }

    /// Unrounded weighted sum.
    pub fn weighted(&self, income: f64, credit: f64, rental_history: f64, employment: f64) -> f64 {
        income * self.income
            + credit * self.credit
            + rental_history * self.rental_history
            + employment * self.employment
    }
}

/// Round a computed value to the nearest integer score, clamped to `[0, 100]`.
pub(crate) fn to_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, f64::from(MAX_SCORE)) as u8
}
