//! Credential scoring: raw tenant financial facts to normalized 0-100 sub-scores.
//!
//! Every curve is a pure function. Decimal inputs that are negative or not finite,
//! and non-positive annual income, are rejected with [`ScoringError::InvalidInput`]
//! instead of being silently corrected. The only implicit correction is clamping a
//! result into `[0, 100]`.

mod rating;

pub use rating::{
    score_rating, CategoryWeights, ScoreRating, MAX_SCORE, NOT_AVAILABLE_LABEL,
};
pub(crate) use rating::to_score;

use serde::{Deserialize, Serialize};

/// Longest unemployment window the employment curve considers, in months.
pub const UNEMPLOYMENT_WINDOW_MONTHS: u32 = 36;

const HISTORY_YEARS_CAP: f64 = 5.0;
const BASE_BEHAVIOR_SCORE: f64 = 70.0;

/// Error raised when a scoring input lies outside the domain of its curve.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl ScoringError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ScoringError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ScoringError> {
    if !value.is_finite() {
        return Err(ScoringError::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(ScoringError::invalid(field, "must not be negative"));
    }
    Ok(value)
}

/// Ratio of a year of rent to annual income.
pub fn rent_to_income_ratio(annual_income: f64, monthly_rent: f64) -> Result<f64, ScoringError> {
    let annual_income = non_negative("annual_income", annual_income)?;
    if annual_income == 0.0 {
        return Err(ScoringError::invalid(
            "annual_income",
            "must be greater than zero",
        ));
    }
    let monthly_rent = non_negative("monthly_rent", monthly_rent)?;
    Ok(monthly_rent * 12.0 / annual_income)
}

/// Affordability score; a lower rent-to-income ratio scores higher.
///
/// Band edges are inclusive on the lower band: a ratio of exactly 0.30 is scored
/// by the "Good" curve and exactly 0.40 by the "Fair" curve.
pub fn income_score(annual_income: f64, monthly_rent: f64) -> Result<f64, ScoringError> {
    let ratio = rent_to_income_ratio(annual_income, monthly_rent)?;

    let score = if ratio <= 0.25 {
        (100.0 - ratio * 100.0)
            .max(f64::from(ScoreRating::EXCELLENT_MIN))
            .min(f64::from(MAX_SCORE))
    } else if ratio <= 0.30 {
        (95.0 - (ratio - 0.25) * 200.0)
            .max(f64::from(ScoreRating::GOOD_MIN))
            .min(ScoreRating::GOOD_MAX)
    } else if ratio <= 0.40 {
        (75.0 - (ratio - 0.30) * 150.0)
            .max(f64::from(ScoreRating::FAIR_MIN))
            .min(ScoreRating::FAIR_MAX)
    } else {
        (55.0 - (ratio - 0.40) * 100.0).max(0.0)
    };

    Ok(score)
}

/// Map a FICO-style credit score (roughly 300-850) onto 0-100.
pub fn credit_score_rating(fico: u16) -> f64 {
    let fico = f64::from(fico);

    if fico >= 750.0 {
        (85.0 + (fico - 750.0) / 10.0).min(f64::from(MAX_SCORE))
    } else if fico >= 700.0 {
        (70.0 + (fico - 700.0) / 2.0).min(ScoreRating::GOOD_MAX)
    } else if fico >= 650.0 {
        (60.0 + (fico - 650.0) / 2.0).min(ScoreRating::FAIR_MAX)
    } else if fico >= 580.0 {
        (30.0 + (fico - 580.0) / 2.0).min(ScoreRating::POOR_MAX)
    } else {
        (30.0 - (580.0 - fico) / 10.0).max(0.0)
    }
}

/// Rental track record: years of history help, evictions dominate.
pub fn rental_history_score(
    years_of_history: f64,
    eviction_count: u32,
    late_payment_count: u32,
) -> Result<f64, ScoringError> {
    let years = non_negative("years_of_rental_history", years_of_history)?;

    let score = BASE_BEHAVIOR_SCORE + years.min(HISTORY_YEARS_CAP) * 5.0
        - f64::from(eviction_count) * 50.0
        - f64::from(late_payment_count) * 2.0;

    Ok(score.clamp(0.0, f64::from(MAX_SCORE)))
}

/// Employment stability: tenure at the current job against recent unemployment.
pub fn employment_score(
    years_at_job: f64,
    months_unemployed_last_3_years: u32,
) -> Result<f64, ScoringError> {
    let years = non_negative("years_at_current_job", years_at_job)?;
    if months_unemployed_last_3_years > UNEMPLOYMENT_WINDOW_MONTHS {
        return Err(ScoringError::invalid(
            "months_unemployed_last_3_years",
            format!("must not exceed {UNEMPLOYMENT_WINDOW_MONTHS}"),
        ));
    }

    let score = BASE_BEHAVIOR_SCORE + years.min(HISTORY_YEARS_CAP) * 6.0
        - f64::from(months_unemployed_last_3_years) * 3.0;

    Ok(score.clamp(0.0, f64::from(MAX_SCORE)))
}

/// Weighted credential score from the four stored sub-scores.
pub fn overall_score(income: u8, credit: u8, rental_history: u8, employment: u8) -> u8 {
    CategoryWeights::STANDARD.combine(income, credit, rental_history, employment)
}

/// Financial and behavioral facts supplied by a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantFinancialInputs {
    pub annual_income: f64,
    pub credit_score: u16,
    pub years_of_rental_history: f64,
    pub eviction_count: u32,
    pub late_payment_count: u32,
    pub years_at_current_job: f64,
    pub months_unemployed_last_3_years: u32,
}

/// The four stored sub-scores with the overall score derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialScores {
    pub income: u8,
    pub credit: u8,
    pub rental_history: u8,
    pub employment: u8,
    pub overall: u8,
}

impl CredentialScores {
    /// Score a tenant's inputs against the given monthly rent.
    ///
    /// Sub-scores are rounded for storage; the overall score is the weighted sum of
    /// the unrounded curves, rounded once.
    pub fn from_inputs(
        inputs: &TenantFinancialInputs,
        monthly_rent: f64,
    ) -> Result<Self, ScoringError> {
        let income = income_score(inputs.annual_income, monthly_rent)?;
        let credit = credit_score_rating(inputs.credit_score);
        let rental_history = rental_history_score(
            inputs.years_of_rental_history,
            inputs.eviction_count,
            inputs.late_payment_count,
        )?;
        let employment = employment_score(
            inputs.years_at_current_job,
            inputs.months_unemployed_last_3_years,
        )?;

        Ok(Self {
            income: to_score(income),
            credit: to_score(credit),
            rental_history: to_score(rental_history),
            employment: to_score(employment),
            overall: to_score(CategoryWeights::STANDARD.weighted(
                income,
                credit,
                rental_history,
                employment,
            )),
        })
    }

    pub fn from_sub_scores(income: u8, credit: u8, rental_history: u8, employment: u8) -> Self {
        let income = income.min(MAX_SCORE);
        let credit = credit.min(MAX_SCORE);
        let rental_history = rental_history.min(MAX_SCORE);
        let employment = employment.min(MAX_SCORE);
        Self {
            income,
            credit,
            rental_history,
            employment,
            overall: overall_score(income, credit, rental_history, employment),
        }
    }

    pub fn rating(&self) -> ScoreRating {
        ScoreRating::from_score(self.overall)
    }

    pub fn summary(&self) -> CredentialScoreSummary {
        CredentialScoreSummary {
            income_score: self.income,
            credit_score: self.credit,
            rental_history_score: self.rental_history,
            employment_score: self.employment,
            overall_score: self.overall,
            rating: self.rating().label(),
        }
    }
}

/// Response view of [`CredentialScores`] with the rating label attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CredentialScoreSummary {
    pub income_score: u8,
    pub credit_score: u8,
    pub rental_history_score: u8,
    pub employment_score: u8,
    pub overall_score: u8,
    pub rating: &'static str,
}
