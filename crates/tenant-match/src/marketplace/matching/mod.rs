//! Property matching: how well a tenant's credential scores satisfy a listing's
//! stated minimums.
//!
//! Sub-scores are mapped back onto the units a landlord writes requirements in
//! (dollars, FICO points, months) with fixed linear approximations, then compared as a
//! capped ratio. A missing requirement never penalises a tenant.

mod report;

pub use report::{generate_match_report, CategoryMatch, MatchAreas, MatchReport};

use serde::Serialize;

use super::domain::{Property, PropertyRequirements, TenantCredentialProfile};
use super::scoring::{to_score, CategoryWeights, MAX_SCORE};

/// Dollars of annual income implied by one income score point.
pub const INCOME_PER_SCORE_POINT: f64 = 1500.0;
const FICO_FLOOR: f64 = 550.0;
const FICO_PER_SCORE_POINT: f64 = 2.5;
const RENTAL_MONTHS_PER_SCORE_POINT: f64 = 0.8;
const EMPLOYMENT_MONTHS_PER_SCORE_POINT: f64 = 0.6;

pub fn estimate_annual_income(income_score: u8) -> f64 {
    f64::from(income_score) * INCOME_PER_SCORE_POINT
}

pub fn estimate_fico(credit_score: u8) -> f64 {
    FICO_FLOOR + f64::from(credit_score) * FICO_PER_SCORE_POINT
}

pub fn estimate_rental_history_months(rental_history_score: u8) -> f64 {
    f64::from(rental_history_score) * RENTAL_MONTHS_PER_SCORE_POINT
}

pub fn estimate_employment_months(employment_score: u8) -> f64 {
    f64::from(employment_score) * EMPLOYMENT_MONTHS_PER_SCORE_POINT
}

/// A requirement only constrains when it is a positive, finite amount.
pub(crate) fn active_requirement(required: Option<f64>) -> Option<f64> {
    required.filter(|value| value.is_finite() && *value > 0.0)
}

/// Percentage of a requirement met, capped at 100.
///
/// No requirement (or a non-positive one) is full satisfaction; shortfalls scale
/// linearly.
pub fn category_match(estimated: f64, required: Option<f64>) -> u8 {
    match active_requirement(required) {
        Some(required) => to_score(estimated / required * 100.0),
        None => MAX_SCORE,
    }
}

/// Match percentages for each credential category against one listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryMatches {
    pub income: u8,
    pub credit: u8,
    pub rental_history: u8,
    pub employment: u8,
}

impl CategoryMatches {
    pub fn evaluate(profile: &TenantCredentialProfile, requirements: &PropertyRequirements) -> Self {
        Self {
            income: score_match(
                profile.income_score(),
                estimate_annual_income,
                requirements.minimum_income,
            ),
            credit: score_match(
                profile.credit_score(),
                estimate_fico,
                requirements.minimum_credit_score.map(f64::from),
            ),
            rental_history: score_match(
                profile.rental_history_score(),
                estimate_rental_history_months,
                requirements.required_rental_history.map(f64::from),
            ),
            employment: score_match(
                profile.employment_score(),
                estimate_employment_months,
                requirements.required_employment_stability.map(f64::from),
            ),
        }
    }

    pub fn overall(&self) -> u8 {
        CategoryWeights::STANDARD.combine(
            self.income,
            self.credit,
            self.rental_history,
            self.employment,
        )
    }
}

// A tenant score that was never computed is unknown rather than zero.
fn score_match(score: Option<u8>, estimate: fn(u8) -> f64, required: Option<f64>) -> u8 {
    match score {
        Some(score) => category_match(estimate(score), required),
        None => MAX_SCORE,
    }
}

/// Weighted match between a tenant and a listing; 0 when either is missing.
pub fn overall_match_score(
    profile: Option<&TenantCredentialProfile>,
    property: Option<&Property>,
) -> u8 {
    match (profile, property) {
        (Some(profile), Some(property)) => {
            CategoryMatches::evaluate(profile, &property.requirements).overall()
        }
        _ => 0,
    }
}

/// A listing paired with its match score for one tenant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyMatch {
    pub property: Property,
    pub match_score: u8,
}

/// Score every listing for a tenant, best match first.
///
/// Equal scores are ordered by ascending property id.
pub fn rank_properties(
    properties: &[Property],
    profile: &TenantCredentialProfile,
) -> Vec<PropertyMatch> {
    let mut ranked: Vec<PropertyMatch> = properties
        .iter()
        .map(|property| PropertyMatch {
            match_score: overall_match_score(Some(profile), Some(property)),
            property: property.clone(),
        })
        .collect();

    ranked.sort_by(|left, right| {
        right
            .match_score
            .cmp(&left.match_score)
            .then_with(|| left.property.id.cmp(&right.property.id))
    });
    ranked
}

/// A new vector of listings ordered by match score; the input is left untouched.
///
/// Without a profile there is nothing to rank by and the copy keeps input order.
pub fn sort_by_match_score(
    properties: &[Property],
    profile: Option<&TenantCredentialProfile>,
) -> Vec<Property> {
    match profile {
        Some(profile) => rank_properties(properties, profile)
            .into_iter()
            .map(|ranked| ranked.property)
            .collect(),
        None => properties.to_vec(),
    }
}
