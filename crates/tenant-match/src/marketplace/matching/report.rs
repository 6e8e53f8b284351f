use serde::Serialize;

use super::super::domain::{Property, PropertyId, PropertyRequirements, TenantCredentialProfile};
use super::super::scoring::{score_rating, NOT_AVAILABLE_LABEL};
use super::{active_requirement, overall_match_score};

const UNAVAILABLE_DETAILS: &str = "Information unavailable";

/// One credential category in a match report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMatch {
    pub score: u8,
    pub rating: &'static str,
    pub details: String,
}

impl CategoryMatch {
    fn rated(score: Option<u8>, details: String) -> Self {
        let score = score.unwrap_or(0);
        Self {
            score,
            rating: score_rating(score),
            details,
        }
    }

    fn unavailable() -> Self {
        Self {
            score: 0,
            rating: NOT_AVAILABLE_LABEL,
            details: UNAVAILABLE_DETAILS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchAreas {
    pub income: CategoryMatch,
    pub credit_score: CategoryMatch,
    pub rental_history: CategoryMatch,
    pub employment: CategoryMatch,
}

/// Tenant/listing compatibility with a per-category breakdown. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub property_id: Option<PropertyId>,
    pub match_score: u8,
    pub match_areas: MatchAreas,
}

impl MatchReport {
    /// Neutral report rendered when the tenant profile or the listing is missing.
    pub fn unavailable(property_id: Option<PropertyId>) -> Self {
        Self {
            property_id,
            match_score: 0,
            match_areas: MatchAreas {
                income: CategoryMatch::unavailable(),
                credit_score: CategoryMatch::unavailable(),
                rental_history: CategoryMatch::unavailable(),
                employment: CategoryMatch::unavailable(),
            },
        }
    }
}

pub fn generate_match_report(
    profile: Option<&TenantCredentialProfile>,
    property: Option<&Property>,
) -> MatchReport {
    let (profile, property) = match (profile, property) {
        (Some(profile), Some(property)) => (profile, property),
        (_, property) => return MatchReport::unavailable(property.map(|property| property.id)),
    };

    let requirements = &property.requirements;
    MatchReport {
        property_id: Some(property.id),
        match_score: overall_match_score(Some(profile), Some(property)),
        match_areas: MatchAreas {
            income: CategoryMatch::rated(profile.income_score(), income_details(requirements)),
            credit_score: CategoryMatch::rated(
                profile.credit_score(),
                credit_details(requirements),
            ),
            rental_history: CategoryMatch::rated(
                profile.rental_history_score(),
                rental_history_details(requirements),
            ),
            employment: CategoryMatch::rated(
                profile.employment_score(),
                employment_details(requirements),
            ),
        },
    }
}

fn income_details(requirements: &PropertyRequirements) -> String {
    match active_requirement(requirements.minimum_income) {
        Some(minimum) => format!("Required: ${}/year", format_dollars(minimum)),
        None => "No minimum income requirement".to_string(),
    }
}

fn credit_details(requirements: &PropertyRequirements) -> String {
    match requirements.minimum_credit_score.filter(|score| *score > 0) {
        Some(minimum) => format!("Required: {minimum}+"),
        None => "No minimum credit score requirement".to_string(),
    }
}

fn rental_history_details(requirements: &PropertyRequirements) -> String {
    match requirements.required_rental_history.filter(|months| *months > 0) {
        Some(months) => format!("Required: {} years", months_to_years(months)),
        None => "No rental history requirement".to_string(),
    }
}

fn employment_details(requirements: &PropertyRequirements) -> String {
    match requirements
        .required_employment_stability
        .filter(|months| *months > 0)
    {
        Some(months) => format!("Required: {} years stability", months_to_years(months)),
        None => "No employment stability requirement".to_string(),
    }
}

fn months_to_years(months: u32) -> u64 {
    (f64::from(months) / 12.0).round() as u64
}

/// Whole dollars with thousands separators, e.g. `96,000`.
fn format_dollars(amount: f64) -> String {
    let digits = (amount.round() as u64).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
