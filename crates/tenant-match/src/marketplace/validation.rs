use std::fmt;

use serde::Serialize;

use super::domain::{
    ListingDetails, NewProperty, NewPropertyView, NewTenantProfile, ProfileUpdate,
    PropertyRequirements, PropertyUpdate,
};
use super::scoring::{TenantFinancialInputs, MAX_SCORE, UNEMPLOYMENT_WINDOW_MONTHS};

/// One rejected field in a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

/// Every problem found in a payload, reported together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = self
            .errors
            .iter()
            .map(|error| format!("{} {}", error.field, error.reason))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "invalid payload: {detail}")
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, reason: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            reason: reason.into(),
        });
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    fn score(&mut self, field: &'static str, value: Option<u8>) {
        if let Some(score) = value {
            if score > MAX_SCORE {
                self.push(field, format!("must be between 0 and {MAX_SCORE}"));
            }
        }
    }

    fn amount(&mut self, field: &'static str, value: f64) {
        if !value.is_finite() {
            self.push(field, "must be a finite number");
        } else if value < 0.0 {
            self.push(field, "must not be negative");
        }
    }

    fn text(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "must not be blank");
        }
    }
}

/// Schema check run before a payload reaches the service.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

impl Validate for TenantFinancialInputs {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.amount("annual_income", self.annual_income);
        if self.annual_income.is_finite() && self.annual_income == 0.0 {
            errors.push("annual_income", "must be greater than zero");
        }
        errors.amount("years_of_rental_history", self.years_of_rental_history);
        errors.amount("years_at_current_job", self.years_at_current_job);
        if self.months_unemployed_last_3_years > UNEMPLOYMENT_WINDOW_MONTHS {
            errors.push(
                "months_unemployed_last_3_years",
                format!("must not exceed {UNEMPLOYMENT_WINDOW_MONTHS}"),
            );
        }
        errors.into_result()
    }
}

impl Validate for NewTenantProfile {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.score("income_score", self.income_score);
        errors.score("credit_score", self.credit_score);
        errors.score("rental_history_score", self.rental_history_score);
        errors.score("employment_score", self.employment_score);
        errors.into_result()
    }
}

impl Validate for ProfileUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.score("income_score", self.income_score);
        errors.score("credit_score", self.credit_score);
        errors.score("rental_history_score", self.rental_history_score);
        errors.score("employment_score", self.employment_score);
        errors.into_result()
    }
}

fn check_listing(errors: &mut ValidationErrors, listing: &ListingDetails) {
    errors.text("title", &listing.title);
    errors.text("description", &listing.description);
    errors.text("address", &listing.address);
    errors.text("city", &listing.city);
    errors.text("state", &listing.state);
    errors.text("zip_code", &listing.zip_code);
    errors.text("property_type", &listing.property_type);
    errors.amount("price_per_month", listing.price_per_month);
    errors.amount("bathrooms", f64::from(listing.bathrooms));
}

fn check_requirements(errors: &mut ValidationErrors, requirements: &PropertyRequirements) {
    if let Some(minimum_income) = requirements.minimum_income {
        errors.amount("minimum_income", minimum_income);
    }
}

impl Validate for NewProperty {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_listing(&mut errors, &self.listing);
        check_requirements(&mut errors, &self.requirements);
        errors.into_result()
    }
}

impl Validate for PropertyUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let texts = [
            ("title", &self.title),
            ("description", &self.description),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip_code", &self.zip_code),
            ("property_type", &self.property_type),
        ];
        for (field, value) in texts {
            if let Some(value) = value {
                errors.text(field, value);
            }
        }
        if let Some(price) = self.price_per_month {
            errors.amount("price_per_month", price);
        }
        if let Some(bathrooms) = self.bathrooms {
            errors.amount("bathrooms", f64::from(bathrooms));
        }
        if let Some(Some(minimum_income)) = self.minimum_income {
            errors.amount("minimum_income", minimum_income);
        }
        errors.into_result()
    }
}

impl Validate for NewPropertyView {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.score("match_score", self.match_score);
        errors.into_result()
    }
}
