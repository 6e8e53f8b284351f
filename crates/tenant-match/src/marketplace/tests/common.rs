use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::ScoringConfig;
use crate::marketplace::domain::{
    ListingDetails, NewProperty, NewTenantProfile, PropertyRequirements, UserId,
};
use crate::marketplace::marketplace_router;
use crate::marketplace::memory::{
    InMemoryProfileRepository, InMemoryPropertyRepository, InMemoryPropertyViewRepository,
};
use crate::marketplace::scoring::TenantFinancialInputs;
use crate::marketplace::service::{CredentialScoreRequest, MarketplaceService};

pub(super) type MemoryService = MarketplaceService<
    InMemoryProfileRepository,
    InMemoryPropertyRepository,
    InMemoryPropertyViewRepository,
>;

pub(super) const TENANT: UserId = UserId(7);
pub(super) const LANDLORD: UserId = UserId(40);

/// 85 / 72 / 91 / 88 with every category verified.
pub(super) fn verified_tenant(user_id: UserId) -> NewTenantProfile {
    NewTenantProfile {
        income_score: Some(85),
        credit_score: Some(72),
        rental_history_score: Some(91),
        employment_score: Some(88),
        income_verified: true,
        credit_score_verified: true,
        rental_history_verified: true,
        employment_verified: true,
        ..NewTenantProfile::for_user(user_id)
    }
}

pub(super) fn listing(title: &str) -> ListingDetails {
    ListingDetails {
        title: title.to_string(),
        description: format!("{title} with in-unit laundry"),
        address: "123 Main St".to_string(),
        city: "New York".to_string(),
        state: "NY".to_string(),
        zip_code: "10001".to_string(),
        price_per_month: 3_200.0,
        bedrooms: 2,
        bathrooms: 1.0,
        square_feet: 950,
        property_type: "apartment".to_string(),
        available_from: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
        featured: false,
        images: Vec::new(),
    }
}

pub(super) fn requirements(
    income: f64,
    credit: u16,
    rental_months: u32,
    employment_months: u32,
) -> PropertyRequirements {
    PropertyRequirements {
        minimum_income: Some(income),
        minimum_credit_score: Some(credit),
        required_rental_history: Some(rental_months),
        required_employment_stability: Some(employment_months),
    }
}

pub(super) fn new_property(title: &str, requirements: PropertyRequirements) -> NewProperty {
    NewProperty {
        landlord_id: LANDLORD,
        listing: listing(title),
        requirements,
    }
}

/// The three sample listings; the verified tenant matches them at 100, 98 and 90.
pub(super) fn sample_properties() -> Vec<NewProperty> {
    vec![
        new_property("Modern Downtown Apartment", requirements(96_000.0, 700, 24, 12)),
        new_property("Spacious Family Home", requirements(135_000.0, 720, 36, 24)),
        new_property("Luxury Penthouse Suite", requirements(174_000.0, 740, 24, 24)),
    ]
}

pub(super) fn financial_inputs() -> TenantFinancialInputs {
    TenantFinancialInputs {
        annual_income: 96_000.0,
        credit_score: 722,
        years_of_rental_history: 4.0,
        eviction_count: 0,
        late_payment_count: 1,
        years_at_current_job: 3.0,
        months_unemployed_last_3_years: 0,
    }
}

/// Scores 60 / 81 / 88 / 88 for an overall 76.
pub(super) fn score_request() -> CredentialScoreRequest {
    CredentialScoreRequest {
        inputs: financial_inputs(),
        monthly_rent: Some(3_200.0),
    }
}

pub(super) fn build_service() -> MemoryService {
    MarketplaceService::new(
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(InMemoryPropertyRepository::default()),
        Arc::new(InMemoryPropertyViewRepository::default()),
        ScoringConfig::default(),
    )
}

pub(super) fn seeded_service() -> MemoryService {
    let service = build_service();
    service
        .create_profile(verified_tenant(TENANT))
        .expect("profile created");
    for property in sample_properties() {
        service.create_property(property).expect("property listed");
    }
    service
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    marketplace_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
