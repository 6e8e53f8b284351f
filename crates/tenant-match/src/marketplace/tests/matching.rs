use chrono::{TimeZone, Utc};

use super::common::*;

use crate::marketplace::domain::{
    NewTenantProfile, ProfileId, Property, PropertyId, PropertyRequirements,
    TenantCredentialProfile, UserId,
};
use crate::marketplace::matching::{
    generate_match_report, overall_match_score, rank_properties, sort_by_match_score,
    CategoryMatches,
};

fn profile(draft: NewTenantProfile) -> TenantCredentialProfile {
    let now = Utc
        .with_ymd_and_hms(2025, 4, 2, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    TenantCredentialProfile::create(ProfileId(1), draft, now)
}

fn property(id: u64, requirements: PropertyRequirements) -> Property {
    let now = Utc
        .with_ymd_and_hms(2025, 4, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    Property::create(PropertyId(id), new_property("Listing", requirements), now)
}

fn income_only(minimum_income: f64) -> PropertyRequirements {
    PropertyRequirements {
        minimum_income: Some(minimum_income),
        ..PropertyRequirements::default()
    }
}

fn sample_listings() -> Vec<Property> {
    sample_properties()
        .into_iter()
        .zip(1..)
        .map(|(draft, id)| property(id, draft.requirements))
        .collect()
}

#[test]
fn verified_tenant_matches_sample_listings() {
    let tenant = profile(verified_tenant(TENANT));
    let scores: Vec<u8> = sample_listings()
        .iter()
        .map(|listing| overall_match_score(Some(&tenant), Some(listing)))
        .collect();
    assert_eq!(scores, vec![100, 98, 90]);
}

#[test]
fn category_matches_compare_estimates_with_requirements() {
    let tenant = profile(verified_tenant(TENANT));
    let matches = CategoryMatches::evaluate(&tenant, &requirements(174_000.0, 740, 24, 24));

    // 85 * 1500 = 127_500 of 174_000; 550 + 72 * 2.5 = 730 of 740.
    assert_eq!(matches.income, 73);
    assert_eq!(matches.credit, 99);
    assert_eq!(matches.rental_history, 100);
    assert_eq!(matches.employment, 100);
    assert_eq!(matches.overall(), 90);
}

#[test]
fn missing_profile_or_listing_scores_zero() {
    let tenant = profile(verified_tenant(TENANT));
    let listing = property(1, PropertyRequirements::default());

    assert_eq!(overall_match_score(None, Some(&listing)), 0);
    assert_eq!(overall_match_score(Some(&tenant), None), 0);
    assert_eq!(overall_match_score(None, None), 0);
}

#[test]
fn listing_without_requirements_is_a_full_match() {
    let tenant = profile(NewTenantProfile {
        income_score: Some(5),
        credit_score: Some(0),
        rental_history_score: Some(0),
        employment_score: Some(0),
        ..NewTenantProfile::for_user(UserId(3))
    });
    let listing = property(1, PropertyRequirements::default());
    assert_eq!(overall_match_score(Some(&tenant), Some(&listing)), 100);
}

#[test]
fn unscored_categories_do_not_penalise() {
    let tenant = profile(NewTenantProfile {
        income_score: Some(32),
        ..NewTenantProfile::for_user(UserId(3))
    });
    let listing = property(1, requirements(96_000.0, 700, 24, 12));

    let matches = CategoryMatches::evaluate(&tenant, &listing.requirements);
    assert_eq!(matches.income, 50);
    assert_eq!(matches.credit, 100);
    assert_eq!(matches.rental_history, 100);
    assert_eq!(matches.employment, 100);
}

#[test]
fn zero_score_is_evaluated_against_requirement() {
    let tenant = profile(NewTenantProfile {
        rental_history_score: Some(0),
        ..NewTenantProfile::for_user(UserId(3))
    });
    let matches = CategoryMatches::evaluate(&tenant, &requirements(96_000.0, 700, 24, 12));
    assert_eq!(matches.rental_history, 0);
}

#[test]
fn sorting_returns_new_vector_best_first() {
    let tenant = profile(verified_tenant(TENANT));
    // 74, 100 and 91 for this tenant.
    let listings = vec![
        property(1, income_only(510_000.0)),
        property(2, PropertyRequirements::default()),
        property(3, income_only(170_000.0)),
    ];
    let before = listings.clone();

    let sorted = sort_by_match_score(&listings, Some(&tenant));
    let ids: Vec<u64> = sorted.iter().map(|listing| listing.id.0).collect();
    assert_eq!(ids, vec![2, 3, 1]);
    assert_eq!(listings, before);

    let scores: Vec<u8> = rank_properties(&listings, &tenant)
        .into_iter()
        .map(|ranked| ranked.match_score)
        .collect();
    assert_eq!(scores, vec![100, 91, 74]);
}

#[test]
fn equal_scores_keep_ascending_ids() {
    let tenant = profile(verified_tenant(TENANT));
    let listings = vec![
        property(9, PropertyRequirements::default()),
        property(4, PropertyRequirements::default()),
        property(6, income_only(510_000.0)),
        property(5, PropertyRequirements::default()),
    ];

    let ids: Vec<u64> = rank_properties(&listings, &tenant)
        .iter()
        .map(|ranked| ranked.property.id.0)
        .collect();
    assert_eq!(ids, vec![4, 5, 9, 6]);
}

#[test]
fn sorting_without_profile_keeps_input_order() {
    let listings = vec![
        property(3, PropertyRequirements::default()),
        property(1, income_only(510_000.0)),
    ];
    let sorted = sort_by_match_score(&listings, None);
    assert_eq!(sorted, listings);
    assert!(sort_by_match_score(&[], None).is_empty());
}

#[test]
fn report_breaks_down_each_category() {
    let tenant = profile(verified_tenant(TENANT));
    let listing = property(3, requirements(174_000.0, 740, 24, 24));

    let report = generate_match_report(Some(&tenant), Some(&listing));
    assert_eq!(report.property_id, Some(PropertyId(3)));
    assert_eq!(report.match_score, 90);

    let areas = &report.match_areas;
    assert_eq!(areas.income.score, 85);
    assert_eq!(areas.income.rating, "Excellent");
    assert_eq!(areas.income.details, "Required: $174,000/year");
    assert_eq!(areas.credit_score.score, 72);
    assert_eq!(areas.credit_score.rating, "Good");
    assert_eq!(areas.credit_score.details, "Required: 740+");
    assert_eq!(areas.rental_history.details, "Required: 2 years");
    assert_eq!(areas.employment.details, "Required: 2 years stability");
}

#[test]
fn report_without_profile_is_unavailable() {
    let listing = property(2, requirements(96_000.0, 700, 24, 12));
    let report = generate_match_report(None, Some(&listing));

    assert_eq!(report.property_id, Some(PropertyId(2)));
    assert_eq!(report.match_score, 0);
    for area in [
        &report.match_areas.income,
        &report.match_areas.credit_score,
        &report.match_areas.rental_history,
        &report.match_areas.employment,
    ] {
        assert_eq!(area.score, 0);
        assert_eq!(area.rating, "N/A");
        assert_eq!(area.details, "Information unavailable");
    }
}

#[test]
fn report_rates_unscored_categories_as_zero() {
    let tenant = profile(NewTenantProfile {
        income_score: Some(62),
        ..NewTenantProfile::for_user(UserId(3))
    });
    let listing = property(1, PropertyRequirements::default());
    let report = generate_match_report(Some(&tenant), Some(&listing));

    assert_eq!(report.match_areas.income.rating, "Fair");
    assert_eq!(report.match_areas.credit_score.score, 0);
    assert_eq!(report.match_areas.credit_score.rating, "Poor");
    assert_eq!(
        report.match_areas.credit_score.details,
        "No minimum credit score requirement"
    );
}
