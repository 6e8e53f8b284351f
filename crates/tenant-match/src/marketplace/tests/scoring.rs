use super::common::*;

use crate::config::ScoringConfig;
use crate::marketplace::scoring::{CredentialScores, ScoreRating, ScoringError};
use crate::marketplace::service::{CredentialScoreRequest, MarketplaceError};
use crate::marketplace::validation::Validate;

#[test]
fn scores_financial_inputs_against_listing_rent() {
    let service = build_service();
    let scores = service.preview_scores(&score_request()).expect("valid inputs");

    assert_eq!(
        scores,
        CredentialScores {
            income: 60,
            credit: 81,
            rental_history: 88,
            employment: 88,
            overall: 76,
        }
    );
    assert_eq!(scores.rating(), ScoreRating::Good);
    assert_eq!(scores.rating().label(), "Good");
}

#[test]
fn falls_back_to_reference_rent() {
    let service = build_service();
    let request = CredentialScoreRequest {
        monthly_rent: None,
        ..score_request()
    };

    let scores = service.preview_scores(&request).expect("valid inputs");
    let expected = CredentialScores::from_inputs(
        &request.inputs,
        ScoringConfig::DEFAULT_REFERENCE_RENT,
    )
    .expect("valid inputs");
    assert_eq!(scores, expected);
    // 36_000 / 96_000 = 0.375 on the Fair curve.
    assert_eq!(scores.income, 64);
}

#[test]
fn schema_errors_are_collected_before_scoring() {
    let mut inputs = financial_inputs();
    inputs.annual_income = 0.0;
    inputs.years_at_current_job = -1.0;
    inputs.months_unemployed_last_3_years = 40;

    let errors = inputs.validate().expect_err("three problems");
    let fields: Vec<_> = errors.errors.iter().map(|error| error.field).collect();
    assert_eq!(
        fields,
        vec![
            "annual_income",
            "years_at_current_job",
            "months_unemployed_last_3_years"
        ]
    );

    let service = build_service();
    let request = CredentialScoreRequest {
        inputs,
        monthly_rent: Some(2_000.0),
    };
    let err = service.preview_scores(&request).expect_err("rejected");
    assert!(matches!(err, MarketplaceError::Validation(_)));
}

#[test]
fn negative_rent_is_an_invalid_scoring_input() {
    let service = build_service();
    let request = CredentialScoreRequest {
        monthly_rent: Some(-10.0),
        ..score_request()
    };

    let err = service.preview_scores(&request).expect_err("rejected");
    match err {
        MarketplaceError::Scoring(ScoringError::InvalidInput { field, .. }) => {
            assert_eq!(field, "monthly_rent");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn eviction_heavy_history_rates_poor() {
    let mut inputs = financial_inputs();
    inputs.eviction_count = 2;
    inputs.credit_score = 560;
    inputs.months_unemployed_last_3_years = 20;

    let scores = CredentialScores::from_inputs(&inputs, 3_200.0).expect("valid inputs");
    assert_eq!(scores.rental_history, 0);
    assert_eq!(scores.credit, 28);
    assert_eq!(scores.rating(), ScoreRating::Poor);
}
