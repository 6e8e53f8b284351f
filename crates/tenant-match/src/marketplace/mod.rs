//! Rental marketplace: tenant credential scoring and property matching.
//!
//! The scoring and matching engines are pure functions over plain values. The
//! service layer composes them with storage behind the repository traits, and the
//! router exposes the service over HTTP.

pub mod domain;
pub mod matching;
pub mod memory;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationStatus, ListingDetails, NewProperty, NewPropertyView, NewTenantProfile,
    ProfileId, ProfileUpdate, Property, PropertyId, PropertyRequirements, PropertyUpdate,
    PropertyView, PropertyViewId, PropertyViewUpdate, TenantCredentialProfile, UserId,
    VerificationFlags,
};
pub use matching::{
    generate_match_report, overall_match_score, rank_properties, sort_by_match_score,
    CategoryMatch, CategoryMatches, MatchAreas, MatchReport, PropertyMatch,
};
pub use memory::{
    InMemoryProfileRepository, InMemoryPropertyRepository, InMemoryPropertyViewRepository,
};
pub use repository::{
    ProfileRepository, PropertyRepository, PropertyViewRepository, RepositoryError,
};
pub use router::marketplace_router;
pub use scoring::{
    score_rating, CredentialScoreSummary, CredentialScores, ScoreRating, ScoringError,
    TenantFinancialInputs,
};
pub use service::{CredentialScoreRequest, MarketplaceError, MarketplaceService};
pub use validation::{FieldError, Validate, ValidationErrors};
