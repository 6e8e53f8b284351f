use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{
    NewProperty, NewPropertyView, NewTenantProfile, ProfileUpdate, Property, PropertyId,
    PropertyUpdate, PropertyView, PropertyViewId, PropertyViewUpdate, TenantCredentialProfile,
    UserId,
};
use super::matching::{
    generate_match_report, overall_match_score, rank_properties, MatchReport, PropertyMatch,
};
use super::repository::{
    ProfileRepository, PropertyRepository, PropertyViewRepository, RepositoryError,
};
use super::scoring::{CredentialScores, ScoringError, TenantFinancialInputs};
use super::validation::{Validate, ValidationErrors};
use crate::config::ScoringConfig;

/// Financial inputs plus the rent to score affordability against.
///
/// The wire form is flat and rejects unknown keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CredentialScorePayload")]
pub struct CredentialScoreRequest {
    #[serde(flatten)]
    pub inputs: TenantFinancialInputs,
    /// Defaults to the configured reference rent.
    #[serde(default)]
    pub monthly_rent: Option<f64>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CredentialScorePayload {
    annual_income: f64,
    credit_score: u16,
    years_of_rental_history: f64,
    eviction_count: u32,
    late_payment_count: u32,
    years_at_current_job: f64,
    months_unemployed_last_3_years: u32,
    #[serde(default)]
    monthly_rent: Option<f64>,
}

impl From<CredentialScorePayload> for CredentialScoreRequest {
    fn from(payload: CredentialScorePayload) -> Self {
        Self {
            inputs: TenantFinancialInputs {
                annual_income: payload.annual_income,
                credit_score: payload.credit_score,
                years_of_rental_history: payload.years_of_rental_history,
                eviction_count: payload.eviction_count,
                late_payment_count: payload.late_payment_count,
                years_at_current_job: payload.years_at_current_job,
                months_unemployed_last_3_years: payload.months_unemployed_last_3_years,
            },
            monthly_rent: payload.monthly_rent,
        }
    }
}

/// Service composing the marketplace repositories with the scoring and matching engines.
pub struct MarketplaceService<P, R, V> {
    profiles: Arc<P>,
    properties: Arc<R>,
    views: Arc<V>,
    scoring: ScoringConfig,
}

impl<P, R, V> MarketplaceService<P, R, V>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    pub fn new(
        profiles: Arc<P>,
        properties: Arc<R>,
        views: Arc<V>,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            profiles,
            properties,
            views,
            scoring,
        }
    }

    pub fn scoring_config(&self) -> ScoringConfig {
        self.scoring
    }

    /// Score financial inputs without touching any stored profile.
    pub fn preview_scores(
        &self,
        request: &CredentialScoreRequest,
    ) -> Result<CredentialScores, MarketplaceError> {
        request.inputs.validate().map_err(|errors| {
            warn!(%errors, "rejected credential inputs");
            errors
        })?;
        let rent = request
            .monthly_rent
            .unwrap_or(self.scoring.reference_monthly_rent);
        Ok(CredentialScores::from_inputs(&request.inputs, rent)?)
    }

    pub fn profile(&self, user_id: UserId) -> Result<TenantCredentialProfile, MarketplaceError> {
        self.profiles
            .fetch_by_user(user_id)?
            .ok_or(MarketplaceError::ProfileNotFound(user_id))
    }

    pub fn create_profile(
        &self,
        draft: NewTenantProfile,
    ) -> Result<TenantCredentialProfile, MarketplaceError> {
        draft.validate()?;
        let user_id = draft.user_id;
        if self.profiles.fetch_by_user(user_id)?.is_some() {
            return Err(MarketplaceError::ProfileExists(user_id));
        }

        let profile = match self.profiles.insert(draft) {
            Err(RepositoryError::Conflict) => {
                return Err(MarketplaceError::ProfileExists(user_id))
            }
            other => other?,
        };
        info!(
            user_id = user_id.0,
            profile_id = profile.id().0,
            "tenant profile created"
        );
        Ok(profile)
    }

    pub fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<TenantCredentialProfile, MarketplaceError> {
        update.validate()?;
        let mut profile = self.profile(user_id)?;
        profile.apply(update, Utc::now());
        self.profiles.update(profile.clone())?;
        debug!(
            user_id = user_id.0,
            overall_score = ?profile.overall_score(),
            badge = profile.verification_badge(),
            "tenant profile updated"
        );
        Ok(profile)
    }

    /// Recompute every sub-score from fresh financial inputs and persist them.
    pub fn rescore_profile(
        &self,
        user_id: UserId,
        request: &CredentialScoreRequest,
    ) -> Result<TenantCredentialProfile, MarketplaceError> {
        let scores = self.preview_scores(request)?;
        let mut profile = self.profile(user_id)?;
        profile.apply_scores(scores, Utc::now());
        self.profiles.update(profile.clone())?;
        info!(
            user_id = user_id.0,
            overall_score = scores.overall,
            "credential scores recalculated"
        );
        Ok(profile)
    }

    pub fn properties(&self) -> Result<Vec<Property>, MarketplaceError> {
        Ok(self.properties.list()?)
    }

    pub fn featured_properties(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<Property>, MarketplaceError> {
        let featured = self
            .properties
            .list()?
            .into_iter()
            .filter(|property| property.listing.featured);
        Ok(match limit.filter(|limit| *limit > 0) {
            Some(limit) => featured.take(limit).collect(),
            None => featured.collect(),
        })
    }

    pub fn landlord_properties(
        &self,
        landlord_id: UserId,
    ) -> Result<Vec<Property>, MarketplaceError> {
        Ok(self
            .properties
            .list()?
            .into_iter()
            .filter(|property| property.landlord_id == landlord_id)
            .collect())
    }

    pub fn property(&self, id: PropertyId) -> Result<Property, MarketplaceError> {
        self.properties
            .fetch(id)?
            .ok_or(MarketplaceError::PropertyNotFound(id))
    }

    pub fn create_property(&self, draft: NewProperty) -> Result<Property, MarketplaceError> {
        draft.validate()?;
        let property = self.properties.insert(draft)?;
        info!(
            property_id = property.id.0,
            landlord_id = property.landlord_id.0,
            "property listed"
        );
        Ok(property)
    }

    pub fn update_property(
        &self,
        id: PropertyId,
        update: PropertyUpdate,
    ) -> Result<Property, MarketplaceError> {
        update.validate()?;
        let mut property = self.property(id)?;
        property.apply(update, Utc::now());
        self.properties.update(property.clone())?;
        info!(property_id = id.0, "property updated");
        Ok(property)
    }

    pub fn delete_property(&self, id: PropertyId) -> Result<(), MarketplaceError> {
        if !self.properties.delete(id)? {
            return Err(MarketplaceError::PropertyNotFound(id));
        }
        info!(property_id = id.0, "property removed");
        Ok(())
    }

    pub fn tenant_views(&self, tenant_id: UserId) -> Result<Vec<PropertyView>, MarketplaceError> {
        Ok(self.views.by_tenant(tenant_id)?)
    }

    pub fn property_views(
        &self,
        property_id: PropertyId,
    ) -> Result<Vec<PropertyView>, MarketplaceError> {
        Ok(self.views.by_property(property_id)?)
    }

    /// Record a view or application, stamping the current match score when none is given.
    pub fn record_view(&self, draft: NewPropertyView) -> Result<PropertyView, MarketplaceError> {
        draft.validate()?;
        let property = self.property(draft.property_id)?;

        let match_score = match draft.match_score {
            Some(score) => score,
            None => {
                let profile = self.profiles.fetch_by_user(draft.tenant_id)?;
                overall_match_score(profile.as_ref(), Some(&property))
            }
        };

        let view = self.views.insert(draft, match_score)?;
        info!(
            view_id = view.id.0,
            property_id = view.property_id.0,
            tenant_id = view.tenant_id.0,
            match_score,
            "property view recorded"
        );
        Ok(view)
    }

    pub fn update_view(
        &self,
        id: PropertyViewId,
        update: PropertyViewUpdate,
    ) -> Result<PropertyView, MarketplaceError> {
        let mut view = self
            .views
            .fetch(id)?
            .ok_or(MarketplaceError::PropertyViewNotFound(id))?;
        view.apply(update);
        self.views.update(view.clone())?;
        info!(
            view_id = id.0,
            status = view.application_status.label(),
            "property view updated"
        );
        Ok(view)
    }

    /// Every listing scored for the tenant, best match first.
    pub fn matches_for_tenant(
        &self,
        tenant_id: UserId,
    ) -> Result<Vec<PropertyMatch>, MarketplaceError> {
        let profile = self.profile(tenant_id)?;
        let properties = self.properties.list()?;
        let ranked = rank_properties(&properties, &profile);
        info!(
            tenant_id = tenant_id.0,
            listings = ranked.len(),
            best = ?ranked.first().map(|ranked| ranked.match_score),
            "property matches ranked"
        );
        Ok(ranked)
    }

    /// Detailed report; a tenant without a profile gets the neutral report.
    pub fn match_report(
        &self,
        tenant_id: UserId,
        property_id: PropertyId,
    ) -> Result<MatchReport, MarketplaceError> {
        let property = self.property(property_id)?;
        let profile = self.profiles.fetch_by_user(tenant_id)?;
        Ok(generate_match_report(profile.as_ref(), Some(&property)))
    }
}

/// Error raised by the marketplace service.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("malformed payload: {0}")]
    Payload(String),
    #[error("tenant profile not found for user {0}")]
    ProfileNotFound(UserId),
    #[error("tenant profile already exists for user {0}")]
    ProfileExists(UserId),
    #[error("property {0} not found")]
    PropertyNotFound(PropertyId),
    #[error("property view {0} not found")]
    PropertyViewNotFound(PropertyViewId),
}
