use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{
    NewProperty, NewPropertyView, NewTenantProfile, ProfileUpdate, PropertyId, PropertyUpdate,
    PropertyViewId, PropertyViewUpdate, UserId,
};
use super::repository::{
    ProfileRepository, PropertyRepository, PropertyViewRepository, RepositoryError,
};
use super::service::{CredentialScoreRequest, MarketplaceError, MarketplaceService};

type SharedService<P, R, V> = State<Arc<MarketplaceService<P, R, V>>>;

/// Router builder exposing the marketplace's profile, listing, view and matching endpoints.
pub fn marketplace_router<P, R, V>(service: Arc<MarketplaceService<P, R, V>>) -> Router
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    Router::new()
        .route("/api/v1/credentials/score", post(score_handler::<P, R, V>))
        .route(
            "/api/v1/tenant-profiles",
            post(create_profile_handler::<P, R, V>),
        )
        .route(
            "/api/v1/tenant-profiles/:user_id",
            get(profile_handler::<P, R, V>).patch(update_profile_handler::<P, R, V>),
        )
        .route(
            "/api/v1/tenant-profiles/:user_id/credentials",
            post(rescore_profile_handler::<P, R, V>),
        )
        .route(
            "/api/v1/properties",
            get(list_properties_handler::<P, R, V>).post(create_property_handler::<P, R, V>),
        )
        .route(
            "/api/v1/properties/featured",
            get(featured_properties_handler::<P, R, V>),
        )
        .route(
            "/api/v1/properties/landlord/:landlord_id",
            get(landlord_properties_handler::<P, R, V>),
        )
        .route(
            "/api/v1/properties/:property_id",
            get(property_handler::<P, R, V>)
                .patch(update_property_handler::<P, R, V>)
                .delete(delete_property_handler::<P, R, V>),
        )
        .route(
            "/api/v1/property-views",
            post(record_view_handler::<P, R, V>),
        )
        .route(
            "/api/v1/property-views/tenant/:tenant_id",
            get(tenant_views_handler::<P, R, V>),
        )
        .route(
            "/api/v1/property-views/property/:property_id",
            get(property_views_handler::<P, R, V>),
        )
        .route(
            "/api/v1/property-views/:view_id",
            patch(update_view_handler::<P, R, V>),
        )
        .route(
            "/api/v1/match/tenant-properties",
            post(match_handler::<P, R, V>),
        )
        .route(
            "/api/v1/match/report/:tenant_id/:property_id",
            get(match_report_handler::<P, R, V>),
        )
        .with_state(service)
}

impl IntoResponse for MarketplaceError {
    fn into_response(self) -> Response {
        let (status, payload) = match &self {
            MarketplaceError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": self.to_string(), "errors": errors.errors }),
            ),
            MarketplaceError::Scoring(_) | MarketplaceError::Payload(_) => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            MarketplaceError::ProfileNotFound(_)
            | MarketplaceError::PropertyNotFound(_)
            | MarketplaceError::PropertyViewNotFound(_)
            | MarketplaceError::Repository(RepositoryError::NotFound) => {
                (StatusCode::NOT_FOUND, json!({ "error": self.to_string() }))
            }
            MarketplaceError::ProfileExists(_)
            | MarketplaceError::Repository(RepositoryError::Conflict) => {
                (StatusCode::CONFLICT, json!({ "error": self.to_string() }))
            }
            MarketplaceError::Repository(RepositoryError::Unavailable(_)) => {
                error!(error = %self, "marketplace storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string() }),
                )
            }
        };
        (status, Json(payload)).into_response()
    }
}

impl From<JsonRejection> for MarketplaceError {
    fn from(rejection: JsonRejection) -> Self {
        MarketplaceError::Payload(rejection.body_text())
    }
}

pub(crate) async fn score_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    payload: Result<Json<CredentialScoreRequest>, JsonRejection>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    let Json(request) = payload?;
    let scores = service.preview_scores(&request)?;
    Ok(Json(scores.summary()).into_response())
}

pub(crate) async fn profile_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    Path(user_id): Path<u64>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    let profile = service.profile(UserId(user_id))?;
    Ok(Json(profile).into_response())
}

pub(crate) async fn create_profile_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    payload: Result<Json<NewTenantProfile>, JsonRejection>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    let Json(draft) = payload?;
    let profile = service.create_profile(draft)?;
    Ok((StatusCode::CREATED, Json(profile)).into_response())
}

pub(crate) async fn update_profile_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    Path(user_id): Path<u64>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    let Json(update) = payload?;
    let profile = service.update_profile(UserId(user_id), update)?;
    Ok(Json(profile).into_response())
}

pub(crate) async fn rescore_profile_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    Path(user_id): Path<u64>,
    payload: Result<Json<CredentialScoreRequest>, JsonRejection>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    let Json(request) = payload?;
    let profile = service.rescore_profile(UserId(user_id), &request)?;
    Ok(Json(profile).into_response())
}

pub(crate) async fn list_properties_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    Ok(Json(service.properties()?).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FeaturedQuery {
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

pub(crate) async fn featured_properties_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    Ok(Json(service.featured_properties(query.limit)?).into_response())
}

pub(crate) async fn landlord_properties_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    Path(landlord_id): Path<u64>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    Ok(Json(service.landlord_properties(UserId(landlord_id))?).into_response())
}

pub(crate) async fn property_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    Path(property_id): Path<u64>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    Ok(Json(service.property(PropertyId(property_id))?).into_response())
}

pub(crate) async fn create_property_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    payload: Result<Json<NewProperty>, JsonRejection>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    let Json(draft) = payload?;
    let property = service.create_property(draft)?;
    Ok((StatusCode::CREATED, Json(property)).into_response())
}

pub(crate) async fn update_property_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    Path(property_id): Path<u64>,
    payload: Result<Json<PropertyUpdate>, JsonRejection>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    let Json(update) = payload?;
    let property = service.update_property(PropertyId(property_id), update)?;
    Ok(Json(property).into_response())
}

pub(crate) async fn delete_property_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    Path(property_id): Path<u64>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    service.delete_property(PropertyId(property_id))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub(crate) async fn record_view_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    payload: Result<Json<NewPropertyView>, JsonRejection>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    let Json(draft) = payload?;
    let view = service.record_view(draft)?;
    Ok((StatusCode::CREATED, Json(view)).into_response())
}

pub(crate) async fn tenant_views_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    Path(tenant_id): Path<u64>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    Ok(Json(service.tenant_views(UserId(tenant_id))?).into_response())
}

pub(crate) async fn property_views_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    Path(property_id): Path<u64>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    Ok(Json(service.property_views(PropertyId(property_id))?).into_response())
}

pub(crate) async fn update_view_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    Path(view_id): Path<u64>,
    payload: Result<Json<PropertyViewUpdate>, JsonRejection>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    let Json(update) = payload?;
    let view = service.update_view(PropertyViewId(view_id), update)?;
    Ok(Json(view).into_response())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MatchRequest {
    pub(crate) tenant_id: UserId,
}

pub(crate) async fn match_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    let Json(request) = payload?;
    Ok(Json(service.matches_for_tenant(request.tenant_id)?).into_response())
}

pub(crate) async fn match_report_handler<P, R, V>(
    State(service): SharedService<P, R, V>,
    Path((tenant_id, property_id)): Path<(u64, u64)>,
) -> Result<Response, MarketplaceError>
where
    P: ProfileRepository + 'static,
    R: PropertyRepository + 'static,
    V: PropertyViewRepository + 'static,
{
    let report = service.match_report(UserId(tenant_id), PropertyId(property_id))?;
    Ok(Json(report).into_response())
}
