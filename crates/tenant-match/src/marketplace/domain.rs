use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::scoring::{overall_score, CredentialScores};

/// Identifier of a marketplace user (tenant or landlord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Identifier wrapper for tenant credential profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub u64);

/// Identifier wrapper for property listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub u64);

/// Identifier wrapper for recorded property views and applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyViewId(pub u64);

macro_rules! display_id {
    ($($id:ty),+) => {
        $(impl fmt::Display for $id {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        })+
    };
}

display_id!(UserId, ProfileId, PropertyId, PropertyViewId);

/// Which credential categories have been independently verified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationFlags {
    #[serde(default)]
    pub income_verified: bool,
    #[serde(default)]
    pub credit_score_verified: bool,
    #[serde(default)]
    pub rental_history_verified: bool,
    #[serde(default)]
    pub employment_verified: bool,
}

impl VerificationFlags {
    pub const fn all_verified(&self) -> bool {
        self.income_verified
            && self.credit_score_verified
            && self.rental_history_verified
            && self.employment_verified
    }
}

/// Persisted tenant credentials.
///
/// The overall score and the verification badge are derived and cannot be written
/// by callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantCredentialProfile {
    id: ProfileId,
    user_id: UserId,
    income_score: Option<u8>,
    credit_score: Option<u8>,
    rental_history_score: Option<u8>,
    employment_score: Option<u8>,
    overall_score: Option<u8>,
    #[serde(flatten)]
    verification: VerificationFlags,
    verification_badge: bool,
    verified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantCredentialProfile {
    pub fn create(id: ProfileId, draft: NewTenantProfile, now: DateTime<Utc>) -> Self {
        let verification = draft.verification();
        let mut profile = Self {
            id,
            user_id: draft.user_id,
            income_score: draft.income_score,
            credit_score: draft.credit_score,
            rental_history_score: draft.rental_history_score,
            employment_score: draft.employment_score,
            overall_score: None,
            verification,
            verification_badge: false,
            verified_at: None,
            created_at: now,
            updated_at: now,
        };
        profile.refresh_overall();
        profile.refresh_badge(now);
        profile
    }

    pub fn id(&self) -> ProfileId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn income_score(&self) -> Option<u8> {
        self.income_score
    }

    pub fn credit_score(&self) -> Option<u8> {
        self.credit_score
    }

    pub fn rental_history_score(&self) -> Option<u8> {
        self.rental_history_score
    }

    pub fn employment_score(&self) -> Option<u8> {
        self.employment_score
    }

    /// Present once all four sub-scores are known.
    pub fn overall_score(&self) -> Option<u8> {
        self.overall_score
    }

    pub fn verification(&self) -> VerificationFlags {
        self.verification
    }

    pub fn verification_badge(&self) -> bool {
        self.verification_badge
    }

    pub fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.verified_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace all four sub-scores with freshly computed credentials.
    ///
    /// The overall score is taken from `scores`, which was rounded from the
    /// unrounded curves rather than from the stored integers.
    pub fn apply_scores(&mut self, scores: CredentialScores, now: DateTime<Utc>) {
        self.income_score = Some(scores.income);
        self.credit_score = Some(scores.credit);
        self.rental_history_score = Some(scores.rental_history);
        self.employment_score = Some(scores.employment);
        self.overall_score = Some(scores.overall);
        self.updated_at = now;
        self.refresh_badge(now);
    }

    pub fn apply(&mut self, update: ProfileUpdate, now: DateTime<Utc>) {
        let ProfileUpdate {
            income_score,
            credit_score,
            rental_history_score,
            employment_score,
            income_verified,
            credit_score_verified,
            rental_history_verified,
            employment_verified,
        } = update;

        let rescored = income_score.is_some()
            || credit_score.is_some()
            || rental_history_score.is_some()
            || employment_score.is_some();
        if let Some(score) = income_score {
            self.income_score = Some(score);
        }
        if let Some(score) = credit_score {
            self.credit_score = Some(score);
        }
        if let Some(score) = rental_history_score {
            self.rental_history_score = Some(score);
        }
        if let Some(score) = employment_score {
            self.employment_score = Some(score);
        }
        if let Some(flag) = income_verified {
            self.verification.income_verified = flag;
        }
        if let Some(flag) = credit_score_verified {
            self.verification.credit_score_verified = flag;
        }
        if let Some(flag) = rental_history_verified {
            self.verification.rental_history_verified = flag;
        }
        if let Some(flag) = employment_verified {
            self.verification.employment_verified = flag;
        }

        self.updated_at = now;
        if rescored {
            self.refresh_overall();
        }
        self.refresh_badge(now);
    }

    fn refresh_overall(&mut self) {
        self.overall_score = match (
            self.income_score,
            self.credit_score,
            self.rental_history_score,
            self.employment_score,
        ) {
            (Some(income), Some(credit), Some(rental_history), Some(employment)) => {
                Some(overall_score(income, credit, rental_history, employment))
            }
            _ => None,
        };
    }

    fn refresh_badge(&mut self, now: DateTime<Utc>) {
        let badge = self.verification.all_verified();
        if badge && !self.verification_badge {
            self.verified_at = Some(now);
        } else if !badge {
            self.verified_at = None;
        }
        self.verification_badge = badge;
    }
}

/// Payload accepted when a tenant profile is first created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTenantProfile {
    pub user_id: UserId,
    #[serde(default)]
    pub income_score: Option<u8>,
    #[serde(default)]
    pub credit_score: Option<u8>,
    #[serde(default)]
    pub rental_history_score: Option<u8>,
    #[serde(default)]
    pub employment_score: Option<u8>,
    #[serde(default)]
    pub income_verified: bool,
    #[serde(default)]
    pub credit_score_verified: bool,
    #[serde(default)]
    pub rental_history_verified: bool,
    #[serde(default)]
    pub employment_verified: bool,
}

impl NewTenantProfile {
    /// Profile for a user with nothing scored or verified yet.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            income_score: None,
            credit_score: None,
            rental_history_score: None,
            employment_score: None,
            income_verified: false,
            credit_score_verified: false,
            rental_history_verified: false,
            employment_verified: false,
        }
    }

    fn verification(&self) -> VerificationFlags {
        VerificationFlags {
            income_verified: self.income_verified,
            credit_score_verified: self.credit_score_verified,
            rental_history_verified: self.rental_history_verified,
            employment_verified: self.employment_verified,
        }
    }
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub income_score: Option<u8>,
    #[serde(default)]
    pub credit_score: Option<u8>,
    #[serde(default)]
    pub rental_history_score: Option<u8>,
    #[serde(default)]
    pub employment_score: Option<u8>,
    #[serde(default)]
    pub income_verified: Option<bool>,
    #[serde(default)]
    pub credit_score_verified: Option<bool>,
    #[serde(default)]
    pub rental_history_verified: Option<bool>,
    #[serde(default)]
    pub employment_verified: Option<bool>,
}

/// Minimum tenant qualifications stated on a listing. `None` means no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyRequirements {
    #[serde(default)]
    pub minimum_income: Option<f64>,
    #[serde(default)]
    pub minimum_credit_score: Option<u16>,
    /// Months of rental history.
    #[serde(default)]
    pub required_rental_history: Option<u32>,
    /// Months of employment stability.
    #[serde(default)]
    pub required_employment_stability: Option<u32>,
}

/// Rental listing as stored by the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub landlord_id: UserId,
    #[serde(flatten)]
    pub listing: ListingDetails,
    #[serde(flatten)]
    pub requirements: PropertyRequirements,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn create(id: PropertyId, draft: NewProperty, now: DateTime<Utc>) -> Self {
        Self {
            id,
            landlord_id: draft.landlord_id,
            listing: draft.listing,
            requirements: draft.requirements,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: PropertyUpdate, now: DateTime<Utc>) {
        let PropertyUpdate {
            title,
            description,
            address,
            city,
            state,
            zip_code,
            price_per_month,
            bedrooms,
            bathrooms,
            square_feet,
            property_type,
            available_from,
            featured,
            images,
            minimum_income,
            minimum_credit_score,
            required_rental_history,
            required_employment_stability,
        } = update;

        let listing = &mut self.listing;
        if let Some(value) = title {
            listing.title = value;
        }
        if let Some(value) = description {
            listing.description = value;
        }
        if let Some(value) = address {
            listing.address = value;
        }
        if let Some(value) = city {
            listing.city = value;
        }
        if let Some(value) = state {
            listing.state = value;
        }
        if let Some(value) = zip_code {
            listing.zip_code = value;
        }
        if let Some(value) = price_per_month {
            listing.price_per_month = value;
        }
        if let Some(value) = bedrooms {
            listing.bedrooms = value;
        }
        if let Some(value) = bathrooms {
            listing.bathrooms = value;
        }
        if let Some(value) = square_feet {
            listing.square_feet = value;
        }
        if let Some(value) = property_type {
            listing.property_type = value;
        }
        if let Some(value) = available_from {
            listing.available_from = value;
        }
        if let Some(value) = featured {
            listing.featured = value;
        }
        if let Some(value) = images {
            listing.images = value;
        }

        let requirements = &mut self.requirements;
        if let Some(value) = minimum_income {
            requirements.minimum_income = value;
        }
        if let Some(value) = minimum_credit_score {
            requirements.minimum_credit_score = value;
        }
        if let Some(value) = required_rental_history {
            requirements.required_rental_history = value;
        }
        if let Some(value) = required_employment_stability {
            requirements.required_employment_stability = value;
        }

        self.updated_at = now;
    }
}

/// Descriptive listing fields that play no part in matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDetails {
    pub title: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub price_per_month: f64,
    pub bedrooms: u8,
    pub bathrooms: f32,
    pub square_feet: u32,
    pub property_type: String,
    pub available_from: NaiveDate,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Payload accepted when a landlord lists a property.
///
/// The wire form is flat and rejects unknown keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NewPropertyPayload")]
pub struct NewProperty {
    pub landlord_id: UserId,
    #[serde(flatten)]
    pub listing: ListingDetails,
    #[serde(flatten)]
    pub requirements: PropertyRequirements,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NewPropertyPayload {
    landlord_id: UserId,
    title: String,
    description: String,
    address: String,
    city: String,
    state: String,
    zip_code: String,
    price_per_month: f64,
    bedrooms: u8,
    bathrooms: f32,
    square_feet: u32,
    property_type: String,
    available_from: NaiveDate,
    #[serde(default)]
    featured: bool,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    minimum_income: Option<f64>,
    #[serde(default)]
    minimum_credit_score: Option<u16>,
    #[serde(default)]
    required_rental_history: Option<u32>,
    #[serde(default)]
    required_employment_stability: Option<u32>,
}

impl From<NewPropertyPayload> for NewProperty {
    fn from(payload: NewPropertyPayload) -> Self {
        Self {
            landlord_id: payload.landlord_id,
            listing: ListingDetails {
                title: payload.title,
                description: payload.description,
                address: payload.address,
                city: payload.city,
                state: payload.state,
                zip_code: payload.zip_code,
                price_per_month: payload.price_per_month,
                bedrooms: payload.bedrooms,
                bathrooms: payload.bathrooms,
                square_feet: payload.square_feet,
                property_type: payload.property_type,
                available_from: payload.available_from,
                featured: payload.featured,
                images: payload.images,
            },
            requirements: PropertyRequirements {
                minimum_income: payload.minimum_income,
                minimum_credit_score: payload.minimum_credit_score,
                required_rental_history: payload.required_rental_history,
                required_employment_stability: payload.required_employment_stability,
            },
        }
    }
}

/// Partial listing update.
///
/// Requirement fields distinguish "absent" (leave as is) from `null` (remove the
/// requirement).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub price_per_month: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u8>,
    #[serde(default)]
    pub bathrooms: Option<f32>,
    #[serde(default)]
    pub square_feet: Option<u32>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub available_from: Option<NaiveDate>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub minimum_income: Option<Option<f64>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub minimum_credit_score: Option<Option<u16>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub required_rental_history: Option<Option<u32>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub required_employment_stability: Option<Option<u32>>,
}

fn deserialize_nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Review state of a tenant's interest in a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// A tenant viewing or applying for a listing, stamped with the match score at the time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyView {
    pub id: PropertyViewId,
    pub property_id: PropertyId,
    pub tenant_id: UserId,
    pub match_score: u8,
    pub application_status: ApplicationStatus,
    pub viewing_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PropertyView {
    pub fn create(
        id: PropertyViewId,
        draft: NewPropertyView,
        match_score: u8,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            property_id: draft.property_id,
            tenant_id: draft.tenant_id,
            match_score,
            application_status: draft.application_status.unwrap_or_default(),
            viewing_date: draft.viewing_date,
            notes: draft.notes,
            created_at: now,
        }
    }

    pub fn apply(&mut self, update: PropertyViewUpdate) {
        if let Some(status) = update.application_status {
            self.application_status = status;
        }
        if let Some(viewing_date) = update.viewing_date {
            self.viewing_date = Some(viewing_date);
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
    }
}

/// Payload accepted when a tenant views or applies for a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPropertyView {
    pub property_id: PropertyId,
    pub tenant_id: UserId,
    /// Computed from the tenant's profile when omitted.
    #[serde(default)]
    pub match_score: Option<u8>,
    #[serde(default)]
    pub application_status: Option<ApplicationStatus>,
    #[serde(default)]
    pub viewing_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyViewUpdate {
    #[serde(default)]
    pub application_status: Option<ApplicationStatus>,
    #[serde(default)]
    pub viewing_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}
