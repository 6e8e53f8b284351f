use super::domain::{
    NewProperty, NewPropertyView, NewTenantProfile, ProfileId, Property, PropertyId,
    PropertyView, PropertyViewId, TenantCredentialProfile, UserId,
};

/// Storage for tenant credential profiles.
pub trait ProfileRepository: Send + Sync {
    /// Persist a new profile, allocating its identifier.
    fn insert(&self, draft: NewTenantProfile) -> Result<TenantCredentialProfile, RepositoryError>;
    fn update(&self, profile: TenantCredentialProfile) -> Result<(), RepositoryError>;
    fn fetch(&self, id: ProfileId) -> Result<Option<TenantCredentialProfile>, RepositoryError>;
    fn fetch_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<TenantCredentialProfile>, RepositoryError>;
    fn delete(&self, id: ProfileId) -> Result<bool, RepositoryError>;
}

/// Storage for property listings.
pub trait PropertyRepository: Send + Sync {
    fn insert(&self, draft: NewProperty) -> Result<Property, RepositoryError>;
    fn update(&self, property: Property) -> Result<(), RepositoryError>;
    fn fetch(&self, id: PropertyId) -> Result<Option<Property>, RepositoryError>;
    /// All listings in ascending id order.
    fn list(&self) -> Result<Vec<Property>, RepositoryError>;
    fn delete(&self, id: PropertyId) -> Result<bool, RepositoryError>;
}

/// Storage for tenant views and applications.
pub trait PropertyViewRepository: Send + Sync {
    fn insert(&self, draft: NewPropertyView, match_score: u8)
        -> Result<PropertyView, RepositoryError>;
    fn update(&self, view: PropertyView) -> Result<(), RepositoryError>;
    fn fetch(&self, id: PropertyViewId) -> Result<Option<PropertyView>, RepositoryError>;
    fn by_tenant(&self, tenant_id: UserId) -> Result<Vec<PropertyView>, RepositoryError>;
    fn by_property(&self, property_id: PropertyId) -> Result<Vec<PropertyView>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
