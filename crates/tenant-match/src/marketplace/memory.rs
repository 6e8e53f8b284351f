//! Process-local repositories backed by ordered maps.
//!
//! Each repository owns its identifier sequence, so two stores never share counters.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use super::domain::{
    NewProperty, NewPropertyView, NewTenantProfile, ProfileId, Property, PropertyId,
    PropertyView, PropertyViewId, TenantCredentialProfile, UserId,
};
use super::repository::{
    ProfileRepository, PropertyRepository, PropertyViewRepository, RepositoryError,
};

#[derive(Debug)]
struct Table<K, V> {
    next_id: u64,
    rows: BTreeMap<K, V>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<K, V> Table<K, V> {
    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn lock<'a, K, V>(
    table: &'a Mutex<Table<K, V>>,
    name: &str,
) -> Result<MutexGuard<'a, Table<K, V>>, RepositoryError> {
    table
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{name} store mutex poisoned")))
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryProfileRepository {
    table: Arc<Mutex<Table<ProfileId, TenantCredentialProfile>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn insert(&self, draft: NewTenantProfile) -> Result<TenantCredentialProfile, RepositoryError> {
        let mut table = lock(&self.table, "profile")?;
        if table
            .rows
            .values()
            .any(|profile| profile.user_id() == draft.user_id)
        {
            return Err(RepositoryError::Conflict);
        }
        let id = ProfileId(table.allocate());
        let profile = TenantCredentialProfile::create(id, draft, Utc::now());
        table.rows.insert(id, profile.clone());
        Ok(profile)
    }

    fn update(&self, profile: TenantCredentialProfile) -> Result<(), RepositoryError> {
        let mut table = lock(&self.table, "profile")?;
        match table.rows.get_mut(&profile.id()) {
            Some(slot) => {
                *slot = profile;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: ProfileId) -> Result<Option<TenantCredentialProfile>, RepositoryError> {
        let table = lock(&self.table, "profile")?;
        Ok(table.rows.get(&id).cloned())
    }

    fn fetch_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<TenantCredentialProfile>, RepositoryError> {
        let table = lock(&self.table, "profile")?;
        Ok(table
            .rows
            .values()
            .find(|profile| profile.user_id() == user_id)
            .cloned())
    }

    fn delete(&self, id: ProfileId) -> Result<bool, RepositoryError> {
        let mut table = lock(&self.table, "profile")?;
        Ok(table.rows.remove(&id).is_some())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryPropertyRepository {
    table: Arc<Mutex<Table<PropertyId, Property>>>,
}

impl PropertyRepository for InMemoryPropertyRepository {
    fn insert(&self, draft: NewProperty) -> Result<Property, RepositoryError> {
        let mut table = lock(&self.table, "property")?;
        let id = PropertyId(table.allocate());
        let property = Property::create(id, draft, Utc::now());
        table.rows.insert(id, property.clone());
        Ok(property)
    }

    fn update(&self, property: Property) -> Result<(), RepositoryError> {
        let mut table = lock(&self.table, "property")?;
        match table.rows.get_mut(&property.id) {
            Some(slot) => {
                *slot = property;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: PropertyId) -> Result<Option<Property>, RepositoryError> {
        let table = lock(&self.table, "property")?;
        Ok(table.rows.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<Property>, RepositoryError> {
        let table = lock(&self.table, "property")?;
        Ok(table.rows.values().cloned().collect())
    }

    fn delete(&self, id: PropertyId) -> Result<bool, RepositoryError> {
        let mut table = lock(&self.table, "property")?;
        Ok(table.rows.remove(&id).is_some())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryPropertyViewRepository {
    table: Arc<Mutex<Table<PropertyViewId, PropertyView>>>,
}

impl PropertyViewRepository for InMemoryPropertyViewRepository {
    fn insert(
        &self,
        draft: NewPropertyView,
        match_score: u8,
    ) -> Result<PropertyView, RepositoryError> {
        let mut table = lock(&self.table, "property view")?;
        let id = PropertyViewId(table.allocate());
        let view = PropertyView::create(id, draft, match_score, Utc::now());
        table.rows.insert(id, view.clone());
        Ok(view)
    }

    fn update(&self, view: PropertyView) -> Result<(), RepositoryError> {
        let mut table = lock(&self.table, "property view")?;
        match table.rows.get_mut(&view.id) {
            Some(slot) => {
                *slot = view;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: PropertyViewId) -> Result<Option<PropertyView>, RepositoryError> {
        let table = lock(&self.table, "property view")?;
        Ok(table.rows.get(&id).cloned())
    }

    fn by_tenant(&self, tenant_id: UserId) -> Result<Vec<PropertyView>, RepositoryError> {
        let table = lock(&self.table, "property view")?;
        Ok(table
            .rows
            .values()
            .filter(|view| view.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    fn by_property(&self, property_id: PropertyId) -> Result<Vec<PropertyView>, RepositoryError> {
        let table = lock(&self.table, "property view")?;
        Ok(table
            .rows
            .values()
            .filter(|view| view.property_id == property_id)
            .cloned()
            .collect())
    }
}
