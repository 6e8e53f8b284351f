use chrono::{Duration, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tenant_match::config::ScoringConfig;
use tenant_match::marketplace::{
    ApplicationStatus, InMemoryProfileRepository, InMemoryPropertyRepository,
    InMemoryPropertyViewRepository, ListingDetails, MarketplaceError, MarketplaceService,
    NewProperty, NewPropertyView, NewTenantProfile, PropertyRequirements, UserId,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type InMemoryMarketplace = MarketplaceService<
    InMemoryProfileRepository,
    InMemoryPropertyRepository,
    InMemoryPropertyViewRepository,
>;

pub(crate) const SAMPLE_TENANT: UserId = UserId(1);
pub(crate) const SAMPLE_LANDLORD: UserId = UserId(2);

pub(crate) fn in_memory_marketplace(scoring: ScoringConfig) -> InMemoryMarketplace {
    MarketplaceService::new(
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(InMemoryPropertyRepository::default()),
        Arc::new(InMemoryPropertyViewRepository::default()),
        scoring,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SeedSummary {
    pub(crate) profiles: usize,
    pub(crate) properties: usize,
    pub(crate) views: usize,
}

/// Seed the demo tenant, the landlord's three New York listings and the tenant's viewings.
pub(crate) fn seed_sample_data(
    marketplace: &InMemoryMarketplace,
) -> Result<SeedSummary, MarketplaceError> {
    marketplace.create_profile(NewTenantProfile {
        income_score: Some(85),
        credit_score: Some(72),
        rental_history_score: Some(91),
        employment_score: Some(88),
        income_verified: true,
        credit_score_verified: true,
        rental_history_verified: true,
        employment_verified: true,
        ..NewTenantProfile::for_user(SAMPLE_TENANT)
    })?;

    let available_from = Utc::now().date_naive();
    let mut properties = Vec::new();
    for draft in sample_properties(available_from) {
        properties.push(marketplace.create_property(draft)?);
    }

    let notes = [
        "Very interested in this property",
        "Good location but slightly above budget",
        "Love the spacious layout",
    ];
    let viewing_date = Utc::now() + Duration::days(3);
    let mut views = 0;
    for (property, note) in properties.iter().zip(notes) {
        marketplace.record_view(NewPropertyView {
            property_id: property.id,
            tenant_id: SAMPLE_TENANT,
            match_score: None,
            application_status: Some(ApplicationStatus::Pending),
            viewing_date: Some(viewing_date),
            notes: Some(note.to_string()),
        })?;
        views += 1;
    }

    let summary = SeedSummary {
        profiles: 1,
        properties: properties.len(),
        views,
    };
    info!(
        profiles = summary.profiles,
        properties = summary.properties,
        views = summary.views,
        "sample marketplace data seeded"
    );
    Ok(summary)
}

fn sample_properties(available_from: NaiveDate) -> Vec<NewProperty> {
    vec![
        sample_property(
            ListingDetails {
                title: "Luxury Apartment in Manhattan".to_string(),
                description: "Beautiful apartment in the heart of Manhattan with modern amenities."
                    .to_string(),
                address: "123 E 72nd St".to_string(),
                city: "New York".to_string(),
                state: "NY".to_string(),
                zip_code: "10021".to_string(),
                price_per_month: 3_200.0,
                bedrooms: 2,
                bathrooms: 2.0,
                square_feet: 1_200,
                property_type: "apartment".to_string(),
                available_from,
                featured: true,
                images: vec![
                    "https://images.unsplash.com/photo-1551361415-69c87624334f".to_string(),
                ],
            },
            (96_000.0, 700, 24, 12),
        ),
        sample_property(
            ListingDetails {
                title: "Brooklyn Heights Brownstone".to_string(),
                description: "Classic brownstone with modern updates in prime Brooklyn Heights."
                    .to_string(),
                address: "45 Pierrepont St".to_string(),
                city: "Brooklyn".to_string(),
                state: "NY".to_string(),
                zip_code: "11201".to_string(),
                price_per_month: 4_500.0,
                bedrooms: 3,
                bathrooms: 2.5,
                square_feet: 1_850,
                property_type: "townhouse".to_string(),
                available_from,
                featured: true,
                images: vec![
                    "https://images.unsplash.com/photo-1484154218962-a197022b5858".to_string(),
                ],
            },
            (135_000.0, 720, 36, 24),
        ),
        sample_property(
            ListingDetails {
                title: "Tribeca Loft".to_string(),
                description: "Spacious loft in the trendy Tribeca neighborhood.".to_string(),
                address: "78 Franklin St".to_string(),
                city: "New York".to_string(),
                state: "NY".to_string(),
                zip_code: "10013".to_string(),
                price_per_month: 5_800.0,
                bedrooms: 2,
                bathrooms: 2.0,
                square_feet: 1_750,
                property_type: "loft".to_string(),
                available_from,
                featured: true,
                images: vec![
                    "https://images.unsplash.com/photo-1493809842364-78817add7ffb".to_string(),
                ],
            },
            (174_000.0, 740, 24, 24),
        ),
    ]
}

fn sample_property(listing: ListingDetails, minimums: (f64, u16, u32, u32)) -> NewProperty {
    let (income, credit, rental_months, employment_months) = minimums;
    NewProperty {
        landlord_id: SAMPLE_LANDLORD,
        listing,
        requirements: PropertyRequirements {
            minimum_income: Some(income),
            minimum_credit_score: Some(credit),
            required_rental_history: Some(rental_months),
            required_employment_stability: Some(employment_months),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenant_match::marketplace::PropertyId;

    #[test]
    fn seeding_populates_an_empty_marketplace() {
        let marketplace = in_memory_marketplace(ScoringConfig::default());
        let summary = seed_sample_data(&marketplace).expect("seed succeeds");

        assert_eq!(
            summary,
            SeedSummary {
                profiles: 1,
                properties: 3,
                views: 3,
            }
        );
        let profile = marketplace.profile(SAMPLE_TENANT).expect("tenant seeded");
        assert_eq!(profile.overall_score(), Some(83));
        assert!(profile.verification_badge());

        let scores: Vec<u8> = marketplace
            .tenant_views(SAMPLE_TENANT)
            .expect("views")
            .iter()
            .map(|view| view.match_score)
            .collect();
        assert_eq!(scores, vec![100, 98, 90]);
        assert_eq!(marketplace.featured_properties(Some(2)).expect("featured").len(), 2);
        assert!(marketplace.property(PropertyId(3)).is_ok());
    }

    #[test]
    fn seeding_twice_conflicts_on_the_tenant() {
        let marketplace = in_memory_marketplace(ScoringConfig::default());
        seed_sample_data(&marketplace).expect("seed succeeds");
        let err = seed_sample_data(&marketplace).expect_err("tenant exists");
        assert!(matches!(err, MarketplaceError::ProfileExists(SAMPLE_TENANT)));
    }
}
