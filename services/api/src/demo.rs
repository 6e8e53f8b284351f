use crate::infra::{in_memory_marketplace, seed_sample_data, SAMPLE_TENANT};
use clap::Args;
use tenant_match::config::{AppConfig, ScoringConfig};
use tenant_match::error::AppError;
use tenant_match::marketplace::{
    CategoryMatch, CredentialScoreRequest, MatchReport, PropertyId, TenantFinancialInputs,
};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Gross annual income in dollars
    #[arg(long)]
    pub(crate) annual_income: f64,
    /// FICO-style credit score
    #[arg(long)]
    pub(crate) credit_score: u16,
    /// Years of rental history
    #[arg(long, default_value_t = 0.0)]
    pub(crate) years_of_rental_history: f64,
    /// Evictions on record
    #[arg(long, default_value_t = 0)]
    pub(crate) eviction_count: u32,
    /// Late rent payments on record
    #[arg(long, default_value_t = 0)]
    pub(crate) late_payment_count: u32,
    /// Years at the current job
    #[arg(long, default_value_t = 0.0)]
    pub(crate) years_at_current_job: f64,
    /// Months without employment in the last three years
    #[arg(long, default_value_t = 0)]
    pub(crate) months_unemployed: u32,
    /// Monthly rent to score affordability against (defaults to APP_REFERENCE_RENT)
    #[arg(long)]
    pub(crate) monthly_rent: Option<f64>,
}

impl ScoreArgs {
    pub(crate) fn into_request(self) -> CredentialScoreRequest {
        CredentialScoreRequest {
            inputs: TenantFinancialInputs {
                annual_income: self.annual_income,
                credit_score: self.credit_score,
                years_of_rental_history: self.years_of_rental_history,
                eviction_count: self.eviction_count,
                late_payment_count: self.late_payment_count,
                years_at_current_job: self.years_at_current_job,
                months_unemployed_last_3_years: self.months_unemployed,
            },
            monthly_rent: self.monthly_rent,
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Listing to render a detailed match report for (defaults to the best match)
    #[arg(long)]
    pub(crate) property_id: Option<u64>,
    /// Print the match report as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let marketplace = in_memory_marketplace(config.scoring);
    let scores = marketplace.preview_scores(&args.into_request())?;

    match serde_json::to_string_pretty(&scores.summary()) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Credential scores unavailable: {err}"),
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let marketplace = in_memory_marketplace(ScoringConfig::default());
    let seeded = seed_sample_data(&marketplace)?;

    println!("Tenant match demo");
    println!(
        "- Seeded {} tenant profile, {} listings and {} viewings",
        seeded.profiles, seeded.properties, seeded.views
    );

    let profile = marketplace.profile(SAMPLE_TENANT)?;
    println!(
        "- Tenant {} credentials: income {} | credit {} | rental history {} | employment {}",
        profile.user_id(),
        display_score(profile.income_score()),
        display_score(profile.credit_score()),
        display_score(profile.rental_history_score()),
        display_score(profile.employment_score()),
    );
    println!(
        "  Overall {} | verification badge {}",
        display_score(profile.overall_score()),
        if profile.verification_badge() {
            "earned"
        } else {
            "pending"
        }
    );

    let ranked = marketplace.matches_for_tenant(SAMPLE_TENANT)?;
    println!("\nRanked matches:");
    for entry in &ranked {
        println!(
            "  - #{} {} ({}, ${:.0}/month): {}% match",
            entry.property.id,
            entry.property.listing.title,
            entry.property.listing.city,
            entry.property.listing.price_per_month,
            entry.match_score
        );
    }

    let property_id = match args.property_id {
        Some(id) => PropertyId(id),
        None => match ranked.first() {
            Some(best) => best.property.id,
            None => {
                println!("  No listings available for a match report");
                return Ok(());
            }
        },
    };

    let report = marketplace.match_report(SAMPLE_TENANT, property_id)?;
    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("\nMatch report:\n{json}"),
            Err(err) => println!("\nMatch report unavailable: {err}"),
        }
    } else {
        render_report(&report);
    }

    Ok(())
}

fn render_report(report: &MatchReport) {
    match report.property_id {
        Some(id) => println!("\nMatch report for listing #{id}: {}%", report.match_score),
        None => println!("\nMatch report: {}%", report.match_score),
    }
    let areas = &report.match_areas;
    for (label, area) in [
        ("Income", &areas.income),
        ("Credit score", &areas.credit_score),
        ("Rental history", &areas.rental_history),
        ("Employment", &areas.employment),
    ] {
        println!("  - {}", render_area(label, area));
    }
}

fn render_area(label: &str, area: &CategoryMatch) -> String {
    format!(
        "{label}: {} ({}) | {}",
        area.score, area.rating, area.details
    )
}

fn display_score(score: Option<u8>) -> String {
    score.map_or_else(|| "n/a".to_string(), |score| score.to_string())
}
