use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

use crate::catalog::{
    currency_for_country, salary_multiplier, DEFAULT_CURRENCY, DEFAULT_SALARY_MULTIPLIER,
};
use crate::db::Database;
use crate::matching::{resolve_category, resolve_city};
use crate::models::{Currency, NewJobPost, RawJob};
use crate::people::RosterEntry;
use crate::reference::ReferenceData;

/// No recruiter is handed more than this many postings.
pub const JOBS_PER_RECRUITER: usize = 3;

pub const SALARY_BASE: f64 = 40_000.0;
pub const SALARY_BASE_SPREAD: f64 = 40_000.0;
pub const SALARY_MIN_RATIO: f64 = 1.2;
pub const SALARY_RATIO_SPREAD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryBand {
    pub min: i64,
    pub max: i64,
}

/// `base_draw` is U(0, 40000), `ratio_draw` is U(0, 0.8).
pub fn salary_band(multiplier: f64, base_draw: f64, ratio_draw: f64) -> SalaryBand {
    let min = ((SALARY_BASE + base_draw) * multiplier).floor() as i64;
    let max = (min as f64 * (SALARY_MIN_RATIO + ratio_draw)).floor() as i64;
    SalaryBand { min, max }
}

pub fn sample_salary<R: Rng + ?Sized>(multiplier: f64, rng: &mut R) -> SalaryBand {
    let base_draw = rng.gen_range(0.0..SALARY_BASE_SPREAD);
    let ratio_draw = rng.gen_range(0.0..SALARY_RATIO_SPREAD);
    salary_band(multiplier, base_draw, ratio_draw)
}

pub fn job_cap(raw_jobs: usize, recruiters: usize) -> usize {
    raw_jobs.min(recruiters.saturating_mul(JOBS_PER_RECRUITER))
}

/// The mapped currency for the country, else the first currency on file.
pub fn currency_for<'a>(reference: &'a ReferenceData, country: Option<&str>) -> Option<&'a Currency> {
    let code = country.map(currency_for_country).unwrap_or(DEFAULT_CURRENCY);
    reference
        .currency_by_code(code)
        .or_else(|| reference.currencies.first())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedJob {
    pub id: i64,
    pub poster_id: i64,
}

/// Turns raw job records into postings, assigning recruiters round-robin.
pub fn synthesize<R: Rng + ?Sized>(
    db: &Database,
    reference: &ReferenceData,
    raw_jobs: &[RawJob],
    recruiters: &[RosterEntry],
    rng: &mut R,
) -> Result<Vec<PostedJob>> {
    let cap = job_cap(raw_jobs.len(), recruiters.len());
    if cap == 0 {
        warn!(
            raw_jobs = raw_jobs.len(),
            recruiters = recruiters.len(),
            "no job posts to create"
        );
        return Ok(Vec::new());
    }

    let mut posted = Vec::with_capacity(cap);
    for (i, raw) in raw_jobs.iter().take(cap).enumerate() {
        let recruiter = &recruiters[i % recruiters.len()];

        let city = resolve_city(&raw.location, &reference.cities, rng).map(|r| r.value());
        let country = city.and_then(|c| reference.country_of(c));
        let country_name = country.map(|c| c.name.as_str());

        let Some(category) = resolve_category(&raw.title, &reference.categories, rng) else {
            warn!(title = %raw.title, "no job categories available, skipping job");
            continue;
        };
        let Some(job_type) = reference.job_types.choose(rng) else {
            warn!(title = %raw.title, "no job types available, skipping job");
            continue;
        };
        let Some(currency) = currency_for(reference, country_name) else {
            warn!(title = %raw.title, "no currencies available, skipping job");
            continue;
        };

        let multiplier = country_name
            .map(salary_multiplier)
            .unwrap_or(DEFAULT_SALARY_MULTIPLIER);
        let salary = sample_salary(multiplier, rng);

        let job = NewJobPost {
            title: raw.title.clone(),
            description: raw.description.clone(),
            min_salary: salary.min,
            max_salary: salary.max,
            is_accepting: true,
            poster_id: recruiter.user_id,
            currency_id: currency.id,
            job_type_id: job_type.id,
            category_id: category.value().id,
            city_id: city.map(|c| c.id),
            country_id: country.map(|c| c.id),
        };

        match db.create_job_post(&job) {
            Ok(id) => posted.push(PostedJob {
                id,
                poster_id: recruiter.user_id,
            }),
            Err(err) => warn!(title = %raw.title, error = %err, "failed to create job post, skipping"),
        }
    }

    info!(jobs = posted.len(), cap, "job posts synthesized");
    Ok(posted)
}
