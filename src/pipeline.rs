use std::path::PathBuf;

use anyhow::Result;
use chrono::Datelike;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::applications;
use crate::attributes;
use crate::db::{Database, TABLES_IN_CREATION_ORDER};
use crate::error::SeedError;
use crate::identity::EmailRegistry;
use crate::jobs;
use crate::models::RawDataset;
use crate::people::{self, PersonOptions};
use crate::reference;
use crate::reset;

pub const DEFAULT_RECRUITER_RATIO: f64 = 0.2;

/// Knobs for a single seed run.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub input: PathBuf,
    /// Fixed RNG seed for reproducible runs; entropy when absent.
    pub seed: Option<u64>,
    pub recruiter_ratio: f64,
    pub with_admin: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("film_industry_data.json"),
            seed: None,
            recruiter_ratio: DEFAULT_RECRUITER_RATIO,
            with_admin: true,
        }
    }
}

impl SeedConfig {
    pub fn validate(&self) -> Result<(), SeedError> {
        if !(0.0..=1.0).contains(&self.recruiter_ratio) {
            return Err(SeedError::Config(format!(
                "recruiter ratio must be within [0, 1], got {}",
                self.recruiter_ratio
            )));
        }
        Ok(())
    }

    fn person_options(&self) -> PersonOptions {
        PersonOptions {
            recruiter_ratio: self.recruiter_ratio,
            with_admin: self.with_admin,
        }
    }
}

/// Row counts per table, in creation order, read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub counts: Vec<(&'static str, i64)>,
}

impl RunStats {
    pub fn collect(db: &Database) -> Result<Self> {
        let counts = TABLES_IN_CREATION_ORDER
            .iter()
            .map(|table| Ok((*table, db.count(table)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { counts })
    }

    pub fn get(&self, table: &str) -> i64 {
        self.counts
            .iter()
            .find(|(name, _)| *name == table)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> i64 {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

/// Owns the store, the RNG and the email registry for the life of a run.
pub struct Seeder {
    db: Database,
    rng: StdRng,
    registry: EmailRegistry,
}

impl Seeder {
    pub fn new(db: Database, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            db,
            rng,
            registry: EmailRegistry::new(),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn reset(&mut self) -> Result<usize> {
        reset::reset(&self.db, &mut self.registry)
    }

    /// Wipes the store, then rebuilds every table from `dataset`.
    pub fn run(&mut self, dataset: &RawDataset, config: &SeedConfig) -> Result<RunStats> {
        self.reset()?;

        let reference = reference::build(&self.db, &dataset.locations)?;
        let roster = people::synthesize(
            &self.db,
            &reference,
            &dataset.professionals,
            &config.person_options(),
            &mut self.registry,
            &mut self.rng,
        )?;
        if roster.is_empty() {
            warn!("no professionals were created, later stages have nothing to work with");
        }

        let current_year = chrono::Local::now().year();
        attributes::attach(&self.db, dataset, &roster, current_year, &mut self.rng)?;

        let posted = jobs::synthesize(
            &self.db,
            &reference,
            &dataset.jobs,
            &roster.recruiters,
            &mut self.rng,
        )?;
        applications::generate(&self.db, &roster.candidates, &posted, &mut self.rng)?;

        let stats = RunStats::collect(&self.db)?;
        info!(
            users = stats.get("users"),
            job_posts = stats.get("job_posts"),
            applications = stats.get("job_applications"),
            rows = stats.total(),
            "seed run complete"
        );
        Ok(stats)
    }
}
