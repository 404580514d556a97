use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::jobs::PostedJob;
use crate::models::{AiVerificationStatus, ApplicationStatus, NewApplication};
use crate::people::RosterEntry;

pub const MIN_APPLICATIONS: usize = 1;
pub const MAX_APPLICATIONS: usize = 5;

/// Distinct jobs for one candidate, never one they posted themselves.
pub fn pick_applications<R: Rng + ?Sized>(
    applicant_id: i64,
    jobs: &[PostedJob],
    rng: &mut R,
) -> Vec<NewApplication> {
    if jobs.is_empty() {
        return Vec::new();
    }
    let wanted = rng
        .gen_range(MIN_APPLICATIONS..=MAX_APPLICATIONS)
        .min(jobs.len());

    let picked: Vec<&PostedJob> = jobs.choose_multiple(rng, wanted).collect();
    picked
        .into_iter()
        .filter(|job| job.poster_id != applicant_id)
        .map(|job| NewApplication {
            job_post_id: job.id,
            applicant_id,
            status: *ApplicationStatus::ALL
                .choose(rng)
                .unwrap_or(&ApplicationStatus::Pending),
            ai_verification_status: *AiVerificationStatus::ALL
                .choose(rng)
                .unwrap_or(&AiVerificationStatus::Pending),
        })
        .collect()
}

/// Builds candidate → job applications and writes them as one batch.
/// Returns the number of rows actually inserted.
pub fn generate<R: Rng + ?Sized>(
    db: &Database,
    candidates: &[RosterEntry],
    jobs: &[PostedJob],
    rng: &mut R,
) -> Result<usize> {
    if jobs.is_empty() || candidates.is_empty() {
        warn!(
            candidates = candidates.len(),
            jobs = jobs.len(),
            "nothing to apply to, skipping applications"
        );
        return Ok(0);
    }

    let mut batch = Vec::new();
    for candidate in candidates {
        let picks = pick_applications(candidate.user_id, jobs, rng);
        debug!(email = %candidate.email, applications = picks.len(), "applications drafted");
        batch.extend(picks);
    }

    let inserted = db.create_applications(&batch)?;
    info!(drafted = batch.len(), inserted, "job applications generated");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn jobs(posters: &[i64]) -> Vec<PostedJob> {
        posters
            .iter()
            .enumerate()
            .map(|(i, poster_id)| PostedJob {
                id: i as i64 + 100,
                poster_id: *poster_id,
            })
            .collect()
    }

    #[test]
    fn test_picks_are_distinct_and_bounded() {
        let jobs = jobs(&[1, 1, 2, 2, 3, 3, 4]);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let picks = pick_applications(50, &jobs, &mut rng);
            assert!(!picks.is_empty());
            assert!(picks.len() <= MAX_APPLICATIONS);
            let ids: HashSet<i64> = picks.iter().map(|a| a.job_post_id).collect();
            assert_eq!(ids.len(), picks.len());
        }
    }

    #[test]
    fn test_single_job_gets_at_most_one_application() {
        let jobs = jobs(&[1]);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            assert_eq!(pick_applications(2, &jobs, &mut rng).len(), 1);
        }
    }

    #[test]
    fn test_never_applies_to_own_posting() {
        let jobs = jobs(&[7, 7, 8]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            for app in pick_applications(7, &jobs, &mut rng) {
                assert_eq!(app.job_post_id, 102);
            }
        }
    }

    #[test]
    fn test_no_jobs_means_no_applications() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(pick_applications(1, &[], &mut rng).is_empty());
        let db = Database::open_in_memory().unwrap();
        db.init().unwrap();
        assert_eq!(generate(&db, &[], &[], &mut rng).unwrap(), 0);
    }
}
