use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

use crate::catalog::{JOB_CATEGORIES, PROJECT_TYPES};
use crate::db::Database;
use crate::models::{RawDataset, RawProfessional, WorkExperience};
use crate::people::Roster;

pub const MIN_RANDOM_SKILLS: usize = 3;
pub const MAX_RANDOM_SKILLS: usize = 8;
pub const MAX_EXPERIENCES: usize = 3;
/// Synthetic experience years reach back this many years before the current one.
pub const EXPERIENCE_YEARS_BACK: i32 = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachStats {
    pub skills: usize,
    pub experiences: usize,
}

/// The record's own skills when it has any, otherwise 3..=8 distinct vocabulary entries.
pub fn pick_skills<R: Rng + ?Sized>(
    raw: &RawProfessional,
    vocabulary: &[String],
    rng: &mut R,
) -> Vec<String> {
    if let Some(own) = raw.skills.as_ref().filter(|s| !s.is_empty()) {
        let mut picked: Vec<String> = Vec::with_capacity(own.len());
        for skill in own {
            if !picked.contains(skill) {
                picked.push(skill.clone());
            }
        }
        return picked;
    }
    if vocabulary.is_empty() {
        return Vec::new();
    }
    let count = rng
        .gen_range(MIN_RANDOM_SKILLS..=MAX_RANDOM_SKILLS)
        .min(vocabulary.len());
    vocabulary
        .choose_multiple(rng, count)
        .cloned()
        .collect()
}

/// Year from the last parenthesised group holding a plausible year,
/// e.g. `(2022)` or `(2021-2023)` -> 2023.
pub fn parse_year(line: &str, current_year: i32) -> Option<i32> {
    let groups: Vec<&str> = line
        .split('(')
        .skip(1)
        .filter_map(|chunk| chunk.split(')').next())
        .collect();
    groups
        .iter()
        .rev()
        .find_map(|group| {
            let last = group.rsplit(['-', '–']).next()?.trim();
            if last.len() != 4 {
                return None;
            }
            last.parse::<i32>()
                .ok()
                .filter(|year| (1900..=current_year).contains(year))
        })
}

fn project_type_in<R: Rng + ?Sized>(line: &str, rng: &mut R) -> String {
    let lower = line.to_lowercase();
    PROJECT_TYPES
        .iter()
        .find(|p| lower.contains(&p.to_lowercase()))
        .or_else(|| PROJECT_TYPES.choose(rng))
        .map(|p| p.to_string())
        .unwrap_or_default()
}

fn synthetic_year<R: Rng + ?Sized>(current_year: i32, rng: &mut R) -> i32 {
    rng.gen_range(current_year - EXPERIENCE_YEARS_BACK..=current_year)
}

fn from_text<R: Rng + ?Sized>(line: &str, current_year: i32, rng: &mut R) -> WorkExperience {
    let title = line.split(" - ").next().unwrap_or(line).trim().to_string();
    WorkExperience {
        title,
        project_type: project_type_in(line, rng),
        year: parse_year(line, current_year).unwrap_or_else(|| synthetic_year(current_year, rng)),
        description: Some(line.to_string()),
    }
}

pub fn build_experiences<R: Rng + ?Sized>(
    raw: &RawProfessional,
    categories: &[String],
    current_year: i32,
    rng: &mut R,
) -> Vec<WorkExperience> {
    let lines = raw
        .experience
        .as_ref()
        .map(|e| e.entries())
        .unwrap_or_default();
    if !lines.is_empty() {
        return lines
            .into_iter()
            .take(MAX_EXPERIENCES)
            .map(|line| from_text(line, current_year, rng))
            .collect();
    }

    let count = rng.gen_range(1..=MAX_EXPERIENCES);
    (0..count)
        .map(|_| {
            let category = categories
                .choose(rng)
                .map(String::as_str)
                .unwrap_or(raw.role.as_str());
            let project = PROJECT_TYPES.choose(rng).copied().unwrap_or("Feature Film");
            WorkExperience {
                title: format!("{} - {}", category, project),
                project_type: project.to_string(),
                year: synthetic_year(current_year, rng),
                description: Some(format!(
                    "{} work on a {} production",
                    category,
                    project.to_lowercase()
                )),
            }
        })
        .collect()
}

/// Attaches skills and work experience to every candidate that made it into the roster.
pub fn attach<R: Rng + ?Sized>(
    db: &Database,
    dataset: &RawDataset,
    roster: &Roster,
    current_year: i32,
    rng: &mut R,
) -> Result<AttachStats> {
    let categories: Vec<String> = if dataset.categories.is_empty() {
        JOB_CATEGORIES.iter().map(|c| c.to_string()).collect()
    } else {
        dataset.categories.clone()
    };

    let mut stats = AttachStats::default();
    for entry in &roster.candidates {
        let Some(raw) = dataset.professionals.get(entry.record_index) else {
            warn!(email = %entry.email, "roster entry has no raw record, skipping attributes");
            continue;
        };

        let skills = pick_skills(raw, &dataset.skills, rng);
        match db.create_skills(entry.profile_id, &skills) {
            Ok(n) => stats.skills += n,
            Err(err) => warn!(email = %entry.email, error = %err, "failed to attach skills"),
        }

        let experiences = build_experiences(raw, &categories, current_year, rng);
        match db.create_work_experiences(entry.profile_id, &experiences) {
            Ok(n) => stats.experiences += n,
            Err(err) => warn!(email = %entry.email, error = %err, "failed to attach work experience"),
        }
    }

    info!(skills = stats.skills, experiences = stats.experiences, "attributes attached");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Segment;
    use crate::models::{NewPerson, RawExperience, Role};
    use crate::people::RosterEntry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    const YEAR: i32 = 2026;

    fn raw(skills: Option<Vec<&str>>, experience: Option<RawExperience>) -> RawProfessional {
        RawProfessional {
            first_name: "Daniel".to_string(),
            last_name: "Thomas".to_string(),
            bio: String::new(),
            location: "Rome".to_string(),
            role: "Gaffer".to_string(),
            experience,
            skills: skills.map(|s| s.into_iter().map(String::from).collect()),
        }
    }

    fn vocabulary() -> Vec<String> {
        ["Maya", "Blender", "Foley", "Steadicam", "Pro Tools", "Budgeting", "Nuke", "Houdini", "Avid", "Resolve"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_own_skills_are_kept_and_deduplicated() {
        let mut rng = StdRng::seed_from_u64(1);
        let skills = pick_skills(&raw(Some(vec!["Maya", "Foley", "Maya"]), None), &vocabulary(), &mut rng);
        assert_eq!(skills, vec!["Maya", "Foley"]);
    }

    #[test]
    fn test_random_skills_are_bounded_and_distinct() {
        let vocab = vocabulary();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let skills = pick_skills(&raw(None, None), &vocab, &mut rng);
            assert!((MIN_RANDOM_SKILLS..=MAX_RANDOM_SKILLS).contains(&skills.len()));
            let unique: HashSet<&String> = skills.iter().collect();
            assert_eq!(unique.len(), skills.len());
            assert!(skills.iter().all(|s| vocab.contains(s)));
        }
    }

    #[test]
    fn test_empty_own_skills_fall_back_to_vocabulary() {
        let mut rng = StdRng::seed_from_u64(4);
        let skills = pick_skills(&raw(Some(vec![]), None), &vocabulary(), &mut rng);
        assert!(skills.len() >= MIN_RANDOM_SKILLS);
    }

    #[test]
    fn test_small_vocabulary_caps_skill_count() {
        let vocab = vec!["Maya".to_string(), "Nuke".to_string()];
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(pick_skills(&raw(None, None), &vocab, &mut rng).len(), 2);
        assert!(pick_skills(&raw(None, None), &[], &mut rng).is_empty());
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("Lead Editor - \"Midnight Stories\" (2023)", YEAR), Some(2023));
        assert_eq!(parse_year("Assistant Director - \"City Lights\" TV Series (2021-2023)", YEAR), Some(2023));
        assert_eq!(parse_year("Gaffer - no year", YEAR), None);
        assert_eq!(parse_year("Grip (3000)", YEAR), None);
        assert_eq!(parse_year("Grip (Season 2)", YEAR), None);
        assert_eq!(parse_year("Key Grip (2019) - Sequel (2099)", YEAR), Some(2019));
        assert_eq!(parse_year("Editor (2018) (Season 2)", YEAR), Some(2018));
    }

    #[test]
    fn test_experience_from_raw_text() {
        let mut rng = StdRng::seed_from_u64(8);
        let record = raw(
            None,
            Some(RawExperience::One("Assistant Director - \"City Lights\" TV Series (2021-2023)".to_string())),
        );
        let exps = build_experiences(&record, &[], YEAR, &mut rng);
        assert_eq!(exps.len(), 1);
        assert_eq!(exps[0].title, "Assistant Director");
        assert_eq!(exps[0].project_type, "TV Series");
        assert_eq!(exps[0].year, 2023);
    }

    #[test]
    fn test_raw_experience_list_is_capped() {
        let mut rng = StdRng::seed_from_u64(8);
        let lines = (0..5).map(|i| format!("Grip - Show {}", i)).collect();
        let exps = build_experiences(&raw(None, Some(RawExperience::Many(lines))), &[], YEAR, &mut rng);
        assert_eq!(exps.len(), MAX_EXPERIENCES);
        for exp in &exps {
            assert!((YEAR - EXPERIENCE_YEARS_BACK..=YEAR).contains(&exp.year));
        }
    }

    #[test]
    fn test_synthetic_experience_bounds() {
        let categories = vec!["Editor".to_string(), "Gaffer".to_string()];
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..50 {
            let exps = build_experiences(&raw(None, None), &categories, YEAR, &mut rng);
            assert!((1..=MAX_EXPERIENCES).contains(&exps.len()));
            for exp in exps {
                assert!((YEAR - EXPERIENCE_YEARS_BACK..=YEAR).contains(&exp.year));
                assert!(PROJECT_TYPES.contains(&exp.project_type.as_str()));
                let category = exp.title.split(" - ").next().unwrap();
                assert!(categories.iter().any(|c| c == category));
            }
        }
    }

    #[test]
    fn test_attach_only_touches_candidates() {
        let db = Database::open_in_memory().unwrap();
        db.init().unwrap();
        let role_id = db.create_role(Role::Candidate.as_str(), "test").unwrap();
        let mut roster = Roster::default();
        let mut dataset = RawDataset {
            skills: vocabulary(),
            ..Default::default()
        };

        for (i, segment) in [Segment::Recruiter, Segment::Candidate].into_iter().enumerate() {
            let email = format!("p{}@gmail.com", i);
            let (user_id, profile_id) = db
                .create_person(&NewPerson {
                    email: email.clone(),
                    password_hash: "x".to_string(),
                    role_id,
                    is_verified: true,
                    first_name: "P".to_string(),
                    last_name: i.to_string(),
                    bio: String::new(),
                    availability: "On Set".to_string(),
                    website: None,
                    public_email: None,
                    city_id: None,
                    country_id: None,
                    social_links: None,
                })
                .unwrap();
            dataset.professionals.push(raw(None, None));
            let entry = RosterEntry {
                user_id,
                profile_id,
                email,
                segment,
                record_index: i,
            };
            match segment {
                Segment::Recruiter => roster.recruiters.push(entry),
                Segment::Candidate => roster.candidates.push(entry),
            }
        }

        let mut rng = StdRng::seed_from_u64(5);
        let stats = attach(&db, &dataset, &roster, YEAR, &mut rng).unwrap();
        assert!(stats.skills >= MIN_RANDOM_SKILLS);
        assert!(stats.experiences >= 1);
        assert!(db.list_skills(roster.recruiters[0].profile_id).unwrap().is_empty());
        assert_eq!(
            db.list_skills(roster.candidates[0].profile_id).unwrap().len(),
            stats.skills
        );
        assert_eq!(
            db.list_work_experiences(roster.candidates[0].profile_id).unwrap().len(),
            stats.experiences
        );
    }
}
