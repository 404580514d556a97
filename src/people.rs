use anyhow::{anyhow, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::catalog::{ADMIN_DOMAIN, CANDIDATE_AVAILABILITY, RECRUITER_AVAILABILITY};
use crate::db::Database;
use crate::identity::{name_parts, EmailRegistry, Segment, FALLBACK_LOCAL_PART};
use crate::matching::resolve_city;
use crate::models::{NewPerson, RawProfessional, Role, SocialLinks};
use crate::reference::ReferenceData;

/// Every seeded account shares this password; only its salted hash is stored.
pub const SEED_PASSWORD: &str = "crewseed-demo-password";

const CANDIDATE_VERIFIED_PROBABILITY: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub user_id: i64,
    pub profile_id: i64,
    pub email: String,
    pub segment: Segment,
    /// Index of the raw professional this person was built from.
    pub record_index: usize,
}

/// People successfully created in this run, split by segment.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub admin_id: Option<i64>,
    pub recruiters: Vec<RosterEntry>,
    pub candidates: Vec<RosterEntry>,
}

impl Roster {
    pub fn len(&self) -> usize {
        self.recruiters.len() + self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, entry: RosterEntry) {
        match entry.segment {
            Segment::Recruiter => self.recruiters.push(entry),
            Segment::Candidate => self.candidates.push(entry),
        }
    }
}

/// floor(total × ratio), never more than `total`.
pub fn recruiter_count(total: usize, ratio: f64) -> usize {
    let ratio = ratio.clamp(0.0, 1.0);
    ((total as f64 * ratio).floor() as usize).min(total)
}

pub fn segment_for(index: usize, recruiters: usize) -> Segment {
    if index < recruiters {
        Segment::Recruiter
    } else {
        Segment::Candidate
    }
}

pub fn password_hash(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(SEED_PASSWORD.as_bytes());
    hasher.update(b":");
    hasher.update(email.as_bytes());
    hex::encode(hasher.finalize())
}

fn name_slugs(first_name: &str, last_name: &str) -> Vec<String> {
    let parts = name_parts(first_name, last_name);
    if parts.is_empty() {
        vec![FALLBACK_LOCAL_PART.to_string()]
    } else {
        parts
    }
}

/// Derived from the name alone, so the same person always gets the same links.
pub fn social_links_for(first_name: &str, last_name: &str) -> SocialLinks {
    let parts = name_slugs(first_name, last_name);
    let joined = parts.concat();
    SocialLinks {
        linkedin: format!("https://www.linkedin.com/in/{}", parts.join("-")),
        instagram: format!("https://www.instagram.com/{}", parts.join("_")),
        imdb: format!("https://www.imdb.com/find/?q={}", parts.join("+")),
        portfolio: format!("https://{}.film", joined),
    }
}

fn create_admin(db: &Database, reference: &ReferenceData, registry: &mut EmailRegistry) -> Result<Option<i64>> {
    let role_id = reference
        .role_id(Role::Admin)
        .ok_or_else(|| anyhow!("ADMIN role missing from reference data"))?;
    let email = registry.resolve_on_domain("admin", "", ADMIN_DOMAIN);
    let person = NewPerson {
        password_hash: password_hash(&email),
        role_id,
        is_verified: true,
        first_name: "Platform".to_string(),
        last_name: "Admin".to_string(),
        bio: "Keeps the lights on.".to_string(),
        availability: "Staff".to_string(),
        website: None,
        public_email: Some(email.clone()),
        city_id: None,
        country_id: None,
        social_links: None,
        email,
    };
    match db.create_person(&person) {
        Ok((user_id, _)) => Ok(Some(user_id)),
        Err(err) => {
            warn!(email = %person.email, error = %err, "failed to create admin account");
            Ok(None)
        }
    }
}

pub struct PersonOptions {
    pub recruiter_ratio: f64,
    pub with_admin: bool,
}

/// Creates one user + profile (+ social links) per raw professional.
pub fn synthesize<R: Rng + ?Sized>(
    db: &Database,
    reference: &ReferenceData,
    professionals: &[RawProfessional],
    options: &PersonOptions,
    registry: &mut EmailRegistry,
    rng: &mut R,
) -> Result<Roster> {
    let mut roster = Roster::default();
    if options.with_admin {
        roster.admin_id = create_admin(db, reference, registry)?;
    }

    let recruiters = recruiter_count(professionals.len(), options.recruiter_ratio);
    let role_for = |segment: Segment| {
        let role = segment.role();
        reference
            .role_id(role)
            .ok_or_else(|| anyhow!("{} role missing from reference data", role.as_str()))
    };
    let recruiter_role = role_for(Segment::Recruiter)?;
    let candidate_role = role_for(Segment::Candidate)?;

    for (index, raw) in professionals.iter().enumerate() {
        let segment = segment_for(index, recruiters);
        let email = registry.resolve(&raw.first_name, &raw.last_name, segment, rng);

        let city = resolve_city(&raw.location, &reference.cities, rng).map(|r| r.value());
        let country = city.and_then(|c| reference.country_of(c));

        let (role_id, availability, is_verified) = match segment {
            Segment::Recruiter => (recruiter_role, RECRUITER_AVAILABILITY.to_string(), true),
            Segment::Candidate => (
                candidate_role,
                CANDIDATE_AVAILABILITY
                    .choose(rng)
                    .copied()
                    .unwrap_or("Available Now")
                    .to_string(),
                rng.gen_bool(CANDIDATE_VERIFIED_PROBABILITY),
            ),
        };

        let links = social_links_for(&raw.first_name, &raw.last_name);
        let person = NewPerson {
            email: email.clone(),
            password_hash: password_hash(&email),
            role_id,
            is_verified,
            first_name: raw.first_name.clone(),
            last_name: raw.last_name.clone(),
            bio: raw.bio.clone(),
            availability,
            website: Some(links.portfolio.clone()),
            public_email: Some(email.clone()),
            city_id: city.map(|c| c.id),
            country_id: country.map(|c| c.id),
            social_links: Some(links),
        };

        match db.create_person(&person) {
            Ok((user_id, profile_id)) => roster.push(RosterEntry {
                user_id,
                profile_id,
                email,
                segment,
                record_index: index,
            }),
            Err(err) => {
                warn!(email = %email, error = %err, "failed to create person, skipping");
            }
        }
    }

    info!(
        people = roster.len(),
        recruiters = roster.recruiters.len(),
        candidates = roster.candidates.len(),
        admin = roster.admin_id.is_some(),
        "people synthesized"
    );
    Ok(roster)
}
