use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// --- Raw scraper contract ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDataset {
    pub locations: BTreeMap<String, Vec<String>>, // country -> cities
    pub categories: Vec<String>,
    pub skills: Vec<String>,
    pub professionals: Vec<RawProfessional>,
    pub jobs: Vec<RawJob>,
    #[serde(default)]
    pub scraped_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProfessional {
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub location: String,
    pub role: String,
    #[serde(default)]
    pub experience: Option<RawExperience>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
}

/// The scraper emits a single experience line; hand-edited files sometimes carry a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawExperience {
    One(String),
    Many(Vec<String>),
}

impl RawExperience {
    pub fn entries(&self) -> Vec<&str> {
        let lines: Vec<&str> = match self {
            RawExperience::One(line) => vec![line.as_str()],
            RawExperience::Many(lines) => lines.iter().map(String::as_str).collect(),
        };
        lines
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawJob {
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub source: Option<String>,
}

// --- Reference rows ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub country_id: i64,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub id: i64,
    pub code: String,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCategory {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobType {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRow {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Recruiter,
    Candidate,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Recruiter, Role::Candidate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Recruiter => "RECRUITER",
            Role::Candidate => "CANDIDATE",
        }
    }
}

// --- People ---

#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role_id: i64,
    pub is_verified: bool,
    pub created_at: String,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub availability: String,
    pub website: Option<String>,
    pub public_email: Option<String>,
    pub city_id: Option<i64>,
    pub country_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub linkedin: String,
    pub instagram: String,
    pub imdb: String,
    pub portfolio: String,
}

/// Everything needed to create a user, its profile and social links in one call.
#[derive(Debug, Clone)]
pub struct NewPerson {
    pub email: String,
    pub password_hash: String,
    pub role_id: i64,
    pub is_verified: bool,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub availability: String,
    pub website: Option<String>,
    pub public_email: Option<String>,
    pub city_id: Option<i64>,
    pub country_id: Option<i64>,
    pub social_links: Option<SocialLinks>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub title: String,
    pub project_type: String,
    pub year: i32,
    pub description: Option<String>,
}

// --- Jobs ---

#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPost {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub min_salary: i64,
    pub max_salary: i64,
    pub is_accepting: bool,
    pub poster_id: i64,
    pub currency_id: i64,
    pub job_type_id: i64,
    pub category_id: i64,
    pub city_id: Option<i64>,
    pub country_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewJobPost {
    pub title: String,
    pub description: String,
    pub min_salary: i64,
    pub max_salary: i64,
    pub is_accepting: bool,
    pub poster_id: i64,
    pub currency_id: i64,
    pub job_type_id: i64,
    pub category_id: i64,
    pub city_id: Option<i64>,
    pub country_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiVerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl AiVerificationStatus {
    pub const ALL: [AiVerificationStatus; 3] = [
        AiVerificationStatus::Pending,
        AiVerificationStatus::Verified,
        AiVerificationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AiVerificationStatus::Pending => "PENDING",
            AiVerificationStatus::Verified => "VERIFIED",
            AiVerificationStatus::Rejected => "REJECTED",
        }
    }
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: i64,
    pub job_post_id: i64,
    pub applicant_id: i64,
    pub status: String,
    pub ai_verification_status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy)]
pub struct NewApplication {
    pub job_post_id: i64,
    pub applicant_id: i64,
    pub status: ApplicationStatus,
    pub ai_verification_status: AiVerificationStatus,
}
