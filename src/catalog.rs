//! Hand-curated reference catalogs. These never depend on scrape content, so
//! the reference domains stay identical from run to run.

use crate::models::Role;

pub const CURRENCIES: [(&str, &str); 5] = [
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("INR", "₹"),
    ("CAD", "C$"),
];

pub const JOB_TYPES: [&str; 6] = [
    "Full-time",
    "Part-time",
    "Contract",
    "Freelance",
    "Temporary",
    "Internship",
];

// Order matters: the first category whose name appears in a job title wins,
// so compound titles sit above the bare words they contain.
pub const JOB_CATEGORIES: [&str; 21] = [
    "Assistant Director",
    "Director of Photography",
    "Casting Director",
    "Cinematographer",
    "Director",
    "Producer",
    "Editor",
    "Sound",
    "Boom",
    "VFX",
    "Visual Effects",
    "Production Design",
    "Costume",
    "Makeup",
    "Script",
    "Writer",
    "Location",
    "Gaffer",
    "Grip",
    "Stunt",
    "Camera",
];

pub fn role_description(role: Role) -> &'static str {
    match role {
        Role::Admin => "Platform administrator with full access",
        Role::Recruiter => "Posts jobs and reviews applications",
        Role::Candidate => "Film professional looking for work",
    }
}

pub const PERMISSIONS: [(&str, &str); 6] = [
    ("users:manage", "Create, suspend and delete accounts"),
    ("jobs:create", "Publish new job posts"),
    ("jobs:manage", "Edit and close own job posts"),
    ("applications:review", "Accept or reject applications"),
    ("applications:create", "Apply to job posts"),
    ("profile:edit", "Edit own profile"),
];

pub fn role_permissions(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => &[
            "users:manage",
            "jobs:create",
            "jobs:manage",
            "applications:review",
            "applications:create",
            "profile:edit",
        ],
        Role::Recruiter => &[
            "jobs:create",
            "jobs:manage",
            "applications:review",
            "profile:edit",
        ],
        Role::Candidate => &["applications:create", "profile:edit"],
    }
}

pub const DEFAULT_SALARY_MULTIPLIER: f64 = 0.7;

/// Salary localisation factor relative to a US baseline.
pub fn salary_multiplier(country: &str) -> f64 {
    match country {
        "United States" => 1.0,
        "United Kingdom" => 0.85,
        "Canada" => 0.8,
        "Germany" => 0.8,
        "France" => 0.75,
        "Italy" => 0.65,
        "Spain" => 0.6,
        "India" => 0.2,
        _ => DEFAULT_SALARY_MULTIPLIER,
    }
}

pub const DEFAULT_CURRENCY: &str = "USD";

pub fn currency_for_country(country: &str) -> &'static str {
    match country {
        "United States" => "USD",
        "United Kingdom" => "GBP",
        "Canada" => "CAD",
        "India" => "INR",
        "France" | "Germany" | "Italy" | "Spain" => "EUR",
        _ => DEFAULT_CURRENCY,
    }
}

pub const RECRUITER_AVAILABILITY: &str = "Actively Hiring";

pub const CANDIDATE_AVAILABILITY: [&str; 5] = [
    "Available Now",
    "Open to Offers",
    "Available in 2 Weeks",
    "Booked Until Next Month",
    "On Set",
];

pub const PROJECT_TYPES: [&str; 8] = [
    "Feature Film",
    "Documentary",
    "TV Series",
    "Short Film",
    "Commercial",
    "Music Video",
    "Web Series",
    "Theatre Production",
];

pub const HIRING_DOMAINS: [&str; 5] = [
    "studiohire.com",
    "castingcall.io",
    "crewjobs.film",
    "productionhub.net",
    "reelrecruit.com",
];

pub const PERSONAL_DOMAINS: [&str; 5] = [
    "gmail.com",
    "outlook.com",
    "yahoo.com",
    "protonmail.com",
    "icloud.com",
];

pub const ADMIN_DOMAIN: &str = "crewseed.dev";
