use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::catalog::{HIRING_DOMAINS, PERSONAL_DOMAINS};
use crate::models::Role;

/// Local part used when neither name segment has any usable characters.
pub const FALLBACK_LOCAL_PART: &str = "member";

/// Population segment a raw professional is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Recruiter,
    Candidate,
}

impl Segment {
    pub fn role(&self) -> Role {
        match self {
            Segment::Recruiter => Role::Recruiter,
            Segment::Candidate => Role::Candidate,
        }
    }

    pub fn domain_pool(&self) -> &'static [&'static str] {
        match self {
            Segment::Recruiter => &HIRING_DOMAINS,
            Segment::Candidate => &PERSONAL_DOMAINS,
        }
    }
}

/// Emails handed out during one run. Cleared whenever generated data is wiped.
#[derive(Debug, Default)]
pub struct EmailRegistry {
    taken: HashSet<String>,
}

impl EmailRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    pub fn contains(&self, email: &str) -> bool {
        self.taken.contains(email)
    }

    pub fn clear(&mut self) {
        self.taken.clear();
    }

    /// Picks a domain from the segment's pool and returns a free address on it.
    pub fn resolve<R: Rng + ?Sized>(
        &mut self,
        first_name: &str,
        last_name: &str,
        segment: Segment,
        rng: &mut R,
    ) -> String {
        let domain = segment
            .domain_pool()
            .choose(rng)
            .copied()
            .unwrap_or("example.com");
        self.resolve_on_domain(first_name, last_name, domain)
    }

    /// `first.last@domain`, then `first.last1@domain`, `first.last2@domain`, ...
    /// until an address not yet in the registry is found. The returned address is registered.
    pub fn resolve_on_domain(&mut self, first_name: &str, last_name: &str, domain: &str) -> String {
        let local = local_part(first_name, last_name);
        let mut candidate = format!("{}@{}", local, domain);
        let mut disambiguator: u64 = 0;
        while self.contains(&candidate) {
            disambiguator += 1;
            candidate = format!("{}{}@{}", local, disambiguator, domain);
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}

fn slug(segment: &str) -> String {
    segment
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Lowercased ASCII-alphanumeric name segments, empty ones dropped.
pub fn name_parts(first_name: &str, last_name: &str) -> Vec<String> {
    [first_name, last_name]
        .iter()
        .map(|s| slug(s))
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn local_part(first_name: &str, last_name: &str) -> String {
    let parts = name_parts(first_name, last_name);
    if parts.is_empty() {
        FALLBACK_LOCAL_PART.to_string()
    } else {
        parts.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_base_email_is_lowercase_dotted() {
        let mut registry = EmailRegistry::new();
        let email = registry.resolve_on_domain("Christopher", "Anderson", "gmail.com");
        assert_eq!(email, "christopher.anderson@gmail.com");
        assert!(registry.contains(&email));
    }

    #[test]
    fn test_collisions_get_increasing_disambiguators() {
        let mut registry = EmailRegistry::new();
        let emails: Vec<String> = (0..4)
            .map(|_| registry.resolve_on_domain("Emma", "Lee", "gmail.com"))
            .collect();
        assert_eq!(
            emails,
            vec![
                "emma.lee@gmail.com",
                "emma.lee1@gmail.com",
                "emma.lee2@gmail.com",
                "emma.lee3@gmail.com",
            ]
        );
    }

    #[test]
    fn test_mixed_names_all_unique() {
        let mut registry = EmailRegistry::new();
        let names = [
            ("Sarah", "Brown"),
            ("Sarah", "Brown"),
            ("David", "Moore"),
            ("Sarah", "Brown"),
            ("David", "Moore"),
            ("Lisa", "Perez"),
        ];
        let emails: Vec<String> = names
            .iter()
            .map(|(f, l)| registry.resolve_on_domain(f, l, "outlook.com"))
            .collect();
        let unique: HashSet<&String> = emails.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert_eq!(registry.len(), names.len());
        assert_eq!(emails[3], "sarah.brown2@outlook.com");
        assert_eq!(emails[4], "david.moore1@outlook.com");
    }

    #[test]
    fn test_empty_and_symbol_names_stay_valid() {
        assert_eq!(local_part("", ""), FALLBACK_LOCAL_PART);
        assert_eq!(local_part("!!!", "---"), FALLBACK_LOCAL_PART);
        assert_eq!(local_part("", "Garcia"), "garcia");
        assert_eq!(local_part("Mary-Jane", "O'Neil"), "maryjane.oneil");

        let mut registry = EmailRegistry::new();
        let a = registry.resolve_on_domain("", "", "icloud.com");
        let b = registry.resolve_on_domain("?", "", "icloud.com");
        assert_eq!(a, "member@icloud.com");
        assert_eq!(b, "member1@icloud.com");
    }

    #[test]
    fn test_segment_picks_from_its_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut registry = EmailRegistry::new();
        for _ in 0..20 {
            let email = registry.resolve("Kevin", "Martin", Segment::Recruiter, &mut rng);
            let domain = email.split('@').nth(1).unwrap();
            assert!(HIRING_DOMAINS.contains(&domain));
        }
        let email = registry.resolve("Kevin", "Martin", Segment::Candidate, &mut rng);
        assert!(PERSONAL_DOMAINS.contains(&email.split('@').nth(1).unwrap()));
    }

    #[test]
    fn test_clear_frees_addresses() {
        let mut registry = EmailRegistry::new();
        registry.resolve_on_domain("John", "Davis", "yahoo.com");
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(
            registry.resolve_on_domain("John", "Davis", "yahoo.com"),
            "john.davis@yahoo.com"
        );
    }
}
