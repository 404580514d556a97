//! Best-effort lookups: an exact match when there is one, otherwise a uniform
//! pick among every candidate. `None` only when there is nothing to pick from.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::models::{City, JobCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a, T> {
    Matched(&'a T),
    Fallback(&'a T),
}

impl<'a, T> Resolution<'a, T> {
    pub fn value(&self) -> &'a T {
        match self {
            Resolution::Matched(v) | Resolution::Fallback(v) => *v,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Resolution::Matched(_))
    }
}

fn match_or_pick<'a, T, R, F>(items: &'a [T], rng: &mut R, is_match: F) -> Option<Resolution<'a, T>>
where
    R: Rng + ?Sized,
    F: Fn(&T) -> bool,
{
    if let Some(found) = items.iter().find(|item| is_match(*item)) {
        return Some(Resolution::Matched(found));
    }
    items.choose(rng).map(Resolution::Fallback)
}

/// Exact, case-sensitive city name match.
pub fn resolve_city<'a, R: Rng + ?Sized>(
    location: &str,
    cities: &'a [City],
    rng: &mut R,
) -> Option<Resolution<'a, City>> {
    let resolved = match_or_pick(cities, rng, |city| city.name == location);
    if let Some(city) = resolved.as_ref().filter(|r| !r.is_match()) {
        debug!(location, fallback = %city.value().name, "no city matched, picked at random");
    }
    resolved
}

/// First category whose name appears (case-insensitively) in the title.
pub fn resolve_category<'a, R: Rng + ?Sized>(
    title: &str,
    categories: &'a [JobCategory],
    rng: &mut R,
) -> Option<Resolution<'a, JobCategory>> {
    let title = title.to_lowercase();
    let resolved = match_or_pick(categories, rng, |category| {
        title.contains(&category.name.to_lowercase())
    });
    if let Some(category) = resolved.as_ref().filter(|r| !r.is_match()) {
        debug!(title = %title, fallback = %category.value().name, "no category matched, picked at random");
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cities() -> Vec<City> {
        ["Paris", "Lyon", "Cannes"]
            .iter()
            .enumerate()
            .map(|(i, name)| City {
                id: i as i64 + 1,
                name: name.to_string(),
                country_id: 1,
                is_deleted: false,
            })
            .collect()
    }

    fn categories(names: &[&str]) -> Vec<JobCategory> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| JobCategory {
                id: i as i64 + 1,
                name: name.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_exact_city_match() {
        let cities = cities();
        let mut rng = StdRng::seed_from_u64(1);
        let resolved = resolve_city("Lyon", &cities, &mut rng).unwrap();
        assert!(resolved.is_match());
        assert_eq!(resolved.value().name, "Lyon");
    }

    #[test]
    fn test_city_match_is_case_sensitive() {
        let cities = cities();
        let mut rng = StdRng::seed_from_u64(1);
        let resolved = resolve_city("lyon", &cities, &mut rng).unwrap();
        assert!(!resolved.is_match());
    }

    #[test]
    fn test_unknown_city_falls_back_to_existing_city() {
        let cities = cities();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let resolved = resolve_city("Remote", &cities, &mut rng).unwrap();
            assert!(!resolved.is_match());
            assert!(cities.contains(resolved.value()));
        }
    }

    #[test]
    fn test_no_cities_resolves_to_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(resolve_city("Paris", &[], &mut rng).is_none());
    }

    #[test]
    fn test_category_substring_match() {
        let categories = categories(&["Editing", "Sound", "Lighting"]);
        let mut rng = StdRng::seed_from_u64(3);
        let resolved = resolve_category("Sound Engineer", &categories, &mut rng).unwrap();
        assert!(resolved.is_match());
        assert_eq!(resolved.value().name, "Sound");
    }

    #[test]
    fn test_category_match_ignores_case() {
        let categories = categories(&["Visual Effects"]);
        let mut rng = StdRng::seed_from_u64(3);
        let resolved =
            resolve_category("Senior VISUAL EFFECTS artist", &categories, &mut rng).unwrap();
        assert!(resolved.is_match());
    }

    #[test]
    fn test_category_falls_back_when_nothing_matches() {
        let categories = categories(&["Editing", "Sound"]);
        let mut rng = StdRng::seed_from_u64(9);
        let resolved = resolve_category("Catering Lead", &categories, &mut rng).unwrap();
        assert!(!resolved.is_match());
        assert!(categories.contains(resolved.value()));
    }
}
