use anyhow::Result;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::catalog;
use crate::db::{is_constraint_violation, Database};
use crate::models::{City, Country, Currency, JobCategory, JobType, Role, RoleRow};

/// Read-only snapshot of the reference tables, taken once they are populated.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub roles: Vec<RoleRow>,
    pub countries: Vec<Country>,
    pub cities: Vec<City>,
    pub currencies: Vec<Currency>,
    pub categories: Vec<JobCategory>,
    pub job_types: Vec<JobType>,
}

impl ReferenceData {
    pub fn load(db: &Database) -> Result<Self> {
        Ok(Self {
            roles: db.list_roles()?,
            countries: db.list_countries()?,
            cities: db.list_cities()?,
            currencies: db.list_currencies()?,
            categories: db.list_job_categories()?,
            job_types: db.list_job_types()?,
        })
    }

    pub fn role_id(&self, role: Role) -> Option<i64> {
        self.roles
            .iter()
            .find(|r| r.name == role.as_str())
            .map(|r| r.id)
    }

    pub fn country(&self, id: i64) -> Option<&Country> {
        self.countries.iter().find(|c| c.id == id)
    }

    pub fn country_of(&self, city: &City) -> Option<&Country> {
        self.country(city.country_id)
    }

    pub fn currency_by_code(&self, code: &str) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.code == code)
    }
}

/// Duplicate inserts are logged and skipped; any other store failure is returned.
fn created(kind: &str, name: &str, result: Result<i64>) -> Result<Option<i64>> {
    match result {
        Ok(id) => Ok(Some(id)),
        Err(err) if is_constraint_violation(&err) => {
            warn!(kind, name, error = %err, "skipping duplicate reference row");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

pub fn create_roles_and_permissions(db: &Database) -> Result<()> {
    for role in Role::ALL {
        created(
            "role",
            role.as_str(),
            db.create_role(role.as_str(), catalog::role_description(role)),
        )?;
    }
    for (name, description) in catalog::PERMISSIONS {
        created("permission", name, db.create_permission(name, description))?;
    }

    let roles = db.list_roles()?;
    let permissions = db.list_permissions()?;
    for role in Role::ALL {
        let Some(role_row) = roles.iter().find(|r| r.name == role.as_str()) else {
            continue;
        };
        for name in catalog::role_permissions(role) {
            let Some(permission) = permissions.iter().find(|p| p.name == *name) else {
                warn!(role = role.as_str(), permission = *name, "permission missing, grant skipped");
                continue;
            };
            match db.grant_permission(role_row.id, permission.id) {
                Ok(()) => {}
                Err(err) if is_constraint_violation(&err) => {
                    warn!(role = role.as_str(), permission = *name, "grant already present");
                }
                Err(err) => return Err(err),
            }
        }
    }
    Ok(())
}

/// One country row per distinct country, one city row per city under it.
pub fn create_locations(db: &Database, locations: &BTreeMap<String, Vec<String>>) -> Result<()> {
    for (country, cities) in locations {
        let country_id = match created("country", country, db.create_country(country))? {
            Some(id) => id,
            None => match db.find_country_by_name(country)? {
                Some(existing) => existing.id,
                None => continue,
            },
        };
        for city in cities {
            created("city", city, db.create_city(city, country_id))?;
        }
    }
    Ok(())
}

pub fn create_catalogs(db: &Database) -> Result<()> {
    for (code, symbol) in catalog::CURRENCIES {
        created("currency", code, db.create_currency(code, symbol))?;
    }
    for name in catalog::JOB_CATEGORIES {
        created("job category", name, db.create_job_category(name))?;
    }
    for name in catalog::JOB_TYPES {
        created("job type", name, db.create_job_type(name))?;
    }
    Ok(())
}

/// Populates every reference table and returns the resulting snapshot.
pub fn build(db: &Database, locations: &BTreeMap<String, Vec<String>>) -> Result<ReferenceData> {
    create_roles_and_permissions(db)?;
    create_locations(db, locations)?;
    create_catalogs(db)?;

    let reference = ReferenceData::load(db)?;
    info!(
        countries = reference.countries.len(),
        cities = reference.cities.len(),
        currencies = reference.currencies.len(),
        categories = reference.categories.len(),
        job_types = reference.job_types.len(),
        roles = reference.roles.len(),
        "reference data ready"
    );
    Ok(reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.init().unwrap();
        db
    }

    fn locations(pairs: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(country, cities)| {
                (
                    country.to_string(),
                    cities.iter().map(|c| c.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_every_city_references_a_country_of_the_run() {
        let db = test_db();
        let reference = build(
            &db,
            &locations(&[
                ("France", &["Paris", "Lyon"]),
                ("Italy", &["Rome", "Milan", "Venice"]),
            ]),
        )
        .unwrap();
        assert_eq!(reference.countries.len(), 2);
        assert_eq!(reference.cities.len(), 5);
        for city in &reference.cities {
            assert!(reference.country_of(city).is_some(), "{}", city.name);
        }
        let rome = reference.cities.iter().find(|c| c.name == "Rome").unwrap();
        assert_eq!(reference.country_of(rome).unwrap().name, "Italy");
    }

    #[test]
    fn test_duplicate_city_is_logged_not_fatal() {
        let db = test_db();
        let reference = build(
            &db,
            &locations(&[
                ("Canada", &["Paris", "Toronto"]),
                ("France", &["Paris", "Cannes"]),
            ]),
        )
        .unwrap();
        assert_eq!(reference.cities.len(), 3);
        let paris = reference.cities.iter().find(|c| c.name == "Paris").unwrap();
        assert_eq!(reference.country_of(paris).unwrap().name, "Canada");
    }

    #[test]
    fn test_static_catalogs_are_independent_of_input() {
        let db = test_db();
        let reference = build(&db, &BTreeMap::new()).unwrap();
        assert_eq!(reference.currencies.len(), catalog::CURRENCIES.len());
        assert_eq!(reference.categories.len(), catalog::JOB_CATEGORIES.len());
        assert_eq!(reference.job_types.len(), catalog::JOB_TYPES.len());
        assert!(reference.cities.is_empty());
        for role in Role::ALL {
            assert!(reference.role_id(role).is_some());
        }
        assert_eq!(reference.currency_by_code("INR").unwrap().symbol, "₹");
    }

    #[test]
    fn test_rebuilding_over_existing_rows_does_not_fail() {
        let db = test_db();
        let locs = locations(&[("Spain", &["Madrid"])]);
        build(&db, &locs).unwrap();
        let reference = build(&db, &locs).unwrap();
        assert_eq!(reference.countries.len(), 1);
        assert_eq!(reference.cities.len(), 1);
    }

    #[test]
    fn test_role_grants() {
        let db = test_db();
        let reference = build(&db, &BTreeMap::new()).unwrap();
        let candidate = reference.role_id(Role::Candidate).unwrap();
        assert_eq!(
            db.list_role_permission_names(candidate).unwrap(),
            vec!["applications:create", "profile:edit"]
        );
        let admin = reference.role_id(Role::Admin).unwrap();
        assert_eq!(
            db.list_role_permission_names(admin).unwrap().len(),
            catalog::PERMISSIONS.len()
        );
    }

    #[test]
    fn test_scraped_job_titles_match_a_category() {
        use crate::matching::resolve_category;
        use rand::SeedableRng;

        let db = test_db();
        let reference = build(&db, &BTreeMap::new()).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let titles = [
            ("Senior Video Editor - Netflix Original Series", "Editor"),
            ("Director of Photography - Independent Film", "Director of Photography"),
            ("VFX Supervisor - Marvel Studios", "VFX"),
            ("Sound Designer - A24 Horror Film", "Sound"),
            ("Production Designer - HBO Max Series", "Production Design"),
            ("Cinematographer - Documentary Film", "Cinematographer"),
            ("Assistant Director - Warner Bros Feature", "Assistant Director"),
            ("Makeup Department Head - Disney+ Fantasy", "Makeup"),
            ("Gaffer - Apple TV+ Drama Series", "Gaffer"),
            ("Script Supervisor - Amazon Prime Thriller", "Script"),
            ("Casting Director - Indie Romance Film", "Casting Director"),
            ("Location Manager - Netflix Action Series", "Location"),
            ("Stunt Coordinator - Fast & Furious Franchise", "Stunt"),
            ("Costume Designer - Period Drama Film", "Costume"),
            ("Boom Operator - Sitcom Production", "Boom"),
            ("Sound Engineer", "Sound"),
        ];
        for (title, expected) in titles {
            let resolved = resolve_category(title, &reference.categories, &mut rng).unwrap();
            assert!(resolved.is_match(), "{title}");
            assert_eq!(resolved.value().name, expected, "{title}");
        }
    }
}
