use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::SeedError;
use crate::models::RawDataset;

pub fn load_dataset(path: &Path) -> Result<RawDataset, SeedError> {
    let text = fs::read_to_string(path).map_err(|source| SeedError::InputUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_dataset(&text).map_err(|source| SeedError::InputInvalid {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        professionals = dataset.professionals.len(),
        jobs = dataset.jobs.len(),
        countries = dataset.locations.len(),
        "loaded raw dataset"
    );
    Ok(dataset)
}

pub fn parse_dataset(text: &str) -> Result<RawDataset, serde_json::Error> {
    let mut dataset: RawDataset = serde_json::from_str(text)?;
    normalize(&mut dataset);
    Ok(dataset)
}

/// Trims free-text fields and drops blank vocabulary entries.
fn normalize(dataset: &mut RawDataset) {
    // Keys that only differ by surrounding whitespace name the same country.
    for (country, cities) in std::mem::take(&mut dataset.locations) {
        let country = country.trim();
        if country.is_empty() {
            warn!(cities = cities.len(), "dropping cities listed under a blank country");
            continue;
        }
        dataset
            .locations
            .entry(country.to_string())
            .or_default()
            .extend(cities);
    }

    let mut seen_cities: HashMap<String, String> = HashMap::new();
    for (country, cities) in dataset.locations.iter_mut() {
        let mut unique: Vec<String> = Vec::with_capacity(cities.len());
        for city in cities.drain(..) {
            let city = city.trim();
            if !city.is_empty() && !unique.iter().any(|c| c == city) {
                unique.push(city.to_string());
            }
        }
        *cities = unique;
        for city in cities.iter() {
            if let Some(first) = seen_cities.insert(city.clone(), country.clone()) {
                if first != *country {
                    warn!(city = %city, first = %first, second = %country, "city listed under more than one country");
                }
            }
        }
    }

    for list in [&mut dataset.categories, &mut dataset.skills] {
        list.iter_mut().for_each(|s| *s = s.trim().to_string());
        list.retain(|s| !s.is_empty());
    }

    for pro in dataset.professionals.iter_mut() {
        pro.first_name = pro.first_name.trim().to_string();
        pro.last_name = pro.last_name.trim().to_string();
        pro.location = pro.location.trim().to_string();
        if let Some(skills) = pro.skills.as_mut() {
            skills.iter_mut().for_each(|s| *s = s.trim().to_string());
            skills.retain(|s| !s.is_empty());
        }
    }

    for job in dataset.jobs.iter_mut() {
        job.title = job.title.trim().to_string();
        job.description = job.description.trim().to_string();
        job.location = job.location.trim().to_string();
    }
}
