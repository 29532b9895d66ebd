//! Reference table loading and filtering.

use mappazzone_engine::{City, CityFilter, Continent, GameError, GeoIndex};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeSet;

#[test]
fn test_builtin_capitals_load() {
    let index = GeoIndex::builtin().unwrap();
    assert!(index.len() >= 50);
    let rome = index.lookup("Rome").unwrap();
    assert!(rome.is_capital());
    assert_eq!(rome.continent(), Some(Continent::EU));
    assert!((rome.latitude() - 41.9).abs() < 0.1);
}

#[test]
fn test_lookup_unknown_city() {
    let index = GeoIndex::builtin().unwrap();
    assert_eq!(
        index.lookup("Atlantis"),
        Err(GameError::NotFound("Atlantis".to_string()))
    );
}

#[test]
fn test_sample_without_replacement() {
    let index = GeoIndex::builtin().unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let cities = index.sample(index.len(), &mut rng).unwrap();
    let names: BTreeSet<_> = cities.iter().map(City::name).collect();
    assert_eq!(names.len(), index.len());
    assert!(matches!(
        index.sample(index.len() + 1, &mut rng),
        Err(GameError::NotEnoughCities { .. })
    ));
}

#[test]
fn test_filter_by_continent() {
    let index = GeoIndex::builtin().unwrap();
    let filter = CityFilter {
        capitals_only: true,
        continents: Some([Continent::AF].into_iter().collect()),
    };
    let african = index.filtered(&filter);
    assert!(!african.is_empty());
    assert!(african.iter().all(|c| c.continent() == Some(Continent::AF)));
    assert!(african.lookup("Bangui").is_ok());
    assert!(african.lookup("Rome").is_err());
}

#[test]
fn test_malformed_tables_rejected() {
    let duplicate = r#"
        [[cities]]
        name = "Rome"
        latitude = 41.9
        longitude = 12.5

        [[cities]]
        name = "Rome"
        latitude = 0.0
        longitude = 0.0
    "#;
    assert!(GeoIndex::from_toml_str(duplicate).is_err());

    let out_of_range = r#"
        [[cities]]
        name = "Nowhere"
        latitude = 95.0
        longitude = 0.0
    "#;
    assert!(GeoIndex::from_toml_str(out_of_range).is_err());
    assert!(GeoIndex::from_toml_str("cities = 3").is_err());
}
