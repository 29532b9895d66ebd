//! Reference geography: cities and the read-only index they are drawn from.

use crate::error::{DataError, GameError, GameResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, instrument};

/// Built-in reference table of world capitals.
const BUILTIN_CAPITALS: &str = include_str!("../data/capitals.toml");

/// Continent a city belongs to, keyed by its two-letter code.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
)]
pub enum Continent {
    /// Africa.
    #[strum(serialize = "AF", to_string = "Africa")]
    AF,
    /// Antarctica.
    #[strum(serialize = "AN", to_string = "Antarctica")]
    AN,
    /// Asia.
    #[strum(serialize = "AS", to_string = "Asia")]
    AS,
    /// Europe.
    #[strum(serialize = "EU", to_string = "Europe")]
    EU,
    /// North America.
    #[strum(serialize = "NA", to_string = "North America")]
    NA,
    /// Oceania.
    #[strum(serialize = "OC", to_string = "Oceania")]
    OC,
    /// South America.
    #[strum(serialize = "SA", to_string = "South America")]
    SA,
}

/// A city with its coordinates, in degrees.
///
/// Cities are identified by name. The metadata fields are optional in data files
/// and are only used to filter the index before a deck is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    continent: Option<Continent>,
    #[serde(default)]
    capital: bool,
}

impl City {
    /// Creates a city without metadata.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            country: None,
            continent: None,
            capital: false,
        }
    }

    /// Attaches country, continent and capital metadata.
    pub fn with_metadata(
        mut self,
        country: impl Into<String>,
        continent: Continent,
        capital: bool,
    ) -> Self {
        self.country = Some(country.into());
        self.continent = Some(continent);
        self.capital = capital;
        self
    }

    /// City name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latitude in degrees, positive north.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees, positive east.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Country name, if known.
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Continent, if known.
    pub fn continent(&self) -> Option<Continent> {
        self.continent
    }

    /// Whether the city is a national capital.
    pub fn is_capital(&self) -> bool {
        self.capital
    }

    fn check(&self) -> Result<(), DataError> {
        if self.name.trim().is_empty() {
            return Err(DataError::new("City with an empty name"));
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(DataError::new(format!(
                "Latitude {} of {} is outside [-90, 90]",
                self.latitude, self.name
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(DataError::new(format!(
                "Longitude {} of {} is outside [-180, 180]",
                self.longitude, self.name
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.2}, {:.2})", self.name, self.latitude, self.longitude)
    }
}

/// Which cities of an index may end up in a deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityFilter {
    /// Keep only national capitals.
    #[serde(default)]
    pub capitals_only: bool,
    /// Keep only cities on these continents. `None` keeps every city.
    #[serde(default)]
    pub continents: Option<BTreeSet<Continent>>,
}

impl CityFilter {
    /// Whether `city` passes the filter.
    pub fn accepts(&self, city: &City) -> bool {
        if self.capitals_only && !city.is_capital() {
            return false;
        }
        match &self.continents {
            Some(allowed) => city.continent().is_some_and(|c| allowed.contains(&c)),
            None => true,
        }
    }
}

#[derive(Deserialize)]
struct CityTable {
    cities: Vec<City>,
}

/// Read-only table of cities keyed by name.
///
/// Construct it once and hand it to every session that needs it: the index is never
/// mutated after loading, so sharing it across sessions is safe.
#[derive(Debug, Clone, Default)]
pub struct GeoIndex {
    cities: Vec<City>,
    by_name: HashMap<String, usize>,
}

impl GeoIndex {
    /// Builds an index, rejecting duplicate names and out-of-range coordinates.
    #[instrument(skip(cities), fields(count = cities.len()))]
    pub fn from_cities(cities: Vec<City>) -> Result<Self, DataError> {
        let mut by_name = HashMap::with_capacity(cities.len());
        for (idx, city) in cities.iter().enumerate() {
            city.check()?;
            if by_name.insert(city.name.clone(), idx).is_some() {
                return Err(DataError::new(format!("Duplicate city name {:?}", city.name)));
            }
        }
        debug!("Reference table validated");
        Ok(Self { cities, by_name })
    }

    /// Parses a TOML reference table made of a `[[cities]]` array.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, DataError> {
        let table: CityTable = toml::from_str(content)?;
        Self::from_cities(table.cities)
    }

    /// The embedded table of world capitals.
    #[instrument]
    pub fn builtin() -> Result<Self, DataError> {
        let index = Self::from_toml_str(BUILTIN_CAPITALS)?;
        info!(cities = index.len(), "Loaded built-in capitals");
        Ok(index)
    }

    /// Looks a city up by exact name.
    pub fn lookup(&self, name: &str) -> GameResult<&City> {
        self.by_name
            .get(name)
            .map(|&idx| &self.cities[idx])
            .ok_or_else(|| GameError::NotFound(name.to_string()))
    }

    /// Draws `n` distinct cities without replacement.
    #[instrument(skip(self, rng))]
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> GameResult<Vec<City>> {
        if n > self.cities.len() {
            return Err(GameError::NotEnoughCities {
                requested: n,
                available: self.cities.len(),
            });
        }
        let picked = rand::seq::index::sample(rng, self.cities.len(), n)
            .into_iter()
            .map(|idx| self.cities[idx].clone())
            .collect();
        Ok(picked)
    }

    /// A new index holding only the cities accepted by `filter`.
    #[instrument(skip(self))]
    pub fn filtered(&self, filter: &CityFilter) -> GeoIndex {
        let cities: Vec<City> = self
            .cities
            .iter()
            .filter(|city| filter.accepts(city))
            .cloned()
            .collect();
        let by_name = cities
            .iter()
            .enumerate()
            .map(|(idx, city)| (city.name.clone(), idx))
            .collect();
        debug!(kept = cities.len(), of = self.cities.len(), "Filtered reference table");
        GeoIndex { cities, by_name }
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Whether the index holds no city.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Cities in load order.
    pub fn iter(&self) -> impl Iterator<Item = &City> {
        self.cities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample_index() -> GeoIndex {
        GeoIndex::from_cities(vec![
            City::new("Rome", 41.89, 12.48).with_metadata("Italy", Continent::EU, true),
            City::new("Milan", 45.46, 9.19).with_metadata("Italy", Continent::EU, false),
            City::new("Nairobi", -1.29, 36.82).with_metadata("Kenya", Continent::AF, true),
            City::new("Lima", -12.05, -77.04).with_metadata("Peru", Continent::SA, true),
            City::new("Nowhere", 0.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_found_and_missing() {
        let index = sample_index();
        assert_eq!(index.lookup("Rome").unwrap().longitude(), 12.48);
        assert_eq!(
            index.lookup("Paris"),
            Err(GameError::NotFound("Paris".to_string()))
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = GeoIndex::from_cities(vec![
            City::new("Rome", 41.89, 12.48),
            City::new("Rome", 41.0, 12.0),
        ]);
        assert!(result.unwrap_err().message.contains("Duplicate"));
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        assert!(GeoIndex::from_cities(vec![City::new("North", 90.5, 0.0)]).is_err());
        assert!(GeoIndex::from_cities(vec![City::new("East", 0.0, 180.1)]).is_err());
        assert!(GeoIndex::from_cities(vec![City::new("Nan", f64::NAN, 0.0)]).is_err());
        assert!(GeoIndex::from_cities(vec![City::new("Pole", -90.0, -180.0)]).is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(GeoIndex::from_cities(vec![City::new("  ", 0.0, 0.0)]).is_err());
    }

    #[test]
    fn test_sample_is_distinct() {
        let index = sample_index();
        let mut rng = StdRng::seed_from_u64(7);
        let picked = index.sample(4, &mut rng).unwrap();
        let names: BTreeSet<_> = picked.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_sample_too_many() {
        let index = sample_index();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            index.sample(6, &mut rng),
            Err(GameError::NotEnoughCities {
                requested: 6,
                available: 5
            })
        );
    }

    #[test]
    fn test_filter_capitals_and_continents() {
        let index = sample_index();
        let capitals = index.filtered(&CityFilter {
            capitals_only: true,
            continents: None,
        });
        assert_eq!(capitals.len(), 3);

        let europe = index.filtered(&CityFilter {
            capitals_only: false,
            continents: Some([Continent::EU].into_iter().collect()),
        });
        assert_eq!(europe.len(), 2);
        assert!(europe.lookup("Nowhere").is_err());

        let none = index.filtered(&CityFilter {
            capitals_only: true,
            continents: Some(BTreeSet::new()),
        });
        assert!(none.is_empty());
    }

    #[test]
    fn test_from_toml_str() {
        let index = GeoIndex::from_toml_str(
            r#"
            [[cities]]
            name = "Oslo"
            latitude = 59.91
            longitude = 10.75
            continent = "EU"
            capital = true
            "#,
        )
        .unwrap();
        let oslo = index.lookup("Oslo").unwrap();
        assert_eq!(oslo.continent(), Some(Continent::EU));
        assert!(oslo.is_capital());
        assert_eq!(oslo.country(), None);
    }

    #[test]
    fn test_malformed_toml_is_data_error() {
        let err = GeoIndex::from_toml_str("[[cities]]\nname = 3").unwrap_err();
        assert!(err.message.contains("parse"));
    }

    #[test]
    fn test_builtin_table_loads() {
        let index = GeoIndex::builtin().unwrap();
        assert!(index.len() >= 40);
        assert!(index.lookup("Rome").is_ok());
        assert!(index.iter().all(|c| c.is_capital() && c.continent().is_some()));
    }

    #[test]
    fn test_continent_codes_parse() {
        use std::str::FromStr;
        assert_eq!(Continent::from_str("OC").unwrap(), Continent::OC);
        assert_eq!(Continent::SA.to_string(), "South America");
    }
}
