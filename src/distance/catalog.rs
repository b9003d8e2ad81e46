use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::constant::{DEFAULT_LEG_KM, HUB_DISTRICT};
use crate::domain::types::District;
use crate::distance::table::read_rows;
use crate::error::CatalogError;

// Road distances from the Kampala hub, in km.
const BUILTIN_DISTANCES: [(&str, &str, f64); 14] = [
    ("Kampala", "Wakiso", 20.0),
    ("Kampala", "Mukono", 25.0),
    ("Kampala", "Entebbe", 37.0),
    ("Kampala", "Jinja", 87.0),
    ("Kampala", "Mbarara", 266.0),
    ("Kampala", "Gulu", 333.0),
    ("Kampala", "Arua", 516.0),
    ("Kampala", "Mbale", 220.0),
    ("Kampala", "Fort Portal", 296.0),
    ("Kampala", "Hoima", 219.0),
    ("Kampala", "Masaka", 128.0),
    ("Kampala", "Lira", 350.0),
    ("Kampala", "Soroti", 315.0),
    ("Kampala", "Kabale", 414.0),
];

/// Unordered pair of districts with the road distance between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictPair {
    pub a: District,
    pub b: District,
    pub distance_km: f64,
}

impl DistrictPair {
    pub fn new(a: impl Into<String>, b: impl Into<String>, distance_km: f64) -> Self {
        DistrictPair {
            a: a.into(),
            b: b.into(),
            distance_km,
        }
    }

    pub fn connects(&self, x: &str, y: &str) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    fn key(&self) -> (String, String) {
        pair_key(&self.a, &self.b)
    }
}

fn pair_key(x: &str, y: &str) -> (String, String) {
    if x <= y {
        (x.to_string(), y.to_string())
    } else {
        (y.to_string(), x.to_string())
    }
}

/// Sparse, immutable table of known district distances.
///
/// Pairs missing from the table are approximated through the hub district,
/// each unknown leg counting as a fixed default distance.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCatalog {
    distances: HashMap<(String, String), f64>,
    hub: District,
    default_leg_km: f64,
}

impl Default for RouteCatalog {
    fn default() -> Self {
        RouteCatalog::builtin().clone()
    }
}

impl RouteCatalog {
    /// Later pairs override earlier ones for the same districts.
    pub fn new(pairs: impl IntoIterator<Item = DistrictPair>) -> Self {
        let distances = pairs
            .into_iter()
            .filter(|pair| pair.a != pair.b)
            .map(|pair| (pair.key(), pair.distance_km))
            .collect();

        RouteCatalog {
            distances,
            hub: HUB_DISTRICT.to_string(),
            default_leg_km: DEFAULT_LEG_KM,
        }
    }

    /// The built-in Uganda table, initialised once per process.
    pub fn builtin() -> &'static RouteCatalog {
        static BUILTIN: OnceLock<RouteCatalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            RouteCatalog::new(
                BUILTIN_DISTANCES
                    .iter()
                    .map(|&(a, b, km)| DistrictPair::new(a, b, km)),
            )
        })
    }

    pub fn with_hub(mut self, hub: impl Into<String>) -> Self {
        self.hub = hub.into();
        self
    }

    pub fn with_default_leg(mut self, default_leg_km: f64) -> Self {
        self.default_leg_km = default_leg_km;
        self
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let catalog = Self::from_reader(File::open(path)?)?;
        info!(
            "Loaded {} district distances from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Reads `from,to,distance_km` rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut pairs = Vec::new();
        for (line, record) in read_rows(reader, 3)? {
            let (from, to, raw) = (&record[0], &record[1], &record[2]);
            let distance: f64 = raw.parse().map_err(|_| CatalogError::MalformedRow {
                line,
                reason: format!("distance '{}' is not a number", raw),
            })?;

            let self_pair = from == to;
            if !distance.is_finite() || distance < 0.0 || (self_pair && distance != 0.0) {
                return Err(CatalogError::InvalidDistance {
                    line,
                    from: from.to_string(),
                    to: to.to_string(),
                    distance,
                });
            }

            if from.is_empty() || to.is_empty() {
                return Err(CatalogError::MalformedRow {
                    line,
                    reason: "district name is empty".to_string(),
                });
            }

            pairs.push(DistrictPair::new(from, to, distance));
        }

        Ok(RouteCatalog::new(pairs))
    }

    pub fn hub(&self) -> &str {
        &self.hub
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Tabulated distance in either order, if any.
    pub fn lookup(&self, from: &str, to: &str) -> Option<f64> {
        self.distances.get(&pair_key(from, to)).copied()
    }

    /// Road distance in km between two districts. Total and symmetric.
    pub fn estimate_distance(&self, from: &str, to: &str) -> f64 {
        if from == to {
            return 0.0;
        }

        if let Some(km) = self.lookup(from, to) {
            return km;
        }

        let km = self.leg(from, &self.hub) + self.leg(&self.hub, to);
        debug!("No tabulated distance {} -> {}, via {}: {} km", from, to, self.hub, km);
        km
    }

    // A leg that starts and ends at the hub is 0 km, not the default, so
    // Kampala to an untabulated district costs one default leg (200 km).
    // Summing two lookups with a falsy-zero fallback would give 400 km here.
    fn leg(&self, from: &str, to: &str) -> f64 {
        if from == to {
            return 0.0;
        }
        self.lookup(from, to).unwrap_or(self.default_leg_km)
    }

    /// Every district named in the table, sorted.
    pub fn districts(&self) -> Vec<&str> {
        self.distances
            .keys()
            .flat_map(|(a, b)| [a.as_str(), b.as_str()])
            .unique()
            .sorted()
            .collect()
    }

    pub fn pairs(&self) -> impl Iterator<Item = DistrictPair> + '_ {
        self.distances
            .iter()
            .map(|((a, b), km)| DistrictPair::new(a.as_str(), b.as_str(), *km))
    }
}
