use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::distance::table::read_rows;
use crate::domain::types::District;
use crate::error::CatalogError;

const BUILTIN_ROUTES: [(&str, &str, &str); 16] = [
    ("Kampala", "Jinja", "Link Bus"),
    ("Kampala", "Mbale", "YY Coaches"),
    ("Kampala", "Mbarara", "Global Coaches"),
    ("Kampala", "Kabale", "Jaguar Executive"),
    ("Kampala", "Masaka", "Link Bus"),
    ("Kampala", "Gulu", "Gateway Bus"),
    ("Kampala", "Arua", "Nile Star"),
    ("Kampala", "Lira", "Baby Coach"),
    ("Kampala", "Fort Portal", "Link Bus"),
    ("Kampala", "Hoima", "Link Bus"),
    ("Kampala", "Soroti", "Gateway Bus"),
    ("Masaka", "Mbarara", "Global Coaches"),
    ("Mbarara", "Kabale", "Jaguar Executive"),
    ("Jinja", "Mbale", "YY Coaches"),
    ("Gulu", "Arua", "Nile Star"),
    ("Lira", "Gulu", "Baby Coach"),
];

/// A scheduled bus service between two districts, usable in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusRoute {
    pub from: District,
    pub to: District,
    pub operator: String,
}

impl BusRoute {
    pub fn new(from: impl Into<String>, to: impl Into<String>, operator: impl Into<String>) -> Self {
        BusRoute {
            from: from.into(),
            to: to.into(),
            operator: operator.into(),
        }
    }

    /// Unordered match against both endpoints.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    pub fn touches(&self, district: &str) -> bool {
        self.from == district || self.to == district
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusRouteTable {
    routes: Vec<BusRoute>,
}

impl Default for BusRouteTable {
    fn default() -> Self {
        BusRouteTable::builtin().clone()
    }
}

impl BusRouteTable {
    pub fn new(routes: impl IntoIterator<Item = BusRoute>) -> Self {
        BusRouteTable {
            routes: routes.into_iter().collect(),
        }
    }

    pub fn builtin() -> &'static BusRouteTable {
        static BUILTIN: OnceLock<BusRouteTable> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            BusRouteTable::new(
                BUILTIN_ROUTES
                    .iter()
                    .map(|&(from, to, operator)| BusRoute::new(from, to, operator)),
            )
        })
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let table = Self::from_reader(File::open(path)?)?;
        info!("Loaded {} bus routes from {}", table.len(), path.display());
        Ok(table)
    }

    /// Reads `from,to,operator` rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut routes = Vec::new();
        for (line, record) in read_rows(reader, 3)? {
            if record[0].is_empty() || record[1].is_empty() {
                return Err(CatalogError::MalformedRow {
                    line,
                    reason: "district name is empty".to_string(),
                });
            }
            routes.push(BusRoute::new(&record[0], &record[1], &record[2]));
        }
        Ok(BusRouteTable::new(routes))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BusRoute> {
        self.routes.iter()
    }

    pub fn has_direct_route(&self, a: &str, b: &str) -> bool {
        self.routes.iter().any(|route| route.connects(a, b))
    }

    /// Routes that serve both districts, in table order.
    pub fn routes_between(&self, a: &str, b: &str) -> Vec<&BusRoute> {
        self.routes
            .iter()
            .filter(|route| route.touches(a) && route.touches(b))
            .collect()
    }
}
