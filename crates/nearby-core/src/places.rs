//! Data model for one recommendation fetch cycle.
//!
//! A cycle resolves a [`Coordinate`], an optional place name, and a
//! [`CategoryResults`] mapping. The three are combined into a
//! [`RecommendationResult`] once and handed to the presentation layer.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A device position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Formats as `"{lat},{lon}"`, the form the places and geocoding APIs expect.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// The fixed set of place types queried for recommendations.
///
/// Variant order is the default query order and the rendering order;
/// `Ord` follows it, so a `BTreeMap<Category, _>` iterates in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TouristAttraction,
    ShoppingMall,
    Park,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::TouristAttraction,
        Category::ShoppingMall,
        Category::Park,
    ];

    /// The identifier sent as the `type` query parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::TouristAttraction => "tourist_attraction",
            Category::ShoppingMall => "shopping_mall",
            Category::Park => "park",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown place category \"{0}\"")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// Place names per category.
///
/// Every stored list is sorted ascending; duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryResults(BTreeMap<Category, Vec<String>>);

impl CategoryResults {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `names` for `category`, sorting them first. Replaces any
    /// previous entry for the same category.
    pub fn insert(&mut self, category: Category, mut names: Vec<String>) {
        names.sort();
        self.0.insert(category, names);
    }

    #[must_use]
    pub fn get(&self, category: Category) -> Option<&[String]> {
        self.0.get(&category).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, category: Category) -> bool {
        self.0.contains_key(&category)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates categories in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.0.iter().map(|(c, names)| (*c, names.as_slice()))
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.keys().copied()
    }
}

impl FromIterator<(Category, Vec<String>)> for CategoryResults {
    fn from_iter<I: IntoIterator<Item = (Category, Vec<String>)>>(iter: I) -> Self {
        let mut results = Self::new();
        for (category, names) in iter {
            results.insert(category, names);
        }
        results
    }
}

/// Everything the presentation layer needs after one fetch cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub location_name: Option<String>,
    pub places: CategoryResults,
}

impl RecommendationResult {
    #[must_use]
    pub fn new(location_name: Option<String>, places: CategoryResults) -> Self {
        Self {
            location_name,
            places,
        }
    }

    /// Result for a cycle where no coordinate could be obtained.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::default()
    }
}
