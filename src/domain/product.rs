use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Structured record extracted from one product detail page.
///
/// Optional fields use empty sentinels ("" or empty collections) instead of
/// null so every record in the output carries the same schema. Serialized key
/// names follow the established `products.json` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Site-assigned SKU / stock code
    pub id: String,
    pub url: String,
    pub name: String,
    /// CAS registry number (digits-digits-digits)
    #[serde(rename = "CAS")]
    pub cas: String,
    pub synonyms: Vec<String>,
    pub molecular_weight: String,
    /// Normalized quantity -> price, in table row order
    pub packaging: Packaging,
    #[serde(rename = "img")]
    pub image_url: String,
    pub description: String,
    #[serde(rename = "smiles")]
    pub smiles_notation: String,
    #[serde(rename = "pdf_msds")]
    pub safety_sheet_url: String,
}

/// Final output collection, one record per successfully crawled URL.
pub type ProductDataSet = Vec<ProductRecord>;

/// Insertion-ordered mapping of normalized quantity to price.
///
/// Re-inserting an existing quantity replaces its price but keeps the
/// position of the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packaging {
    entries: Vec<(String, String)>,
}

impl Packaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, quantity: impl Into<String>, price: impl Into<String>) {
        let quantity = quantity.into();
        let price = price.into();
        match self.entries.iter_mut().find(|(key, _)| *key == quantity) {
            Some(entry) => entry.1 = price,
            None => self.entries.push((quantity, price)),
        }
    }

    pub fn get(&self, quantity: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == quantity)
            .map(|(_, price)| price.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(q, p)| (q.as_str(), p.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Packaging {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut packaging = Self::new();
        for (quantity, price) in iter {
            packaging.insert(quantity, price);
        }
        packaging
    }
}

impl Serialize for Packaging {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (quantity, price) in &self.entries {
            map.serialize_entry(quantity, price)?;
        }
        map.end()
    }
}

struct PackagingVisitor;

impl<'de> Visitor<'de> for PackagingVisitor {
    type Value = Packaging;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of quantity to price")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut packaging = Packaging::new();
        while let Some((quantity, price)) = access.next_entry::<String, String>()? {
            packaging.insert(quantity, price);
        }
        Ok(packaging)
    }
}

impl<'de> Deserialize<'de> for Packaging {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PackagingVisitor)
    }
}
