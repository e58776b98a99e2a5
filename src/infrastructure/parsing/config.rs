//! Parsing configuration for HTML extraction
//!
//! Centralized CSS selectors and label texts for listing and product pages.
//! Defaults match the catalogue's WooCommerce markup; every entry can be
//! overridden from the `parsing` section of the configuration file.

use serde::{Deserialize, Serialize};

/// Main parsing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    pub product_list_selectors: ProductListSelectors,
    pub product_detail_selectors: ProductDetailSelectors,
    pub field_labels: FieldLabels,
}

/// CSS selectors for listing pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductListSelectors {
    /// Body of the results table; only the first match is used
    pub results_body: String,

    /// Product links inside the results body
    pub product_link: String,
}

impl Default for ProductListSelectors {
    fn default() -> Self {
        Self {
            results_body: "tbody".to_string(),
            product_link: "a".to_string(),
        }
    }
}

/// CSS selectors for product detail pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDetailSelectors {
    pub product_container: String,
    pub name: String,
    pub sku: String,

    /// Spans carrying "Label: " texts (CAS number, molecular weight)
    pub label_span: String,

    pub synonyms: String,

    pub variations_table: String,
    pub variation_row: String,
    pub variation_cell: String,

    pub structure_container: String,
    pub structure_image: String,

    /// Property block holding the SMILES label
    pub property_block: String,
    pub property_label: String,

    pub description: String,

    /// Anchors searched for the safety data sheet link
    pub download_link: String,
}

impl Default for ProductDetailSelectors {
    fn default() -> Self {
        Self {
            product_container: ".type-product".to_string(),
            name: "h1".to_string(),
            sku: "span.sku".to_string(),
            label_span: "span".to_string(),
            synonyms: "div.product-prop.product-prop-synonyms".to_string(),
            variations_table: "table.product-variations-table".to_string(),
            variation_row: "tr".to_string(),
            variation_cell: "td".to_string(),
            structure_container: "div.prod-structure".to_string(),
            structure_image: "img".to_string(),
            property_block: "div.product-prop-wrap".to_string(),
            property_label: "span.prop-label".to_string(),
            description: "div.product-description".to_string(),
            download_link: "a".to_string(),
        }
    }
}

/// Exact label texts, trailing whitespace included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLabels {
    pub cas: String,
    pub molecular_weight: String,
    pub smiles: String,
    pub safety_sheet_link: String,
}

impl Default for FieldLabels {
    fn default() -> Self {
        Self {
            cas: "CAS number: ".to_string(),
            molecular_weight: "Molecular weight: ".to_string(),
            smiles: "Smiles: ".to_string(),
            safety_sheet_link: "Download".to_string(),
        }
    }
}
