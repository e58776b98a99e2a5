//! Product detail parser
//!
//! Turns one product detail page into a [`ProductRecord`]. Only the name and
//! SKU are required; every other field comes from an independent step that
//! returns `None` when its element is missing, and the sentinel ("" or an
//! empty collection) is applied when the record is assembled.

use super::config::{FieldLabels, ParsingConfig, ProductDetailSelectors};
use super::document::{ElementExt, Lookup};
use super::quantity::QuantityMatcher;
use super::{compile_selector, ContextualParser, DetailParseContext, ParsingError, ParsingResult};
use crate::domain::{Packaging, ProductRecord};
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

const CAS_PATTERN: &str = r"\bCAS number:\s*(\d+-\d+-\d+)\b";
const MOLECULAR_WEIGHT_PATTERN: &str = r"\d+\.\d+";

/// Number of cells in a packaging row: label, quantity, price
const VARIATION_CELLS: usize = 3;

#[derive(Debug, Clone)]
struct DetailSelectors {
    product_container: Selector,
    name: Selector,
    sku: Selector,
    label_span: Selector,
    synonyms: Selector,
    variations_table: Selector,
    variation_row: Selector,
    variation_cell: Selector,
    structure_container: Selector,
    structure_image: Selector,
    property_block: Selector,
    property_label: Selector,
    description: Selector,
    download_link: Selector,
}

impl DetailSelectors {
    fn compile(config: &ProductDetailSelectors) -> ParsingResult<Self> {
        Ok(Self {
            product_container: compile_selector(&config.product_container)?,
            name: compile_selector(&config.name)?,
            sku: compile_selector(&config.sku)?,
            label_span: compile_selector(&config.label_span)?,
            synonyms: compile_selector(&config.synonyms)?,
            variations_table: compile_selector(&config.variations_table)?,
            variation_row: compile_selector(&config.variation_row)?,
            variation_cell: compile_selector(&config.variation_cell)?,
            structure_container: compile_selector(&config.structure_container)?,
            structure_image: compile_selector(&config.structure_image)?,
            property_block: compile_selector(&config.property_block)?,
            property_label: compile_selector(&config.property_label)?,
            description: compile_selector(&config.description)?,
            download_link: compile_selector(&config.download_link)?,
        })
    }
}

/// Parser for extracting a product record from a detail page
#[derive(Debug, Clone)]
pub struct ProductDetailParser {
    selectors: DetailSelectors,
    labels: FieldLabels,
    cas_pattern: Regex,
    molecular_weight_pattern: Regex,
    quantity: QuantityMatcher,
}

impl ProductDetailParser {
    /// Create a new product detail parser with default selectors and labels
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    pub fn with_config(config: &ParsingConfig) -> ParsingResult<Self> {
        Ok(Self {
            selectors: DetailSelectors::compile(&config.product_detail_selectors)?,
            labels: config.field_labels.clone(),
            cas_pattern: compile_pattern("cas", CAS_PATTERN)?,
            molecular_weight_pattern: compile_pattern("molecular_weight", MOLECULAR_WEIGHT_PATTERN)?,
            quantity: QuantityMatcher::new()?,
        })
    }

    /// Parse a raw product page body.
    pub fn parse_html(&self, body: &str, context: &DetailParseContext) -> ParsingResult<ProductRecord> {
        let html = Html::parse_document(body);
        self.parse_with_context(&html, context)
    }

    /// Name and SKU of the product. With several containers on the page the
    /// last one determines both values.
    fn extract_identity(&self, html: &Html, context: &DetailParseContext) -> ParsingResult<(String, String)> {
        let mut identity = None;

        for container in html.find_all(&self.selectors.product_container) {
            let name = container
                .find_first(&self.selectors.name)
                .map(|heading| heading.full_text())
                .ok_or_else(|| ParsingError::required_field_missing("name", Some(context.url.as_str())))?;
            let sku = container
                .find_first(&self.selectors.sku)
                .map(|span| span.trimmed_text())
                .ok_or_else(|| ParsingError::required_field_missing("id", Some(context.url.as_str())))?;
            identity = Some((sku, name));
        }

        identity.ok_or_else(|| ParsingError::required_field_missing("product container", Some(context.url.as_str())))
    }

    /// Trimmed text of the element wrapping the span labelled `label`.
    fn labelled_text(&self, html: &Html, label: &str) -> Option<String> {
        let span = html.find_with_text(&self.selectors.label_span, label)?;
        span.parent_element().map(|parent| parent.trimmed_text())
    }

    fn extract_cas(&self, html: &Html) -> Option<String> {
        let text = self.labelled_text(html, &self.labels.cas)?;
        let captures = self.cas_pattern.captures(&text)?;
        captures.get(1).map(|m| m.as_str().to_string())
    }

    /// Pieces after the last ':' split on ',' and trimmed; empty pieces are kept.
    fn extract_synonyms(&self, html: &Html) -> Option<Vec<String>> {
        let block = html.find_first(&self.selectors.synonyms)?;
        let text = block.trimmed_text();
        let listed = text.rsplit(':').next()?;

        Some(
            listed
                .split(',')
                .map(|synonym| synonym.trim().to_string())
                .collect(),
        )
    }

    fn extract_molecular_weight(&self, html: &Html) -> Option<String> {
        let text = self.labelled_text(html, &self.labels.molecular_weight)?;
        self.molecular_weight_pattern
            .find(&text)
            .map(|m| m.as_str().to_string())
    }

    /// Rows with exactly three cells map normalized quantity to price; a
    /// quantity without a recognised unit is keyed by "".
    fn extract_packaging(&self, html: &Html) -> Option<Packaging> {
        let table = html.find_first(&self.selectors.variations_table)?;
        let mut packaging = Packaging::new();

        for row in table.find_all(&self.selectors.variation_row) {
            let cells = row.find_all(&self.selectors.variation_cell);
            if cells.len() != VARIATION_CELLS {
                continue;
            }

            let quantity = self
                .quantity
                .normalize(&cells[1].stripped_text())
                .unwrap_or_default();
            packaging.insert(quantity, cells[2].stripped_text());
        }

        Some(packaging)
    }

    fn extract_image_url(&self, html: &Html) -> Option<String> {
        let structure = html.find_first(&self.selectors.structure_container)?;
        structure
            .find_first(&self.selectors.structure_image)?
            .attr_value("src")
    }

    fn extract_smiles(&self, html: &Html) -> Option<String> {
        let block = html.find_first(&self.selectors.property_block)?;
        let label = block.find_with_text(&self.selectors.property_label, &self.labels.smiles)?;
        label.following_text().map(|text| text.trim().to_string())
    }

    fn extract_description(&self, html: &Html) -> Option<String> {
        html.find_first(&self.selectors.description)
            .map(|element| element.trimmed_text())
    }

    fn extract_safety_sheet_url(&self, html: &Html) -> Option<String> {
        html.find_with_text(&self.selectors.download_link, &self.labels.safety_sheet_link)?
            .attr_value("href")
    }
}

impl ContextualParser for ProductDetailParser {
    type Output = ProductRecord;
    type Context = DetailParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let (id, name) = self.extract_identity(html, context)?;

        let record = ProductRecord {
            id,
            url: context.url.clone(),
            name,
            cas: self.extract_cas(html).unwrap_or_default(),
            synonyms: self.extract_synonyms(html).unwrap_or_default(),
            molecular_weight: self.extract_molecular_weight(html).unwrap_or_default(),
            packaging: self.extract_packaging(html).unwrap_or_default(),
            image_url: self.extract_image_url(html).unwrap_or_default(),
            description: self.extract_description(html).unwrap_or_default(),
            smiles_notation: self.extract_smiles(html).unwrap_or_default(),
            safety_sheet_url: self.extract_safety_sheet_url(html).unwrap_or_default(),
        };

        debug!(
            "Parsed product {} ({} packaging entries) from {}",
            record.id,
            record.packaging.len(),
            context.url
        );
        Ok(record)
    }
}

fn compile_pattern(name: &str, pattern: &str) -> ParsingResult<Regex> {
    Regex::new(pattern).map_err(|e| ParsingError::invalid_pattern(name, &e.to_string()))
}
