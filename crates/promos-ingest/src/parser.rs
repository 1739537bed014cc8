//! Parser strategies and the extension-keyed registry that selects them.
//!
//! Every parser turns raw file bytes into flat JSON records; typing and
//! validation of each record happens later, per entry, during ingestion so
//! one bad entry never sinks the file.

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::error::IngestError;

/// Turns an uploaded or downloaded file into flat promotion records.
pub trait PromotionsParser: Send + Sync {
    /// # Errors
    ///
    /// Returns [`IngestError::Decode`] when the whole input is unreadable.
    fn parse(&self, input: &[u8]) -> Result<Vec<Value>, IngestError>;
}

/// Stand-in for spreadsheet formats: ignores its input and returns a fixed
/// three-product dataset.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockParser;

impl PromotionsParser for MockParser {
    fn parse(&self, _input: &[u8]) -> Result<Vec<Value>, IngestError> {
        Ok(vec![
            json!({
                "product_id": 123,
                "product_name": "Teacup",
                "product_description": "A teacup",
                "price": 15.0,
                "discount": 20.0,
                "currency": "USD",
                "shipping_discount": 0.0
            }),
            json!({
                "product_id": 124,
                "product_name": "Kid's Bicycle",
                "product_description": "A kids bicycle",
                "price": 70.0,
                "discount": 0.0,
                "currency": "USD",
                "shipping_discount": 15.0
            }),
            json!({
                "product_id": 125,
                "product_name": "Chair",
                "product_description": "A comfy chair",
                "price": 20.0,
                "discount": 10.0,
                "currency": "USD",
                "shipping_discount": 0.0
            }),
        ])
    }
}

/// Decodes a JSON array of flat records.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPromotionsParser;

impl PromotionsParser for JsonPromotionsParser {
    fn parse(&self, input: &[u8]) -> Result<Vec<Value>, IngestError> {
        serde_json::from_slice::<Vec<Value>>(input).map_err(IngestError::Decode)
    }
}

/// Maps file extensions to parsers.
pub struct ParserRegistry {
    parsers: HashMap<String, Box<dyn PromotionsParser>>,
}

impl Default for ParserRegistry {
    /// `csv` and `xls` use [`MockParser`]; `json` uses [`JsonPromotionsParser`].
    fn default() -> Self {
        Self::empty()
            .with_parser("csv", MockParser)
            .with_parser("xls", MockParser)
            .with_parser("json", JsonPromotionsParser)
    }
}

impl ParserRegistry {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_parser(
        mut self,
        extension: impl Into<String>,
        parser: impl PromotionsParser + 'static,
    ) -> Self {
        self.parsers.insert(extension.into(), Box::new(parser));
        self
    }

    /// Looks up the parser for `extension` (case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::UnavailableParser`] when nothing is registered
    /// for the extension.
    pub fn get(&self, extension: &str) -> Result<&dyn PromotionsParser, IngestError> {
        self.parsers
            .get(extension)
            .map(AsRef::as_ref)
            .ok_or_else(|| IngestError::UnavailableParser(extension.to_string()))
    }

    /// Registered extensions, sorted.
    #[must_use]
    pub fn extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}

/// Picks the extension used for parser lookup.
///
/// A non-empty `override_ext` wins. Otherwise the text after the last `.`
/// of `filename` is used.
///
/// # Errors
///
/// Returns [`IngestError::UnknownFileType`] when there is no override and the
/// file name is missing or has no extension.
pub fn resolve_extension<'a>(
    filename: Option<&'a str>,
    override_ext: Option<&'a str>,
) -> Result<&'a str, IngestError> {
    if let Some(ext) = override_ext.map(str::trim).filter(|e| !e.is_empty()) {
        return Ok(ext);
    }

    filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .ok_or(IngestError::UnknownFileType)
}
