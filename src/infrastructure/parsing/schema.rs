//! Declarative record schemas
//!
//! A [`RecordSchema`] maps field names to extraction rules. Schemas are plain
//! serde data so they can be overridden from configuration; they are compiled
//! once into a [`CompiledSchema`] that holds parsed `scraper` selectors.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ParsingError, ParsingResult};

lazy_static! {
    static ref LINE_BREAK: Regex = Regex::new(r"\r\n|[\r\n]").expect("static regex");
}

/// Where a field's raw value comes from once its element is located
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ValueSource {
    /// Concatenated descendant text
    Text,
    /// Outer HTML of the element
    Markup,
    /// Value of the named attribute
    Attr(String),
    /// Text of the n-th element matching the selector (0-based)
    NthMatch(usize),
}

/// Post-processing applied to a located value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextTransform {
    #[default]
    Raw,
    /// Strip leading/trailing line breaks only
    TrimNewlines,
    Trim,
    /// Remove every line break
    DropNewlines,
    /// Replace every line break (CRLF, CR or LF) with one space
    LineBreaksToSpace,
    /// First argument of an inline script call such as `player.listen('123',true)`
    CallArgument { prefix: String, delimiter: char },
}

impl TextTransform {
    pub fn apply(&self, value: &str) -> String {
        match self {
            Self::Raw => value.to_string(),
            Self::TrimNewlines => value.trim_matches(['\r', '\n']).to_string(),
            Self::Trim => value.trim().to_string(),
            Self::DropNewlines => value.replace(['\r', '\n'], ""),
            Self::LineBreaksToSpace => LINE_BREAK.replace_all(value, " ").into_owned(),
            Self::CallArgument { prefix, delimiter } => {
                // Best effort: an unexpected call shape still yields *something*,
                // which the cleaning stage recognises and drops.
                let rest = value
                    .strip_prefix(prefix.as_str())
                    .unwrap_or_else(|| last_statement(value));
                rest.split(*delimiter).next().unwrap_or_default().to_string()
            }
        }
    }
}

fn last_statement(script: &str) -> &str {
    script
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .last()
        .unwrap_or(script)
}

/// One named field and the rule that extracts it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    /// CSS selector relative to the record scope; `None` reads the scope element itself
    #[serde(default)]
    pub selector: Option<String>,
    pub source: ValueSource,
    #[serde(default)]
    pub transform: TextTransform,
    #[serde(default)]
    pub required: bool,
}

impl FieldSpec {
    pub fn new(name: &str, selector: Option<&str>, source: ValueSource) -> Self {
        Self {
            name: name.to_string(),
            selector: selector.map(str::to_string),
            source,
            transform: TextTransform::Raw,
            required: false,
        }
    }

    pub fn with_transform(mut self, transform: TextTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A set of fields read from each block matched by `scope`, or from the whole
/// document when `scope` is `None`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub name: String,
    #[serde(default)]
    pub scope: Option<String>,
    pub fields: Vec<FieldSpec>,
}

/// Values extracted for one record, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    schema: String,
    values: BTreeMap<String, Option<String>>,
}

impl FieldValues {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(|v| v.as_deref())
    }

    pub fn take(&mut self, field: &str) -> Option<String> {
        self.values.get_mut(field).and_then(Option::take)
    }

    pub fn take_required(&mut self, field: &str) -> ParsingResult<String> {
        if !self.values.contains_key(field) {
            return Err(ParsingError::UnknownField {
                schema: self.schema.clone(),
                field: field.to_string(),
            });
        }
        self.take(field)
            .ok_or_else(|| ParsingError::required_field_missing(&self.schema, field))
    }
}

struct CompiledField {
    spec: FieldSpec,
    selector: Option<Selector>,
}

/// A [`RecordSchema`] with its selectors parsed
pub struct CompiledSchema {
    name: String,
    scope: Option<Selector>,
    fields: Vec<CompiledField>,
}

impl std::fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("name", &self.name)
            .field("fields", &self.fields.len())
            .finish_non_exhaustive()
    }
}

fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, e))
}

impl CompiledSchema {
    pub fn compile(schema: &RecordSchema) -> ParsingResult<Self> {
        let scope = schema.scope.as_deref().map(compile_selector).transpose()?;
        let mut fields = Vec::with_capacity(schema.fields.len());

        for spec in &schema.fields {
            let selector = spec.selector.as_deref().map(compile_selector).transpose()?;
            if matches!(spec.source, ValueSource::NthMatch(_)) && selector.is_none() {
                return Err(ParsingError::invalid_selector(
                    &spec.name,
                    "nth_match fields need a selector",
                ));
            }
            fields.push(CompiledField { spec: spec.clone(), selector });
        }

        Ok(Self { name: schema.name.clone(), scope, fields })
    }

    /// Extract one record per scope match. Any record failing a required field
    /// fails the whole page.
    pub fn extract_all(&self, html: &Html) -> ParsingResult<Vec<FieldValues>> {
        let root = html.root_element();
        match &self.scope {
            Some(scope) => root
                .select(scope)
                .map(|block| self.extract_from(block))
                .collect(),
            None => Ok(vec![self.extract_from(root)?]),
        }
    }

    /// Extract exactly one record from the page
    pub fn extract_one(&self, html: &Html) -> ParsingResult<FieldValues> {
        let root = html.root_element();
        let scope = match &self.scope {
            Some(scope) => root.select(scope).next().ok_or_else(|| {
                ParsingError::required_field_missing(&self.name, "<scope>")
            })?,
            None => root,
        };
        self.extract_from(scope)
    }

    fn extract_from(&self, scope: ElementRef<'_>) -> ParsingResult<FieldValues> {
        let mut values = BTreeMap::new();
        for field in &self.fields {
            let value = self.extract_field(scope, field)?;
            values.insert(field.spec.name.clone(), value);
        }
        Ok(FieldValues { schema: self.name.clone(), values })
    }

    fn extract_field(
        &self,
        scope: ElementRef<'_>,
        field: &CompiledField,
    ) -> ParsingResult<Option<String>> {
        let spec = &field.spec;

        let raw = match (&spec.source, &field.selector) {
            (ValueSource::NthMatch(index), Some(selector)) => {
                let matches: Vec<ElementRef<'_>> = scope.select(selector).collect();
                match matches.get(*index) {
                    Some(el) => Some(el.text().collect::<String>()),
                    None if spec.required => {
                        return Err(ParsingError::CellIndexOutOfRange {
                            schema: self.name.clone(),
                            field: spec.name.clone(),
                            index: *index,
                            available: matches.len(),
                        });
                    }
                    None => None,
                }
            }
            (source, selector) => {
                let target = match selector {
                    Some(selector) => scope.select(selector).next(),
                    None => Some(scope),
                };
                target.and_then(|el| read_source(el, source))
            }
        };

        let value = raw.map(|v| spec.transform.apply(&v));
        if value.is_none() {
            if spec.required {
                return Err(ParsingError::required_field_missing(&self.name, &spec.name));
            }
            debug!("{}: optional field '{}' absent", self.name, spec.name);
        }
        Ok(value)
    }
}

fn read_source(el: ElementRef<'_>, source: &ValueSource) -> Option<String> {
    match source {
        ValueSource::Text | ValueSource::NthMatch(_) => Some(el.text().collect()),
        ValueSource::Markup => Some(el.html()),
        ValueSource::Attr(name) => el.value().attr(name).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn item_schema() -> RecordSchema {
        RecordSchema {
            name: "item".to_string(),
            scope: Some("li.item".to_string()),
            fields: vec![
                FieldSpec::new("id", None, ValueSource::Attr("data-id".into())).required(),
                FieldSpec::new("label", Some("span"), ValueSource::Text)
                    .with_transform(TextTransform::Trim),
            ],
        }
    }

    #[rstest]
    #[case(TextTransform::Raw, "\n a \n", "\n a \n")]
    #[case(TextTransform::TrimNewlines, "\n a \n\n", " a ")]
    #[case(TextTransform::Trim, "\n a \n", "a")]
    #[case(TextTransform::DropNewlines, "a\nb\r\nc", "abc")]
    #[case(TextTransform::LineBreaksToSpace, "a\r\nb\nc\rd", "a b c d")]
    fn test_text_transforms(
        #[case] transform: TextTransform,
        #[case] input: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(transform.apply(input), expected);
    }

    #[test]
    fn test_call_argument_falls_back_to_last_statement() {
        let transform = TextTransform::CallArgument {
            prefix: "track.area('x');player.listen('".to_string(),
            delimiter: '\'',
        };
        assert_eq!(transform.apply("track.area('x');player.listen('123',true);"), "123");
        assert_eq!(
            transform.apply("track.area('x');player.showLoginLayer();"),
            "player.showLoginLayer()"
        );
    }

    #[test]
    fn test_optional_field_absent_yields_none() {
        let compiled = CompiledSchema::compile(&item_schema()).unwrap();
        let html = Html::parse_document(
            r#"<ul><li class="item" data-id="1"><span> one </span></li>
               <li class="item" data-id="2"></li></ul>"#,
        );
        let records = compiled.extract_all(&html).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("label"), Some("one"));
        assert_eq!(records[1].get("id"), Some("2"));
        assert_eq!(records[1].get("label"), None);
    }

    #[test]
    fn test_required_field_absent_fails_page() {
        let compiled = CompiledSchema::compile(&item_schema()).unwrap();
        let html = Html::parse_document(
            r#"<ul><li class="item" data-id="1"></li><li class="item"></li></ul>"#,
        );
        let err = compiled.extract_all(&html).unwrap_err();
        assert_eq!(err, ParsingError::required_field_missing("item", "id"));
    }

    #[test]
    fn test_nth_match_out_of_range() {
        let schema = RecordSchema {
            name: "cells".to_string(),
            scope: None,
            fields: vec![FieldSpec::new("third", Some("td"), ValueSource::NthMatch(2)).required()],
        };
        let compiled = CompiledSchema::compile(&schema).unwrap();
        let html = Html::parse_document("<table><tr><td>a</td><td>b</td></tr></table>");
        let err = compiled.extract_one(&html).unwrap_err();
        assert!(matches!(
            err,
            ParsingError::CellIndexOutOfRange { index: 2, available: 2, .. }
        ));
    }

    #[test]
    fn test_invalid_selector_rejected_at_compile_time() {
        let schema = RecordSchema {
            name: "broken".to_string(),
            scope: Some("li[[".to_string()),
            fields: vec![],
        };
        assert!(matches!(
            CompiledSchema::compile(&schema),
            Err(ParsingError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn test_take_required_unknown_field() {
        let compiled = CompiledSchema::compile(&item_schema()).unwrap();
        let html = Html::parse_document(r#"<li class="item" data-id="7"></li>"#);
        let mut values = compiled.extract_one(&html).unwrap();
        assert_eq!(values.take_required("id").unwrap(), "7");
        assert!(matches!(
            values.take_required("nope"),
            Err(ParsingError::UnknownField { .. })
        ));
    }
}
