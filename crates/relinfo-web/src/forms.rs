//! Form binding and validation for related URIs and publications.
//!
//! A form is either unbound (initial display, optionally pre-filled) or bound
//! to submitted values. Binding trims every value, checks it against the
//! field table, and yields cleaned data or per-field error messages.

use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::sync::OnceLock;

use regex::Regex;
use relinfo_common::{PublicationFormData, UriFormData};
use serde::Serialize;

const REQUIRED: &str = "This field is required.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    TextArea,
    Url,
    Year,
    Doi,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub max_length: usize,
    pub kind: FieldKind,
}

/// Field table plus conversions for one kind of record.
pub trait FormSchema {
    type Data: Clone;

    const FIELDS: &'static [FieldSpec];

    /// Build cleaned data from validated values keyed by field name.
    fn from_values(values: &BTreeMap<String, String>) -> Self::Data;

    fn to_values(data: &Self::Data) -> BTreeMap<String, String>;
}

pub struct RelatedUriForm;

impl FormSchema for RelatedUriForm {
    type Data = UriFormData;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec { name: "uri",   label: "URI",   required: true,  max_length: 2048, kind: FieldKind::Url },
        FieldSpec { name: "title", label: "Title", required: false, max_length: 255,  kind: FieldKind::Text },
        FieldSpec { name: "notes", label: "Notes", required: false, max_length: 4000, kind: FieldKind::TextArea },
    ];

    fn from_values(values: &BTreeMap<String, String>) -> UriFormData {
        UriFormData {
            uri: value_of(values, "uri"),
            title: value_of(values, "title"),
            notes: value_of(values, "notes"),
        }
    }

    fn to_values(data: &UriFormData) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("uri".to_string(), data.uri.clone()),
            ("title".to_string(), data.title.clone()),
            ("notes".to_string(), data.notes.clone()),
        ])
    }
}

pub struct RelatedPublicationForm;

impl FormSchema for RelatedPublicationForm {
    type Data = PublicationFormData;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec { name: "title",   label: "Title",   required: true,  max_length: 255,  kind: FieldKind::Text },
        FieldSpec { name: "authors", label: "Authors", required: false, max_length: 1024, kind: FieldKind::Text },
        FieldSpec { name: "year",    label: "Year",    required: false, max_length: 4,    kind: FieldKind::Year },
        FieldSpec { name: "doi",     label: "DOI",     required: false, max_length: 255,  kind: FieldKind::Doi },
        FieldSpec { name: "url",     label: "URL",     required: false, max_length: 2048, kind: FieldKind::Url },
        FieldSpec { name: "notes",   label: "Notes",   required: false, max_length: 4000, kind: FieldKind::TextArea },
    ];

    fn from_values(values: &BTreeMap<String, String>) -> PublicationFormData {
        PublicationFormData {
            title: value_of(values, "title"),
            authors: value_of(values, "authors"),
            year: value_of(values, "year"),
            doi: value_of(values, "doi"),
            url: value_of(values, "url"),
            notes: value_of(values, "notes"),
        }
    }

    fn to_values(data: &PublicationFormData) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("title".to_string(), data.title.clone()),
            ("authors".to_string(), data.authors.clone()),
            ("year".to_string(), data.year.clone()),
            ("doi".to_string(), data.doi.clone()),
            ("url".to_string(), data.url.clone()),
            ("notes".to_string(), data.notes.clone()),
        ])
    }
}

fn value_of(values: &BTreeMap<String, String>, name: &str) -> String {
    values.get(name).cloned().unwrap_or_default()
}

/// A form, bound or unbound, for schema `S`.
pub struct Form<S: FormSchema> {
    values: BTreeMap<String, String>,
    errors: BTreeMap<String, Vec<String>>,
    cleaned: Option<S::Data>,
    _schema: PhantomData<S>,
}

impl<S: FormSchema> Form<S> {
    /// Unbound, empty form.
    pub fn empty() -> Self {
        Self::unbound(BTreeMap::new())
    }

    /// Unbound form pre-filled from existing data.
    pub fn with_initial(initial: &S::Data) -> Self {
        Self::unbound(S::to_values(initial))
    }

    fn unbound(values: BTreeMap<String, String>) -> Self {
        Self { values, errors: BTreeMap::new(), cleaned: None, _schema: PhantomData }
    }

    /// Bind submitted values and validate them.
    pub fn bind(submitted: &HashMap<String, String>) -> Self {
        let mut values = BTreeMap::new();
        let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for field in S::FIELDS {
            let value = submitted
                .get(field.name)
                .map(|v| v.trim().to_string())
                .unwrap_or_default();
            if let Some(message) = validate_field(field, &value) {
                errors.entry(field.name.to_string()).or_default().push(message);
            }
            values.insert(field.name.to_string(), value);
        }

        let cleaned = errors.is_empty().then(|| S::from_values(&values));
        Self { values, errors, cleaned, _schema: PhantomData }
    }

    pub fn is_valid(&self) -> bool {
        self.cleaned.is_some()
    }

    pub fn cleaned_data(&self) -> Option<&S::Data> {
        self.cleaned.as_ref()
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    /// Render-ready view of the form.
    pub fn context(&self) -> FormContext {
        let fields = S::FIELDS
            .iter()
            .map(|spec| FieldContext {
                name: spec.name,
                label: spec.label,
                required: spec.required,
                max_length: spec.max_length,
                kind: spec.kind,
                value: self.values.get(spec.name).cloned().unwrap_or_default(),
                errors: self.errors.get(spec.name).cloned().unwrap_or_default(),
            })
            .collect();
        FormContext { fields, has_errors: !self.errors.is_empty() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FormContext {
    pub fields: Vec<FieldContext>,
    pub has_errors: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldContext {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub max_length: usize,
    pub kind: FieldKind,
    pub value: String,
    pub errors: Vec<String>,
}

fn validate_field(field: &FieldSpec, value: &str) -> Option<String> {
    if value.is_empty() {
        return field.required.then(|| REQUIRED.to_string());
    }
    let length = value.chars().count();
    if length > field.max_length {
        return Some(format!(
            "Ensure this value has at most {} characters (it has {}).",
            field.max_length, length
        ));
    }
    match field.kind {
        FieldKind::Text | FieldKind::TextArea => None,
        FieldKind::Url if !url_regex().is_match(value) => Some("Enter a valid URL.".to_string()),
        FieldKind::Year if !year_regex().is_match(value) => Some("Enter a valid year.".to_string()),
        FieldKind::Doi if !doi_regex().is_match(value) => {
            Some("Enter a valid DOI, e.g. 10.1000/xyz123.".to_string())
        }
        FieldKind::Url | FieldKind::Year | FieldKind::Doi => None,
    }
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // scheme://host[:port][/rest], no whitespace anywhere
        Regex::new(r"(?i)^(https?|ftp)://[a-z0-9](?:[a-z0-9.\-]*[a-z0-9])?(?::\d{1,5})?(?:[/?#]\S*)?$")
            .expect("static URL regex")
    })
}

fn year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[1-9]\d{3}$").expect("static year regex"))
}

fn doi_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^10\.\d{4,9}/\S+$").expect("static DOI regex"))
}
