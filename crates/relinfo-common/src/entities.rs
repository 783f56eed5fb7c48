//! Core metadata types for related information attached to experiments.
//! Related URIs and publications are stored as generic parameter sets; the
//! typed records here are views over those sets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ExperimentId = i64;
pub type ParameterSetId = i64;

// ---------------------------------------------------------------------------
// Generic parameter store types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSet {
    pub id: ParameterSetId,
    pub experiment_id: ExperimentId,
    pub schema: String,
    pub parameters: Vec<Parameter>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl ParameterSet {
    /// First value stored under `name`, if any.
    pub fn value(&self, name: &str) -> Option<&str> {
        lookup(&self.parameters, name)
    }
}

fn lookup<'a>(params: &'a [Parameter], name: &str) -> Option<&'a str> {
    params.iter().find(|p| p.name == name).map(|p| p.value.as_str())
}

fn owned(params: &[Parameter], name: &str) -> String {
    lookup(params, name).unwrap_or_default().to_string()
}

/// Push `name = value` unless the value is blank.
fn push_nonempty(params: &mut Vec<Parameter>, name: &str, value: &str) {
    if !value.is_empty() {
        params.push(Parameter::new(name, value));
    }
}

// ---------------------------------------------------------------------------
// Related URI
// ---------------------------------------------------------------------------

/// Cleaned form data for a related URI. Blank strings mean "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UriFormData {
    pub uri: String,
    pub title: String,
    pub notes: String,
}

impl UriFormData {
    pub fn to_parameters(&self) -> Vec<Parameter> {
        let mut params = Vec::with_capacity(3);
        push_nonempty(&mut params, "uri", &self.uri);
        push_nonempty(&mut params, "title", &self.title);
        push_nonempty(&mut params, "notes", &self.notes);
        params
    }

    pub fn from_parameters(params: &[Parameter]) -> Self {
        Self {
            uri: owned(params, "uri"),
            title: owned(params, "title"),
            notes: owned(params, "notes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedUri {
    pub parameterset_id: ParameterSetId,
    pub uri: String,
    pub title: String,
    pub notes: String,
    pub modified: DateTime<Utc>,
}

impl From<&ParameterSet> for RelatedUri {
    fn from(ps: &ParameterSet) -> Self {
        let data = UriFormData::from_parameters(&ps.parameters);
        Self {
            parameterset_id: ps.id,
            uri: data.uri,
            title: data.title,
            notes: data.notes,
            modified: ps.modified,
        }
    }
}

// ---------------------------------------------------------------------------
// Related publication
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationFormData {
    pub title: String,
    pub authors: String,
    pub year: String,
    pub doi: String,
    pub url: String,
    pub notes: String,
}

impl PublicationFormData {
    pub fn to_parameters(&self) -> Vec<Parameter> {
        let mut params = Vec::with_capacity(6);
        push_nonempty(&mut params, "title", &self.title);
        push_nonempty(&mut params, "authors", &self.authors);
        push_nonempty(&mut params, "year", &self.year);
        push_nonempty(&mut params, "doi", &self.doi);
        push_nonempty(&mut params, "url", &self.url);
        push_nonempty(&mut params, "notes", &self.notes);
        params
    }

    pub fn from_parameters(params: &[Parameter]) -> Self {
        Self {
            title: owned(params, "title"),
            authors: owned(params, "authors"),
            year: owned(params, "year"),
            doi: owned(params, "doi"),
            url: owned(params, "url"),
            notes: owned(params, "notes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedPublication {
    pub parameterset_id: ParameterSetId,
    pub title: String,
    pub authors: String,
    pub year: String,
    pub doi: String,
    pub url: String,
    pub notes: String,
    pub modified: DateTime<Utc>,
}

impl From<&ParameterSet> for RelatedPublication {
    fn from(ps: &ParameterSet) -> Self {
        let data = PublicationFormData::from_parameters(&ps.parameters);
        Self {
            parameterset_id: ps.id,
            title: data.title,
            authors: data.authors,
            year: data.year,
            doi: data.doi,
            url: data.url,
            notes: data.notes,
            modified: ps.modified,
        }
    }
}

// ---------------------------------------------------------------------------
// Auxiliary experiment parameters (read-only on the index page)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuxiliaryParameter {
    pub parameterset_id: ParameterSetId,
    pub name: String,
    pub value: String,
}
