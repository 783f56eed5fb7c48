//! Template rendering. Templates are compiled into the binary.

use minijinja::Environment;
use serde::Serialize;

use crate::error::WebError;

pub const INDEX: &str = "related_info/index.html";
pub const ADD_URI: &str = "related_info/add_uri.html";
pub const ADD_PUBLICATION: &str = "related_info/add_publication.html";

const SOURCES: &[(&str, &str)] = &[
    ("related_info/base.html", include_str!("../templates/related_info/base.html")),
    ("related_info/form_fields.html", include_str!("../templates/related_info/form_fields.html")),
    (INDEX, include_str!("../templates/related_info/index.html")),
    (ADD_URI, include_str!("../templates/related_info/add_uri.html")),
    (ADD_PUBLICATION, include_str!("../templates/related_info/add_publication.html")),
];

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in SOURCES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<C: Serialize>(&self, name: &str, ctx: &C) -> Result<String, WebError> {
        Ok(self.env.get_template(name)?.render(ctx)?)
    }
}
