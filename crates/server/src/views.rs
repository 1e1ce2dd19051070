//! Server-rendered HTML pages.
//!
//! Templates are compiled into the binary and rendered with `MiniJinja`.
//! Files ending in `.html` are auto-escaped.

use axum::response::Html;
use minijinja::{Environment, context};
use serde::Serialize;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("file_send.html", include_str!("../templates/file_send.html")),
    ("files.html", include_str!("../templates/files.html")),
    ("generic.html", include_str!("../templates/generic.html")),
    ("log.html", include_str!("../templates/log.html")),
];

/// Template environment shared by all handlers.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    /// Load the built-in page templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Render the named template with `ctx`.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, minijinja::Error> {
        let template = self.env.get_template(name)?;
        template.render(ctx).map(Html)
    }

    /// Render the generic title + message page.
    pub fn message(&self, title: &str, body: &str) -> Result<Html<String>, minijinja::Error> {
        self.render("generic.html", context! { title, body })
    }
}
