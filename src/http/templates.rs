//! Page and badge templates, compiled once at startup.

use tera::{Context, Tera};

const TEMPLATES: [(&str, &str); 6] = [
    ("index.html", include_str!("../../templates/index.html")),
    ("iframe.html", include_str!("../../templates/iframe.html")),
    ("dialog.html", include_str!("../../templates/dialog.html")),
    ("badge_plastic.svg", include_str!("../../templates/badge_plastic.svg")),
    ("badge_flat.svg", include_str!("../../templates/badge_flat.svg")),
    ("badge_flat_square.svg", include_str!("../../templates/badge_flat_square.svg")),
];

/// Static scripts served verbatim.
pub const BADGE_JS: &str = include_str!("../../static/badge.js");
pub const CLIENT_JS: &str = include_str!("../../static/client.js");
pub const IFRAME_JS: &str = include_str!("../../static/iframe.js");

/// Compiled templates. HTML templates are autoescaped; badge text arrives
/// already XML-escaped from `BadgeLayout`.
#[derive(Debug)]
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.add_raw_templates(TEMPLATES.to_vec())?;
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String, tera::Error> {
        self.tera.render(name, context)
    }
}
