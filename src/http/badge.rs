//! SVG badge layout.
//!
//! Every glyph is assumed 7px wide with 4px of padding on each side, which
//! matches the Verdana 11px text in the badge templates.
//!
//! `label` and `value` are XML-escaped here; the SVG templates are rendered
//! without tera's HTML escaper, which would also encode `/`.

use serde::Serialize;

use crate::cache::Roster;

/// Label shown when the request does not pick one.
pub const DEFAULT_LABEL: &str = "slack";

const PADDING: usize = 8;
const GLYPH_WIDTH: usize = 7;

/// Badge rendering styles. Anything unrecognised renders as `Plastic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadgeStyle {
    #[default]
    Plastic,
    Flat,
    FlatSquare,
}

impl BadgeStyle {
    pub fn from_query(style: Option<&str>) -> Self {
        match style {
            Some("flat") => BadgeStyle::Flat,
            Some("flat-square") => BadgeStyle::FlatSquare,
            _ => BadgeStyle::Plastic,
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            BadgeStyle::Plastic => "badge_plastic.svg",
            BadgeStyle::Flat => "badge_flat.svg",
            BadgeStyle::FlatSquare => "badge_flat_square.svg",
        }
    }
}

/// Right-hand text: `active/total`, `total`, or `-`.
pub fn badge_value(roster: Option<&Roster>) -> String {
    let Some(roster) = roster else {
        return "-".to_string();
    };
    match (roster.active_count(), roster.total_count()) {
        (0, 0) => "-".to_string(),
        (0, total) => total.to_string(),
        (active, total) => format!("{}/{}", active, total),
    }
}

/// Template variables for one badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeLayout {
    pub label: String,
    pub value: String,
    pub left_width: usize,
    pub right_width: usize,
    pub total_width: usize,
    pub left_x: usize,
    pub right_x: usize,
}

impl BadgeLayout {
    pub fn new(label: &str, value: &str) -> Self {
        let left_width = text_width(label);
        let right_width = text_width(value);
        Self {
            label: xml_escape(label),
            value: xml_escape(value),
            left_width,
            right_width,
            total_width: left_width + right_width,
            left_x: half(left_width),
            right_x: left_width + half(right_width),
        }
    }
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn text_width(text: &str) -> usize {
    PADDING + GLYPH_WIDTH * text.chars().count()
}

/// `n / 2` rounded half up.
fn half(n: usize) -> usize {
    n.div_ceil(2)
}
