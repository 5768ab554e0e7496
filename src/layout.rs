//! CSS sizing of the generated `<div>`s.

use std::fmt::{self, Display};

use ajs::{Markup, att, ks, opt_att};
use anyhow::{anyhow, bail, Result};
use itertools::Itertools;
use kstring::KString;
use serde::Deserialize;

use crate::document::HeadItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Px,
    Percent,
}

/// A CSS length. Deserializes from a number (pixels) or a string like
/// `"50%"` or `"300px"`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "LengthRepr")]
pub struct Length {
    pub value: f64,
    pub unit: Unit,
}

impl Length {
    pub fn px(value: impl Into<f64>) -> Self {
        Length { value: value.into(), unit: Unit::Px }
    }

    pub fn percent(value: impl Into<f64>) -> Self {
        Length { value: value.into(), unit: Unit::Percent }
    }

    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (num, unit) =
            if let Some(n) = s.strip_suffix('%') {
                (n, Unit::Percent)
            } else if let Some(n) = s.strip_suffix("px") {
                (n, Unit::Px)
            } else {
                (s, Unit::Px)
            };
        let value: f64 = num.trim().parse()
            .map_err(|e| anyhow!("invalid length {s:?}: {e}"))?;
        if ! value.is_finite() {
            bail!("invalid length {s:?}")
        }
        Ok(Length { value, unit })
    }
}

impl Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Unit::Px => write!(f, "{}px", self.value),
            Unit::Percent => write!(f, "{}%", self.value),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Num(f64),
    Str(String),
}

impl TryFrom<LengthRepr> for Length {
    type Error = anyhow::Error;

    fn try_from(r: LengthRepr) -> Result<Self> {
        match r {
            LengthRepr::Num(n) => Ok(Length::px(n)),
            LengthRepr::Str(s) => Length::parse(&s),
        }
    }
}

/// Position and size of a component's outer `<div>`, emitted as a
/// `<style>` head item keyed by the component's name. The default is
/// a relatively positioned box filling its container.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub position: Option<KString>,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub left: Option<Length>,
    pub top: Option<Length>,
    /// Extra CSS class(es) for the outer element.
    pub class: Option<KString>,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            position: Some(ks("relative")),
            width: Some(Length::percent(100)),
            height: Some(Length::percent(100)),
            left: Some(Length::percent(0)),
            top: Some(Length::percent(0)),
            class: None,
        }
    }
}

impl Layout {
    /// A box of fixed pixel size.
    pub fn sized(width: u32, height: u32) -> Self {
        Layout {
            width: Some(Length::px(width)),
            height: Some(Length::px(height)),
            ..Layout::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(ks(class));
        self
    }

    fn declarations(&self) -> Vec<String> {
        let lengths = [("width", &self.width), ("height", &self.height),
                       ("left", &self.left), ("top", &self.top)];
        self.position.iter().map(|p| format!("position: {p};"))
            .chain(lengths.iter().filter_map(
                |(k, v)| v.map(|v| format!("{k}: {v};"))))
            .collect()
    }

    /// The `<style>` head item for the element with id `name`, or
    /// `None` if nothing is set.
    pub fn style(&self, name: &str) -> Option<HeadItem> {
        let decls = self.declarations();
        if decls.is_empty() {
            return None
        }
        let css = format!("#{name} {{ {} }}", decls.iter().join(" "));
        Some(HeadItem::Markup {
            name: ks(format!("{name}_style")),
            markup: ajs::markup::style([], [Markup::raw(css)]),
        })
    }

    /// The `class` attribute, with `extra` classes appended.
    pub fn class_att(&self, extra: Option<&str>) -> Option<(KString, KString)> {
        let classes = self.class.as_deref().into_iter().chain(extra).join(" ");
        if classes.is_empty() {
            None
        } else {
            att("class", classes)
        }
    }

    /// An empty `<div id=name>` with this layout's class.
    pub fn div(&self, name: &str, body: impl IntoIterator<Item = Markup>) -> Markup {
        ajs::markup::div([att("id", name), opt_att("class", self.class.as_ref())], body)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use ajs::Print;

    #[test]
    fn t_length() {
        assert_eq!(Length::parse("50%").unwrap(), Length::percent(50));
        assert_eq!(Length::parse("300px").unwrap(), Length::px(300));
        assert_eq!(Length::parse(" 12.5 ").unwrap(), Length::px(12.5));
        assert!(Length::parse("wide").is_err());
        assert_eq!(Length::percent(100).to_string(), "100%");
        assert_eq!(Length::px(150).to_string(), "150px");
        let l: Length = serde_json::from_str("250").unwrap();
        assert_eq!(l, Length::px(250));
        let l: Length = serde_json::from_str("\"25%\"").unwrap();
        assert_eq!(l, Length::percent(25));
    }

    #[test]
    fn t_style() {
        let item = Layout::sized(150, 120).style("pie_1").unwrap();
        assert_eq!(item.name(), "pie_1_style");
        assert_eq!(item.to_markup().to_code_string().unwrap(),
                   "<style>#pie_1 { position: relative; width: 150px; height: 120px; \
                    left: 0%; top: 0%; }</style>");
        let empty = Layout { position: None, width: None, height: None, left: None,
                             top: None, class: None };
        assert_eq!(empty.style("x"), None);
    }

    #[test]
    fn t_class() {
        let l = Layout::default();
        assert_eq!(l.class_att(None), None);
        assert_eq!(l.class_att(Some("reset-filters")), att("class", "reset-filters"));
        let l = l.with_class("col-md-4");
        assert_eq!(l.class_att(Some("reset-filters")),
                   att("class", "col-md-4 reset-filters"));
    }

    #[test]
    fn t_deserialize() {
        let l: Layout = serde_json::from_str(r#"{"width": 300, "class": "row"}"#).unwrap();
        assert_eq!(l.width, Some(Length::px(300)));
        assert_eq!(l.height, Some(Length::percent(100)));
        assert_eq!(l.class.as_deref(), Some("row"));
    }
}
