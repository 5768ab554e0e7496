//! Marker style values that are either literals or references to a
//! field of the current row.

use ajs::{Js, ks};
use kstring::KString;
use serde::Deserialize;

/// Strings starting with this refer to a row field.
pub const FIELD_PREFIX: &str = "feature.";

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(KString),
    Num(f64),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ParamRepr")]
pub enum Param {
    Literal(Literal),
    /// Name of the row field, without the prefix.
    FieldRef(KString),
}

impl Param {
    /// `"feature.x"` becomes a reference to field `x`, anything else a
    /// string literal. There is no escaping: a literal that happens
    /// to start with the prefix is taken as a reference.
    pub fn parse(s: &str) -> Param {
        match s.strip_prefix(FIELD_PREFIX) {
            Some(field) => Param::FieldRef(ks(field)),
            None => Param::Literal(Literal::Str(ks(s))),
        }
    }

    pub fn field(name: &str) -> Param {
        Param::FieldRef(ks(name))
    }

    pub fn num(n: impl Into<f64>) -> Param {
        Param::Literal(Literal::Num(n.into()))
    }

    pub fn bool(b: bool) -> Param {
        Param::Literal(Literal::Bool(b))
    }

    /// The expression for this value, with field references read from
    /// the row variable `row`.
    pub fn to_js(&self, row: &str) -> Js {
        match self {
            Param::Literal(Literal::Str(s)) => Js::str(s),
            Param::Literal(Literal::Num(n)) => Js::num(*n),
            Param::Literal(Literal::Bool(b)) => Js::Bool(*b),
            Param::FieldRef(f) => Js::field(row, f),
        }
    }
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Param::parse(s)
    }
}

impl From<f64> for Param {
    fn from(n: f64) -> Self {
        Param::num(n)
    }
}

impl From<i32> for Param {
    fn from(n: i32) -> Self {
        Param::num(n)
    }
}

impl From<bool> for Param {
    fn from(b: bool) -> Self {
        Param::bool(b)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ParamRepr {
    Bool(bool),
    Num(f64),
    Str(String),
}

impl From<ParamRepr> for Param {
    fn from(r: ParamRepr) -> Self {
        match r {
            ParamRepr::Bool(b) => Param::bool(b),
            ParamRepr::Num(n) => Param::num(n),
            ParamRepr::Str(s) => Param::parse(&s),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use ajs::Print;

    fn t(p: &Param) -> String {
        p.to_js("d").to_code_string().unwrap()
    }

    #[test]
    fn t_parse() {
        assert_eq!(Param::parse("feature.color"), Param::field("color"));
        assert_eq!(Param::parse("red"), Param::Literal(Literal::Str(ks("red"))));
        // only a prefix counts
        assert_eq!(Param::parse("my feature.x"),
                   Param::Literal(Literal::Str(ks("my feature.x"))));
    }

    #[test]
    fn t_to_js() {
        assert_eq!(t(&"feature.color".into()), "d[\"color\"]");
        assert_eq!(t(&"red".into()), "\"red\"");
        assert_eq!(t(&false.into()), "false");
        assert_eq!(t(&Param::num(0.5)), "0.5");
        assert_eq!(t(&Param::num(3)), "3");
    }

    #[test]
    fn t_deserialize() {
        let ps: Vec<Param> = serde_json::from_str(r#"[true, 2, "feature.w", "blue"]"#).unwrap();
        assert_eq!(ps, vec![Param::bool(true), Param::num(2), Param::field("w"),
                            Param::parse("blue")]);
    }
}
