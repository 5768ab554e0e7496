//! Pieces shared by the dc.js chart widgets.

use ajs::{Js, Markup, Print, Stmt, att, ks};
use kstring::KString;
use serde::Deserialize;
use serde_json::Value;

use crate::{error::RenderError, layout::Layout};

/// An explicit order of the keys of a chart. The position of a key is
/// its 1-based index in the list, keys not in the list have none.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct KeyOrder(Vec<Value>);

/// `==` in JavaScript, restricted to what keys can be.
fn loose_eq(a: &Value, b: &Value) -> bool {
    fn num(v: &Value) -> Option<f64> {
        match v {
            Value::Number(n) => n.as_f64(),
            Value::Bool(b) => Some(if *b { 1. } else { 0. }),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    Some(0.)
                } else {
                    s.parse().ok()
                }
            }
            _ => None
        }
    }
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) =>
            false,
        _ => match (num(a), num(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false
        }
    }
}

impl KeyOrder {
    pub fn new<T: Into<Value>>(keys: impl IntoIterator<Item = T>) -> Self {
        KeyOrder(keys.into_iter().map(Into::into).collect())
    }

    /// 1-based; if a key is listed more than once, the last occurrence
    /// counts.
    pub fn position(&self, key: &Value) -> Option<usize> {
        self.0.iter().rposition(|k| loose_eq(k, key)).map(|i| i + 1)
    }

    /// The `.ordering` accessor computing `position` in the browser.
    pub fn ordering_fn(&self) -> Js {
        Js::func(["d"], vec![
            Stmt::Var(ks("out"), Js::Null),
            Stmt::Var(ks("order"), Js::Json(Value::Array(self.0.clone()))),
            Stmt::For {
                var: ks("j"),
                init: Js::num(0),
                cond: Js::ident("j").op("<", Js::path("order.length")),
                update: Js::raw("j++"),
                body: vec![
                    Stmt::If(Js::ident("order").index(Js::ident("j")).op("==", Js::path("d.key")),
                             vec![Stmt::Assign(Js::ident("out"),
                                               Js::num(1).op("+", Js::ident("j")))])
                ],
            },
            Stmt::Return(Js::ident("out")),
        ])
    }
}

/// `function (d) {return d["column"];}`
pub fn column_accessor(column: &str) -> Js {
    Js::func(["d"], vec![Stmt::Return(Js::field("d", column))])
}

/// `name.dimension = cf.crossfilter.dimension(accessor);`
pub fn dimension_stmt(name: &str, crossfilter: &str, accessor: Js) -> Stmt {
    Stmt::Assign(
        Js::ident(name).dot("dimension"),
        Js::ident(crossfilter).dot("crossfilter").method("dimension", [accessor]))
}

/// The group of `name.dimension`, counting rows or summing `weight`.
pub fn group(name: &str, weight: Option<&str>) -> Js {
    let g = Js::ident(name).dot("dimension").method("group", []);
    match weight {
        Some(w) => g.method("reduceSum", [column_accessor(w)]),
        None => g.method("reduceCount", []),
    }
}

/// `var name = {};`
pub fn declare(name: &str) -> Stmt {
    Stmt::Var(ks(name), Js::object::<&str>([]))
}

/// Fill the widget's div with a title, a reset link and the chart's
/// own div.
pub fn frame_stmt(name: &str, title: &str) -> Result<Stmt, RenderError> {
    let header = ajs::markup::h4([], [
        Markup::text(title),
        Markup::raw(" "),
        ajs::markup::small([], [
            ajs::markup::a([att("id", format!("{name}-reset"))], [Markup::text("reset")])
        ]),
    ]);
    let chart = ajs::markup::div([att("id", format!("{name}-chart")), att("class", "dc-chart")],
                                 []);
    let html = format!("{}{}", header.to_code_string()?, chart.to_code_string()?);
    Ok(Stmt::Assign(
        Js::path("document").method("getElementById", [Js::str(name)]).dot("innerHTML"),
        Js::str(html)))
}

/// Clicking `#name-reset` clears this chart's filter.
pub fn reset_link_stmt(name: &str) -> Stmt {
    Stmt::Expr(
        Js::path("d3").method("selectAll", [Js::str(format!("#{name}-reset"))])
            .method("on", [
                Js::str("click"),
                Js::func::<&str>([], vec![
                    Stmt::Expr(Js::ident(name).dot("chart").method("filterAll", [])),
                    Stmt::Expr(Js::path("dc").method("redrawAll", [])),
                ]),
            ]))
}

/// `.ordinalColors([...])` argument.
pub fn colors_js(colors: &[KString]) -> Js {
    Js::array(colors.iter().map(Js::str))
}

/// The outer div of a chart widget; the chart itself is filled in by
/// `frame_stmt`.
pub fn chart_div(name: &str, layout: &Layout) -> Markup {
    layout.div(name, [])
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn squeeze(s: &str) -> String {
        s.split_whitespace().collect()
    }

    #[test]
    fn t_position() {
        let order = KeyOrder::new(["B", "A", "C"]);
        assert_eq!(order.position(&json!("A")), Some(2));
        assert_eq!(order.position(&json!("B")), Some(1));
        assert_eq!(order.position(&json!("D")), None);
    }

    #[test]
    fn t_position_last_wins() {
        let order = KeyOrder::new(["A", "B", "A"]);
        assert_eq!(order.position(&json!("A")), Some(3));
    }

    #[test]
    fn t_position_loose() {
        let order = KeyOrder::new([json!(1), json!("2"), json!(true)]);
        assert_eq!(order.position(&json!("1")), Some(3));
        assert_eq!(order.position(&json!(2)), Some(2));
        assert_eq!(order.position(&json!(1.0)), Some(3));
        assert_eq!(order.position(&Value::Null), None);
        assert_eq!(KeyOrder::new([json!("x")]).position(&json!("X")), None);
    }

    #[test]
    fn t_ordering_fn() {
        let f = KeyOrder::new(["B", "A"]).ordering_fn();
        assert_eq!(squeeze(&f.to_code_string().unwrap()),
                   "function(d){varout=null;varorder=[\"B\",\"A\"];\
                    for(varj=0;j<order.length;j++){if(order[j]==d.key){out=1+j;}}\
                    returnout;}");
    }

    #[test]
    fn t_group() {
        assert_eq!(squeeze(&group("p", None).to_code_string().unwrap()),
                   "p.dimension.group().reduceCount()");
        assert_eq!(squeeze(&group("p", Some("w")).to_code_string().unwrap()),
                   "p.dimension.group().reduceSum(function(d){returnd[\"w\"];})");
    }

    #[test]
    fn t_frame() {
        let s = frame_stmt("p", "Fruit <&>").unwrap().to_code_string().unwrap();
        // the member access after a call starts a new line
        assert_eq!(s.replace("\n    ", ""), "document.getElementById(\"p\").innerHTML = \
                       \"\\u003ch4>Fruit &lt;&amp;&gt; \\u003csmall>\\u003ca id=\\\"p-reset\\\">\
                       reset\\u003c/a>\\u003c/small>\\u003c/h4>\
                       \\u003cdiv id=\\\"p-chart\\\" class=\\\"dc-chart\\\">\\u003c/div>\";");
    }

    #[test]
    fn t_reset_link() {
        assert_eq!(squeeze(&reset_link_stmt("p").to_code_string().unwrap()),
                   "d3.selectAll(\"#p-reset\").on(\"click\",function(){\
                    p.chart.filterAll();dc.redrawAll();});");
    }
}
