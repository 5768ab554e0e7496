//! Histogram over a numeric column (`dc.barChart`).
//!
//! Values are bucketed client side as
//! `floor((v - domain[0]) / groupby) + domain[0] / groupby`, so the x
//! axis runs over bucket numbers. Tick values are given in column units
//! and divided by `groupby`, tick labels are multiplied back.

use ajs::{Js, Stmt, ks};
use kstring::KString;
use serde::Deserialize;

use crate::{document::{Component, Fragments, NodeId, RenderContext},
            error::RenderError,
            layout::Layout,
            structural_bail};

use super::chart::{declare, dimension_stmt, group};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BarOptions {
    pub column: KString,
    pub width: u32,
    pub height: u32,
    pub bar_padding: f64,
    pub domain: [f64; 2],
    /// Bucket width, in column units.
    pub groupby: f64,
    pub xlabel: KString,
    pub ylabel: KString,
    pub margins: Option<Margins>,
    pub weight: Option<KString>,
    pub elastic_y: bool,
    /// Tick positions in column units; dc.js picks them if unset.
    pub xticks: Option<Vec<f64>>,
    /// `d3.time.format` specifier for tick labels, which are then
    /// taken as milliseconds since the epoch.
    pub time_format: Option<KString>,
    pub layout: Layout,
}

impl Default for BarOptions {
    fn default() -> Self {
        BarOptions {
            column: KString::from_static(""),
            width: 150,
            height: 150,
            bar_padding: 0.1,
            domain: [0., 1.],
            groupby: 1.,
            xlabel: KString::from_static(""),
            ylabel: KString::from_static(""),
            margins: None,
            weight: None,
            elastic_y: true,
            xticks: None,
            time_format: None,
            layout: Layout::default(),
        }
    }
}

impl BarOptions {
    pub fn new(column: &str, domain: [f64; 2], groupby: f64) -> Self {
        BarOptions { column: KString::from_ref(column), domain, groupby,
                     ..Default::default() }
    }
}

#[derive(Debug, Clone)]
pub struct BarFilter {
    crossfilter: NodeId,
    options: BarOptions,
}

impl BarFilter {
    pub fn new(crossfilter: NodeId, options: BarOptions) -> Self {
        BarFilter { crossfilter, options }
    }
}

/// `v / groupby`
fn bucket(v: Js, groupby: f64) -> Js {
    v.op("/", Js::num(groupby))
}

impl Component for BarFilter {
    fn kind(&self) -> &'static str {
        "bar_filter"
    }

    fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError> {
        ctx.require_figure()?;
        let name = ctx.name()?;
        let cf = ctx.crossfilter_name(self.crossfilter)?;
        let o = &self.options;
        if ! (o.groupby.is_finite() && o.groupby > 0.) {
            structural_bail!("{name}: groupby must be positive, got {}", o.groupby)
        }
        let [lo, hi] = o.domain;

        let accessor = Js::func(["d"], vec![Stmt::Return(
            Js::path("Math").method(
                "floor", [bucket(Js::field("d", &o.column).op("-", Js::num(lo)), o.groupby)])
                .op("+", bucket(Js::num(lo), o.groupby)))]);

        let mut script = vec![
            declare(name),
            dimension_stmt(name, cf, accessor),
        ];
        if let Some(ticks) = &o.xticks {
            script.push(Stmt::Assign(
                Js::ident(name).dot("ticks"),
                Js::array(ticks.iter().map(|t| bucket(Js::num(*t), o.groupby)))));
        }

        let mut chart = Js::path("dc").method("barChart", [Js::str(format!("#{name}"))])
            .method("width", [Js::num(o.width)])
            .method("height", [Js::num(o.height)])
            .method("dimension", [Js::ident(name).dot("dimension")])
            .method("group", [group(name, o.weight.as_deref())])
            .method("x", [Js::path("d3.scale").method("linear", []).method(
                "domain", [Js::array([bucket(Js::num(lo), o.groupby),
                                      bucket(Js::num(hi), o.groupby)])])])
            .method("elasticY", [Js::Bool(o.elastic_y)])
            .method("centerBar", [Js::Bool(false)])
            .method("barPadding", [Js::num(o.bar_padding)])
            .method("xAxisLabel", [Js::str(&o.xlabel)])
            .method("yAxisLabel", [Js::str(&o.ylabel)]);
        if let Some(m) = &o.margins {
            chart = chart.method("margins", [Js::object([
                ("top", Js::num(m.top)),
                ("right", Js::num(m.right)),
                ("bottom", Js::num(m.bottom)),
                ("left", Js::num(m.left)),
            ])]);
        }
        script.push(Stmt::Assign(Js::ident(name).dot("chart"), chart));

        let unbucket = Js::ident("x").op("*", Js::num(o.groupby));
        let tick_format = match &o.time_format {
            Some(fmt) => vec![
                Stmt::Var(ks("dateformat"),
                          Js::path("d3.time").method("format", [Js::str(fmt)])),
                Stmt::Return(Js::ident("dateformat").call(
                    [Js::new_(Js::ident("Date"), [unbucket])])),
            ],
            None => vec![Stmt::Return(unbucket)],
        };
        let mut axis = Js::ident(name).dot("chart").method("xAxis", []);
        if o.xticks.is_some() {
            axis = axis.method("tickValues", [Js::ident(name).dot("ticks")]);
        }
        axis = axis.method("tickFormat", [Js::func(["x"], tick_format)]);
        script.push(Stmt::Expr(axis));

        Ok(Fragments {
            head: o.layout.style(name).into_iter().collect(),
            body: Some(o.layout.div(name, [])),
            script,
            ..Default::default()
        })
    }
}
