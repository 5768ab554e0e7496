use ajs::{Js, Stmt};
use kstring::KString;
use serde::Deserialize;

use crate::{document::{Component, Fragments, NodeId, RenderContext},
            error::RenderError,
            layout::Layout};

use super::chart::{KeyOrder, chart_div, colors_js, column_accessor, declare, dimension_stmt,
                   frame_stmt, group, reset_link_stmt};

/// Options of a horizontal bar chart (`dc.rowChart`), one bar per
/// distinct value of `column`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RowBarOptions {
    pub column: KString,
    pub title: KString,
    pub width: u32,
    pub height: u32,
    pub weight: Option<KString>,
    pub order: Option<KeyOrder>,
    pub elastic_x: bool,
    pub colors: Option<Vec<KString>>,
    pub layout: Option<Layout>,
}

impl Default for RowBarOptions {
    fn default() -> Self {
        RowBarOptions {
            column: KString::from_static(""),
            title: KString::from_static(""),
            width: 150,
            height: 150,
            weight: None,
            order: None,
            elastic_x: true,
            colors: None,
            layout: None,
        }
    }
}

impl RowBarOptions {
    pub fn new(column: &str) -> Self {
        RowBarOptions { column: KString::from_ref(column), ..Default::default() }
    }
}

#[derive(Debug, Clone)]
pub struct RowBarFilter {
    crossfilter: NodeId,
    options: RowBarOptions,
}

impl RowBarFilter {
    pub fn new(crossfilter: NodeId, options: RowBarOptions) -> Self {
        RowBarFilter { crossfilter, options }
    }
}

impl Component for RowBarFilter {
    fn kind(&self) -> &'static str {
        "row_bar_filter"
    }

    fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError> {
        ctx.require_figure()?;
        let name = ctx.name()?;
        let cf = ctx.crossfilter_name(self.crossfilter)?;
        let o = &self.options;
        let layout = o.layout.clone().unwrap_or_else(|| Layout::sized(o.width, o.height));

        let mut chart = Js::path("dc").method("rowChart", [Js::str(format!("#{name}-chart"))])
            .method("width", [Js::num(o.width)])
            .method("height", [Js::num(o.height)])
            .method("dimension", [Js::ident(name).dot("dimension")])
            .method("group", [group(name, o.weight.as_deref())])
            .method("elasticX", [Js::Bool(o.elastic_x)]);
        if let Some(colors) = &o.colors {
            chart = chart.method("ordinalColors", [colors_js(colors)]);
        }
        if let Some(order) = &o.order {
            chart = chart.method("ordering", [order.ordering_fn()]);
        }

        Ok(Fragments {
            head: layout.style(name).into_iter().collect(),
            body: Some(chart_div(name, &layout)),
            script: vec![
                declare(name),
                dimension_stmt(name, cf, column_accessor(&o.column)),
                frame_stmt(name, &o.title)?,
                Stmt::Assign(Js::ident(name).dot("chart"), chart),
                reset_link_stmt(name),
            ],
            ..Default::default()
        })
    }
}
