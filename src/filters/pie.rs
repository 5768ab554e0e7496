use ajs::{Js, Stmt};
use kstring::KString;
use serde::Deserialize;

use crate::{document::{Component, Fragments, NodeId, RenderContext},
            error::RenderError,
            layout::Layout};

use super::chart::{KeyOrder, chart_div, colors_js, column_accessor, declare, dimension_stmt,
                   frame_stmt, group, reset_link_stmt};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PieOptions {
    pub column: KString,
    /// Shown above the chart.
    pub title: KString,
    pub width: u32,
    pub height: u32,
    pub inner_radius: u32,
    /// Sum this column instead of counting rows.
    pub weight: Option<KString>,
    pub order: Option<KeyOrder>,
    pub colors: Option<Vec<KString>>,
    /// JavaScript label accessor, inserted verbatim.
    pub label: Option<KString>,
    /// Defaults to a box of `width` x `height` pixels.
    pub layout: Option<Layout>,
}

impl Default for PieOptions {
    fn default() -> Self {
        PieOptions {
            column: KString::from_static(""),
            title: KString::from_static(""),
            width: 150,
            height: 150,
            inner_radius: 20,
            weight: None,
            order: None,
            colors: None,
            label: None,
            layout: None,
        }
    }
}

impl PieOptions {
    pub fn new(column: &str) -> Self {
        PieOptions { column: KString::from_ref(column), ..Default::default() }
    }
}

#[derive(Debug, Clone)]
pub struct PieFilter {
    crossfilter: NodeId,
    options: PieOptions,
}

impl PieFilter {
    pub fn new(crossfilter: NodeId, options: PieOptions) -> Self {
        PieFilter { crossfilter, options }
    }
}

impl Component for PieFilter {
    fn kind(&self) -> &'static str {
        "pie_filter"
    }

    fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError> {
        ctx.require_figure()?;
        let name = ctx.name()?;
        let cf = ctx.crossfilter_name(self.crossfilter)?;
        let o = &self.options;
        let layout = o.layout.clone().unwrap_or_else(|| Layout::sized(o.width, o.height));

        let mut chart = Js::path("dc").method("pieChart", [Js::str(format!("#{name}-chart"))])
            .method("width", [Js::num(o.width)])
            .method("height", [Js::num(o.height)])
            .method("dimension", [Js::ident(name).dot("dimension")])
            .method("group", [group(name, o.weight.as_deref())])
            .method("innerRadius", [Js::num(o.inner_radius)]);
        if let Some(label) = &o.label {
            chart = chart.method("label", [Js::raw(label)]);
        }
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
