use ajs::{Js, Stmt};
use kstring::KString;
use serde::Deserialize;
use serde_json::Value;

use crate::{document::{Component, Fragments, NodeId, RenderContext},
            error::RenderError,
            layout::Layout};

use super::chart::{KeyOrder, chart_div, column_accessor, declare, dimension_stmt, frame_stmt,
                   group, reset_link_stmt};

/// Options of a choropleth (`dc.geoChoroplethChart`): regions of a
/// GeoJSON collection coloured by the group value of `column`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeoChoroplethOptions {
    pub column: KString,
    /// A GeoJSON `FeatureCollection`.
    pub geojson: Value,
    /// JavaScript expression over `feature` giving the region's key,
    /// matched against the values of `column`.
    pub key_on: KString,
    pub layer: KString,
    pub title: KString,
    pub width: u32,
    pub height: u32,
    pub weight: Option<KString>,
    pub order: Option<KeyOrder>,
    /// JavaScript expression for a d3 projection, inserted verbatim.
    pub projection: Option<KString>,
    /// JavaScript expression for a d3 color scale, inserted verbatim.
    pub colors: Option<KString>,
    pub layout: Option<Layout>,
}

impl Default for GeoChoroplethOptions {
    fn default() -> Self {
        GeoChoroplethOptions {
            column: KString::from_static(""),
            geojson: Value::Null,
            key_on: KString::from_static("feature.properties.name"),
            layer: KString::from_static("state"),
            title: KString::from_static(""),
            width: 150,
            height: 150,
            weight: None,
            order: None,
            projection: None,
            colors: None,
            layout: None,
        }
    }
}

impl GeoChoroplethOptions {
    pub fn new(column: &str, geojson: Value) -> Self {
        GeoChoroplethOptions { column: KString::from_ref(column), geojson,
                               ..Default::default() }
    }
}

#[derive(Debug, Clone)]
pub struct GeoChoroplethFilter {
    crossfilter: NodeId,
    options: GeoChoroplethOptions,
}

impl GeoChoroplethFilter {
    pub fn new(crossfilter: NodeId, options: GeoChoroplethOptions) -> Self {
        GeoChoroplethFilter { crossfilter, options }
    }
}

impl Component for GeoChoroplethFilter {
    fn kind(&self) -> &'static str {
        "geo_choropleth_filter"
    }

    fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError> {
        ctx.require_figure()?;
        let name = ctx.name()?;
        let cf = ctx.crossfilter_name(self.crossfilter)?;
        let o = &self.options;
        let layout = o.layout.clone().unwrap_or_else(|| Layout::sized(o.width, o.height));

        let key_fn = Js::func(["feature"], vec![Stmt::Return(Js::raw(&o.key_on))]);
        let mut chart = Js::path("dc")
            .method("geoChoroplethChart", [Js::str(format!("#{name}-chart"))])
            .method("width", [Js::num(o.width)])
            .method("height", [Js::num(o.height)])
            .method("dimension", [Js::ident(name).dot("dimension")])
            .method("group", [group(name, o.weight.as_deref())])
            .method("overlayGeoJson", [Js::ident(name).dot("geojson").dot("features"),
                                       Js::str(&o.layer),
                                       key_fn]);
        if let Some(projection) = &o.projection {
            chart = chart.method("projection", [Js::raw(projection)]);
        }
        if let Some(colors) = &o.colors {
            chart = chart.method("colors", [Js::raw(colors)]);
        }
        if let Some(order) = &o.order {
            chart = chart.method("ordering", [order.ordering_fn()]);
        }

        Ok(Fragments {
            head: layout.style(name).into_iter().collect(),
            body: Some(chart_div(name, &layout)),
            script: vec![
                declare(name),
                Stmt::Assign(Js::ident(name).dot("geojson"), Js::Json(o.geojson.clone())),
                dimension_stmt(name, cf, column_accessor(&o.column)),
                frame_stmt(name, &o.title)?,
                Stmt::Assign(Js::ident(name).dot("chart"), chart),
                reset_link_stmt(name),
            ],
            ..Default::default()
        })
    }
}
