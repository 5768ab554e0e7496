//! Map layers that follow the crossfilter selection.
//!
//! Each overlay defines `<name>.updateFun`, which rebuilds its layer
//! from `cf.allDim.top(Infinity)`. dc.js has no plain "filtered"
//! event, so a data table bound to an element that does not exist is
//! registered, and its renderlet calls `updateFun` on every redraw.
//! `updateFun` also runs once after the overlay's children (marker
//! functions) have set `<name>.marker_function`.

use std::collections::BTreeMap;

use ajs::{Js, Stmt, ks};
use kstring::KString;
use serde::Deserialize;

use crate::{document::{Component, Fragments, NodeId, RenderContext, Role},
            error::RenderError,
            filters::chart::declare,
            links};

/// `cf.allDim.top(Infinity)` as `dimVals`, then `body` once per row
/// with the row in `d`.
fn for_each_row(crossfilter: &str, body: Vec<Stmt>) -> Vec<Stmt> {
    let mut inner = vec![Stmt::Var(ks("d"), Js::ident("dimVals").index(Js::ident("i")))];
    inner.extend(body);
    vec![
        Stmt::Var(ks("dimVals"),
                  Js::ident(crossfilter).dot("allDim").method("top", [Js::ident("Infinity")])),
        Stmt::ForIn(ks("i"), Js::ident("dimVals"), inner),
    ]
}

/// Calls `name.updateFun()` whenever dc.js redraws.
fn redraw_hook(name: &str, crossfilter: &str) -> Stmt {
    Stmt::Expr(
        Js::path("dc").method("dataTable", [Js::str(format!("#{name}-redraw-hook"))])
            .method("dimension", [Js::ident(crossfilter).dot("allDim")])
            .method("group", [Js::func(["d"], vec![Stmt::Return(Js::str("dc.js"))])])
            .method("on", [
                Js::str("renderlet"),
                Js::func(["table"], vec![update_call(name)]),
            ]))
}

fn update_call(name: &str) -> Stmt {
    Stmt::Expr(Js::ident(name).method("updateFun", []))
}

/// `L.marker([d.lat, d.lng])`, replaced by marker function children.
fn default_marker_function() -> Js {
    Js::func(["d"], vec![Stmt::Return(
        Js::path("L").method("marker", [Js::array([Js::path("d.lat"), Js::path("d.lng")])]))])
}

/// An overlay drawing one marker per row into a layer group made by
/// `constructor`, stored as `name.layer_field`.
fn marker_layer(
    ctx: &RenderContext,
    crossfilter: NodeId,
    layer_field: &str,
    constructor: Js,
    fit_bounds: bool,
) -> Result<Fragments, RenderError> {
    ctx.require_figure()?;
    let name = ctx.name()?;
    let cf = ctx.crossfilter_name(crossfilter)?;
    let map = ctx.parent_name_with_role(Role::Map)?;
    let layer = || Js::ident("this").dot(layer_field);

    let mut update = vec![Stmt::Expr(layer().method("clearLayers", []))];
    update.extend(for_each_row(cf, vec![
        Stmt::Var(ks("marker"), Js::ident("this").method("marker_function", [Js::ident("d")])),
        Stmt::Expr(layer().method("addLayer", [Js::ident("marker")])),
    ]));
    update.push(Stmt::Expr(Js::ident(map).method("addLayer", [layer()])));
    if fit_bounds {
        update.push(Stmt::If(
            layer().method("getLayers", []).dot("length").op(">", Js::num(0)),
            vec![Stmt::Expr(Js::ident(map).method(
                "fitBounds", [layer().method("getBounds", [])]))]));
    }

    Ok(Fragments {
        script: vec![
            declare(name),
            Stmt::Assign(Js::ident(name).dot(layer_field), constructor),
            Stmt::Assign(Js::ident(name).dot("marker_function"), default_marker_function()),
            Stmt::Assign(Js::ident(name).dot("updateFun"), Js::func::<&str>([], update)),
            redraw_hook(name, cf),
        ],
        finish: vec![update_call(name)],
        ..Default::default()
    })
}


#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeatureGroupOptions {
    /// Zoom the map to the markers after each update.
    pub fit_bounds: bool,
}

/// One marker per selected row in an `L.FeatureGroup`.
#[derive(Debug, Clone)]
pub struct FeatureGroupFilter {
    crossfilter: NodeId,
    options: FeatureGroupOptions,
}

impl FeatureGroupFilter {
    pub fn new(crossfilter: NodeId, options: FeatureGroupOptions) -> Self {
        FeatureGroupFilter { crossfilter, options }
    }
}

impl Component for FeatureGroupFilter {
    fn kind(&self) -> &'static str {
        "feature_group_filter"
    }

    fn role(&self) -> Role {
        Role::MarkerOverlay
    }

    fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError> {
        marker_layer(ctx, self.crossfilter, "feature_group",
                     Js::new_(Js::path("L.FeatureGroup"), []),
                     self.options.fit_bounds)
    }
}


#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarkerClusterOptions {
    pub fit_bounds: bool,
    /// Options for `L.markerClusterGroup`, passed through as JSON.
    pub cluster_options: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Like `FeatureGroupFilter`, with nearby markers merged into clusters
/// (Leaflet.markercluster).
#[derive(Debug, Clone)]
pub struct MarkerClusterFilter {
    crossfilter: NodeId,
    options: MarkerClusterOptions,
}

impl MarkerClusterFilter {
    pub fn new(crossfilter: NodeId, options: MarkerClusterOptions) -> Self {
        MarkerClusterFilter { crossfilter, options }
    }
}

impl Component for MarkerClusterFilter {
    fn kind(&self) -> &'static str {
        "marker_cluster_filter"
    }

    fn role(&self) -> Role {
        Role::MarkerOverlay
    }

    fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError> {
        let args = self.options.cluster_options.iter()
            .map(|o| Js::Json(serde_json::Value::Object(o.clone())));
        let mut fragments = marker_layer(ctx, self.crossfilter, "marker_cluster",
                                         Js::path("L").method("markerClusterGroup", args),
                                         self.options.fit_bounds)?;
        fragments.head = links::head_items(links::MARKER_CLUSTER);
        Ok(fragments)
    }
}


#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeatmapOptions {
    /// Latitude column.
    pub lat: KString,
    /// Longitude column.
    pub lng: KString,
    /// Column with the weight of each point; all points weigh the same
    /// if unset.
    pub intensity: Option<KString>,
    pub fit_bounds: bool,
    pub min_opacity: f64,
    pub max_zoom: u32,
    pub max_val: f64,
    pub radius: f64,
    pub blur: f64,
    /// Color stops, e.g. `{"0.4": "blue", "1": "red"}`.
    pub gradient: Option<BTreeMap<KString, KString>>,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        HeatmapOptions {
            lat: KString::from_static("lat"),
            lng: KString::from_static("lng"),
            intensity: None,
            fit_bounds: false,
            min_opacity: 0.5,
            max_zoom: 18,
            max_val: 1.0,
            radius: 25.,
            blur: 15.,
            gradient: None,
        }
    }
}

/// A heat layer (Leaflet.heat) over the selected rows.
#[derive(Debug, Clone)]
pub struct HeatmapFilter {
    crossfilter: NodeId,
    options: HeatmapOptions,
}

impl HeatmapFilter {
    pub fn new(crossfilter: NodeId, options: HeatmapOptions) -> Self {
        HeatmapFilter { crossfilter, options }
    }
}

impl Component for HeatmapFilter {
    fn kind(&self) -> &'static str {
        "heatmap_filter"
    }

    fn role(&self) -> Role {
        Role::Overlay
    }

    fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError> {
        ctx.require_figure()?;
        let name = ctx.name()?;
        let cf = ctx.crossfilter_name(self.crossfilter)?;
        let map = ctx.parent_name_with_role(Role::Map)?;
        let o = &self.options;

        let mut heat_options = vec![
            ("minOpacity", Js::num(o.min_opacity)),
            ("maxZoom", Js::num(o.max_zoom)),
            ("max", Js::num(o.max_val)),
            ("radius", Js::num(o.radius)),
            ("blur", Js::num(o.blur)),
        ];
        if let Some(gradient) = &o.gradient {
            heat_options.push(("gradient", Js::object(
                gradient.iter().map(|(stop, color)| (stop, Js::str(color))))));
        }
        let heatmap = Js::path("L").method("heatLayer", [Js::array([]),
                                                         Js::object(heat_options)])
            .method("addTo", [Js::ident(map)]);

        let mut point = vec![Js::field("d", &o.lat), Js::field("d", &o.lng)];
        point.extend(o.intensity.as_deref().map(|w| Js::field("d", w)));
        let mut update = vec![Stmt::Var(ks("latlngs"), Js::array([]))];
        update.extend(for_each_row(cf, vec![
            Stmt::Expr(Js::ident("latlngs").method("push", [Js::array(point)])),
        ]));
        update.push(Stmt::Expr(Js::path("this.heatmap").method("setLatLngs",
                                                               [Js::ident("latlngs")])));
        if o.fit_bounds {
            update.push(Stmt::If(
                Js::path("latlngs.length").op(">", Js::num(0)),
                vec![Stmt::Expr(Js::ident(map).method("fitBounds", [
                    Js::path("L").method("latLngBounds", [Js::ident("latlngs")])
                ]))]));
        }

        Ok(Fragments {
            head: links::head_items(links::HEAT),
            script: vec![
                declare(name),
                Stmt::Assign(Js::ident(name).dot("heatmap"), heatmap),
                Stmt::Assign(Js::ident(name).dot("updateFun"), Js::func::<&str>([], update)),
                redraw_hook(name, cf),
            ],
            finish: vec![update_call(name)],
            ..Default::default()
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use ajs::Print;

    fn squeeze(s: &str) -> String {
        s.split_whitespace().collect()
    }

    #[test]
    fn t_for_each_row() {
        let s = for_each_row("cf", vec![Stmt::Expr(Js::ident("f").call([Js::ident("d")]))]);
        assert_eq!(squeeze(&s.to_code_string().unwrap()),
                   "vardimVals=cf.allDim.top(Infinity);\
                    for(variindimVals){vard=dimVals[i];f(d);}");
    }

    #[test]
    fn t_redraw_hook() {
        assert_eq!(squeeze(&redraw_hook("fg", "cf").to_code_string().unwrap()),
                   "dc.dataTable(\"#fg-redraw-hook\").dimension(cf.allDim)\
                    .group(function(d){return\"dc.js\";})\
                    .on(\"renderlet\",function(table){fg.updateFun();});");
    }
}
