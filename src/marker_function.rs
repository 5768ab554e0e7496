//! Per-row marker styles for the map overlays.
//!
//! A marker function is attached as a child of an overlay and replaces
//! the overlay's default `marker_function`, which turns a row `d` into
//! a Leaflet layer.

use ajs::{Js, Stmt, ks};
use kstring::KString;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{document::{Component, Fragments, RenderContext, Role},
            error::RenderError,
            links,
            param::Param};

/// `overlay.marker_function = f;`
fn assign_to_parent(ctx: &RenderContext, f: Js) -> Result<Stmt, RenderError> {
    ctx.require_figure()?;
    let parent = ctx.parent_name_with_role(Role::MarkerOverlay)?;
    Ok(Stmt::Assign(Js::ident(parent).dot("marker_function"), f))
}

fn latlng(lat: &str, lng: &str) -> Js {
    Js::array([Js::field("d", lat), Js::field("d", lng)])
}

fn with_popup(marker: Js, popup: Option<&str>) -> Js {
    match popup {
        Some(p) => marker.method("bindPopup", [Js::field("d", p)]),
        None => marker,
    }
}

fn lat_default() -> KString {
    KString::from_static("lat")
}

fn lng_default() -> KString {
    KString::from_static("lng")
}


/// A plain `L.marker`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarkerFunction {
    /// Latitude column.
    pub lat: KString,
    /// Longitude column.
    pub lng: KString,
    /// Column with the popup text.
    pub popup: Option<KString>,
}

impl Default for MarkerFunction {
    fn default() -> Self {
        MarkerFunction { lat: lat_default(), lng: lng_default(), popup: None }
    }
}

impl MarkerFunction {
    pub fn to_js(&self) -> Js {
        let marker = Js::path("L").method("marker", [latlng(&self.lat, &self.lng)]);
        Js::func(["d"], vec![Stmt::Return(with_popup(marker, self.popup.as_deref()))])
    }
}

impl Component for MarkerFunction {
    fn kind(&self) -> &'static str {
        "marker_function"
    }

    fn role(&self) -> Role {
        Role::MarkerFunction
    }

    fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError> {
        Ok(Fragments { script: vec![assign_to_parent(ctx, self.to_js())?],
                       ..Default::default() })
    }
}


/// Leaflet path options, each either a literal or a `feature.` field
/// reference.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathOptions {
    pub stroke: Option<Param>,
    pub color: Option<Param>,
    pub weight: Option<Param>,
    pub opacity: Option<Param>,
    pub fill: Option<Param>,
    pub fill_color: Option<Param>,
    pub fill_opacity: Option<Param>,
    pub fill_rule: Option<Param>,
}

impl PathOptions {
    pub fn to_js(&self) -> Js {
        let fields = [
            ("stroke", &self.stroke),
            ("color", &self.color),
            ("weight", &self.weight),
            ("opacity", &self.opacity),
            ("fill", &self.fill),
            ("fillColor", &self.fill_color),
            ("fillOpacity", &self.fill_opacity),
            ("fillRule", &self.fill_rule),
        ];
        Js::object(fields.into_iter()
                   .filter_map(|(k, v)| v.as_ref().map(|v| (k, v.to_js("d")))))
    }
}

/// How the path options of a circle are given.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStyle {
    /// Known options, with `feature.` references resolved per row.
    Resolved(PathOptions),
    /// Any options, emitted as a JSON object with sorted keys and no
    /// field resolution.
    Verbatim(Map<String, Value>),
}

impl Default for PathStyle {
    fn default() -> Self {
        PathStyle::Resolved(PathOptions::default())
    }
}

impl PathStyle {
    pub fn to_js(&self) -> Js {
        match self {
            PathStyle::Resolved(o) => o.to_js(),
            PathStyle::Verbatim(m) => Js::Json(Value::Object(m.clone())),
        }
    }
}

/// `L.circleMarker` (radius in pixels) or `L.circle` (radius in
/// meters).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CircleMarkerFunction {
    pub lat: KString,
    pub lng: KString,
    pub popup: Option<KString>,
    pub radius: Option<Param>,
    pub radius_meter: bool,
    pub style: PathStyle,
}

impl Default for CircleMarkerFunction {
    fn default() -> Self {
        CircleMarkerFunction {
            lat: lat_default(),
            lng: lng_default(),
            popup: None,
            radius: None,
            radius_meter: false,
            style: PathStyle::default(),
        }
    }
}

/// `L.circle` needs a radius up front.
const DEFAULT_CIRCLE_RADIUS: f64 = 10.;

impl CircleMarkerFunction {
    pub fn to_js(&self) -> Js {
        let at = latlng(&self.lat, &self.lng);
        let mut marker = if self.radius_meter {
            let radius = match &self.radius {
                Some(r) => r.to_js("d"),
                None => Js::num(DEFAULT_CIRCLE_RADIUS),
            };
            Js::path("L").method("circle", [at, radius, self.style.to_js()])
        } else {
            Js::path("L").method("circleMarker", [at, self.style.to_js()])
        };
        if let Some(r) = &self.radius {
            marker = marker.method("setRadius", [r.to_js("d")]);
        }
        Js::func(["d"], vec![Stmt::Return(with_popup(marker, self.popup.as_deref()))])
    }
}

impl Component for CircleMarkerFunction {
    fn kind(&self) -> &'static str {
        "circle_marker_function"
    }

    fn role(&self) -> Role {
        Role::MarkerFunction
    }

    fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError> {
        Ok(Fragments { script: vec![assign_to_parent(ctx, self.to_js())?],
                       ..Default::default() })
    }
}


/// A marker with an icon from Leaflet.awesome-markers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AwesomeMarkerFunction {
    pub lat: KString,
    pub lng: KString,
    pub popup: Option<KString>,
    pub opacity: Param,
    /// Icon name, e.g. `"home"`.
    pub icon: Param,
    /// Icon set: `"glyphicon"` or `"fa"`.
    pub prefix: Param,
    pub marker_color: Param,
    pub icon_color: Param,
    pub spin: Param,
    pub extra_classes: Param,
}

impl Default for AwesomeMarkerFunction {
    fn default() -> Self {
        AwesomeMarkerFunction {
            lat: lat_default(),
            lng: lng_default(),
            popup: None,
            opacity: Param::num(1.),
            icon: Param::parse("home"),
            prefix: Param::parse("glyphicon"),
            marker_color: Param::parse("blue"),
            icon_color: Param::parse("white"),
            spin: Param::bool(false),
            extra_classes: Param::parse(""),
        }
    }
}

impl AwesomeMarkerFunction {
    pub fn to_js(&self) -> Js {
        let marker = Js::path("L").method("marker", [
            latlng(&self.lat, &self.lng),
            Js::object([("opacity", self.opacity.to_js("d"))]),
        ]);
        let icon = Js::path("L.AwesomeMarkers").method("icon", [Js::object([
            ("icon", self.icon.to_js("d")),
            ("prefix", self.prefix.to_js("d")),
            ("markerColor", self.marker_color.to_js("d")),
            ("iconColor", self.icon_color.to_js("d")),
            ("spin", self.spin.to_js("d")),
            ("extraClasses", self.extra_classes.to_js("d")),
        ])]);
        Js::func(["d"], vec![
            Stmt::Var(ks("marker"), with_popup(marker, self.popup.as_deref())),
            Stmt::Var(ks("icon"), icon),
            Stmt::Expr(Js::ident("marker").method("setIcon", [Js::ident("icon")])),
            Stmt::Return(Js::ident("marker")),
        ])
    }
}

impl Component for AwesomeMarkerFunction {
    fn kind(&self) -> &'static str {
        "awesome_marker_function"
    }

    fn role(&self) -> Role {
        Role::MarkerFunction
    }

    fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError> {
        Ok(Fragments {
            head: links::head_items(links::AWESOME_MARKERS),
            script: vec![assign_to_parent(ctx, self.to_js())?],
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

    fn t(f: Js) -> String {
        squeeze(&f.to_code_string().unwrap())
    }

    #[test]
    fn t_marker() {
        assert_eq!(t(MarkerFunction::default().to_js()),
                   "function(d){returnL.marker([d[\"lat\"],d[\"lng\"]]);}");
        let m = MarkerFunction { lat: ks("y"), lng: ks("x"), popup: Some(ks("name")) };
        assert_eq!(t(m.to_js()),
                   "function(d){returnL.marker([d[\"y\"],d[\"x\"]]).bindPopup(d[\"name\"]);}");
    }

    #[test]
    fn t_circle_resolved() {
        let c = CircleMarkerFunction {
            radius: Some(Param::parse("feature.size")),
            popup: Some(ks("name")),
            style: PathStyle::Resolved(PathOptions {
                stroke: Some(Param::bool(false)),
                fill_color: Some(Param::parse("feature.color")),
                fill_opacity: Some(Param::num(0.8)),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(t(c.to_js()),
                   "function(d){returnL.circleMarker([d[\"lat\"],d[\"lng\"]],\
                    {stroke:false,fillColor:d[\"color\"],fillOpacity:0.8})\
                    .setRadius(d[\"size\"]).bindPopup(d[\"name\"]);}");
    }

    #[test]
    fn t_circle_verbatim() {
        let mut opts = Map::new();
        opts.insert("stroke".into(), Value::Bool(false));
        opts.insert("fillColor".into(), Value::from("red"));
        let c = CircleMarkerFunction {
            radius: Some(Param::num(50000)),
            radius_meter: true,
            style: PathStyle::Verbatim(opts),
            ..Default::default()
        };
        assert_eq!(t(c.to_js()),
                   "function(d){returnL.circle([d[\"lat\"],d[\"lng\"]],50000,\
                    {\"fillColor\":\"red\",\"stroke\":false}).setRadius(50000);}");
    }

    #[test]
    fn t_circle_meter_default_radius() {
        let c = CircleMarkerFunction { radius_meter: true, ..Default::default() };
        assert_eq!(t(c.to_js()),
                   "function(d){returnL.circle([d[\"lat\"],d[\"lng\"]],10,{});}");
    }

    #[test]
    fn t_awesome() {
        let a = AwesomeMarkerFunction {
            marker_color: Param::parse("feature.color"),
            popup: Some(ks("name")),
            ..Default::default()
        };
        assert_eq!(t(a.to_js()),
                   "function(d){\
                    varmarker=L.marker([d[\"lat\"],d[\"lng\"]],{opacity:1}).bindPopup(d[\"name\"]);\
                    varicon=L.AwesomeMarkers.icon({icon:\"home\",prefix:\"glyphicon\",\
                    markerColor:d[\"color\"],iconColor:\"white\",spin:false,extraClasses:\"\"});\
                    marker.setIcon(icon);returnmarker;}");
    }

    #[test]
    fn t_deserialize() {
        let c: CircleMarkerFunction = serde_json::from_str(
            r#"{"radius": "feature.r", "style": {"resolved": {"fillColor": "feature.c"}}}"#)
            .unwrap();
        assert_eq!(c.radius, Some(Param::field("r")));
        assert_eq!(c.style, PathStyle::Resolved(PathOptions {
            fill_color: Some(Param::field("c")),
            ..Default::default()
        }));
        let a: AwesomeMarkerFunction = serde_json::from_str(r#"{"spin": true}"#).unwrap();
        assert_eq!(a.spin, Param::bool(true));
        assert_eq!(a.icon, Param::parse("home"));
    }
}
