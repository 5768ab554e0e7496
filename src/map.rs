//! A minimal Leaflet map for the overlay widgets to draw on.

use ajs::{Js, Stmt, ks};
use kstring::KString;
use serde::Deserialize;

use crate::{document::{Component, Fragments, RenderContext, Role},
            error::RenderError,
            layout::Layout,
            links};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// `[lat, lng]` of the initial center.
    pub location: [f64; 2],
    pub zoom_start: u32,
    /// Tile url template.
    pub tiles: KString,
    pub attribution: KString,
    pub max_zoom: u32,
    pub layout: Layout,
}

impl Default for MapOptions {
    fn default() -> Self {
        MapOptions {
            location: [0., 0.],
            zoom_start: 10,
            tiles: KString::from_static("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"),
            attribution: KString::from_static(
                "Data by <a href=\"http://openstreetmap.org\">OpenStreetMap</a>, under \
                 <a href=\"http://www.openstreetmap.org/copyright\">ODbL</a>."),
            max_zoom: 18,
            layout: Layout::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Map {
    options: MapOptions,
}

impl Map {
    pub fn new(options: MapOptions) -> Self {
        Map { options }
    }
}

impl Component for Map {
    fn kind(&self) -> &'static str {
        "map"
    }

    fn role(&self) -> Role {
        Role::Map
    }

    fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError> {
        ctx.require_figure()?;
        let name = ctx.name()?;
        let o = &self.options;
        let [lat, lng] = o.location;

        let mut head = links::head_items(links::LEAFLET);
        head.extend(o.layout.style(name));
        Ok(Fragments {
            head,
            body: Some(ajs::markup::div(
                [ajs::att("id", name), o.layout.class_att(Some("crossmap-map"))], [])),
            script: vec![
                Stmt::Var(ks(name), Js::path("L").method("map", [
                    Js::str(name),
                    Js::object([("center", Js::array([Js::num(lat), Js::num(lng)])),
                                ("zoom", Js::num(o.zoom_start))]),
                ])),
                Stmt::Expr(Js::path("L").method("tileLayer", [
                    Js::str(&o.tiles),
                    Js::object([("maxZoom", Js::num(o.max_zoom)),
                                ("attribution", Js::str(&o.attribution))]),
                ]).method("addTo", [Js::ident(name)])),
            ],
            ..Default::default()
        })
    }
}
