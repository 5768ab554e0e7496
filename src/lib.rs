//! Linked crossfilter charts and Leaflet map overlays, rendered to
//! HTML and JavaScript for dc.js, crossfilter.js and Leaflet.

pub mod warn;
pub mod error;
pub mod document;
pub mod layout;
pub mod links;
pub mod param;
pub mod dataset;
pub mod figure;
pub mod crossfilter;
pub mod filters {
    pub mod chart;
    pub mod pie;
    pub mod row_bar;
    pub mod bar;
    pub mod geo_choropleth;
    pub mod table;
    pub mod count;
    pub mod reset;
}
pub mod map;
pub mod overlay;
pub mod marker_function;
pub mod dashboard;

pub use document::{Component, Document, Fragments, HeadItem, NodeId, RenderContext,
                   RenderedDocument, Role};
pub use error::RenderError;
