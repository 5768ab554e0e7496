//! Building a document from a JSON description.

use std::{fs::File, io::BufReader, path::{Path, PathBuf}};

use anyhow::{anyhow, Context, Result};
use kstring::KString;
use serde::Deserialize;

use crate::{crossfilter::Crossfilter,
            dataset::Dataset,
            document::{Document, NodeId},
            figure::Figure,
            filters::{bar::{BarFilter, BarOptions},
                      count::{CountFilter, CountOptions},
                      geo_choropleth::{GeoChoroplethFilter, GeoChoroplethOptions},
                      pie::{PieFilter, PieOptions},
                      reset::{ResetFilter, ResetOptions},
                      row_bar::{RowBarFilter, RowBarOptions},
                      table::{TableFilter, TableOptions}},
            layout::Layout,
            map::{Map, MapOptions},
            marker_function::{AwesomeMarkerFunction, CircleMarkerFunction, MarkerFunction},
            overlay::{FeatureGroupFilter, FeatureGroupOptions, HeatmapFilter, HeatmapOptions,
                      MarkerClusterFilter, MarkerClusterOptions},
            warn};

/// Inline rows, or the path of a JSON file holding them (relative to
/// the configuration file).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DataSource {
    Rows(Dataset),
    Path(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerConfig {
    Marker(MarkerFunction),
    Circle(CircleMarkerFunction),
    Awesome(AwesomeMarkerFunction),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetConfig {
    Pie(PieOptions),
    RowBar(RowBarOptions),
    Bar(BarOptions),
    GeoChoropleth(GeoChoroplethOptions),
    Table(TableOptions),
    Count(CountOptions),
    Reset(ResetOptions),
    FeatureGroup {
        #[serde(default)]
        fit_bounds: bool,
        #[serde(default)]
        marker: Option<MarkerConfig>,
    },
    MarkerCluster {
        #[serde(default)]
        fit_bounds: bool,
        #[serde(default)]
        cluster_options: Option<serde_json::Map<String, serde_json::Value>>,
        #[serde(default)]
        marker: Option<MarkerConfig>,
    },
    Heatmap(HeatmapOptions),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub title: Option<KString>,
    pub data: DataSource,
    #[serde(default)]
    pub layout: Option<Layout>,
    /// Required by the map overlay widgets.
    #[serde(default)]
    pub map: Option<MapOptions>,
    #[serde(default)]
    pub widgets: Vec<WidgetConfig>,
}

impl DashboardConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let f = File::open(path).with_context(|| format!("opening {path:?}"))?;
        serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parsing {path:?}"))
    }
}

fn load_data(source: DataSource, base_dir: &Path) -> Result<Dataset> {
    match source {
        DataSource::Rows(d) => Ok(d),
        DataSource::Path(p) => {
            let path = base_dir.join(p);
            let f = File::open(&path).with_context(|| format!("opening {path:?}"))?;
            Dataset::from_reader(BufReader::new(f)).with_context(|| format!("in {path:?}"))
        }
    }
}

fn add_marker(doc: &mut Document, overlay: NodeId, marker: Option<MarkerConfig>) -> Result<()> {
    match marker {
        None => (),
        Some(MarkerConfig::Marker(m)) => { doc.add_to(overlay, m)?; }
        Some(MarkerConfig::Circle(m)) => { doc.add_to(overlay, m)?; }
        Some(MarkerConfig::Awesome(m)) => { doc.add_to(overlay, m)?; }
    }
    Ok(())
}

/// Build the tree `Figure > Crossfilter > (Map > overlays, widgets)`
/// and return it with the figure's id. `base_dir` is where relative
/// data paths are looked up.
pub fn build_document(config: DashboardConfig, base_dir: &Path) -> Result<(Document, NodeId)> {
    let data = load_data(config.data, base_dir)?;
    if data.is_empty() {
        warn!("dashboard {:?} has no rows, charts will be empty",
              config.title.as_deref().unwrap_or(""));
    }
    let mut doc = Document::new();
    let figure = doc.add(match &config.title {
        Some(t) => Figure::with_title(t),
        None => Figure::new(),
    });
    let mut crossfilter = Crossfilter::new(data);
    if let Some(layout) = config.layout {
        crossfilter = crossfilter.with_layout(layout);
    }
    let cf = doc.add_to(figure, crossfilter)?;
    let map = match config.map {
        Some(options) => Some(doc.add_to(cf, Map::new(options))?),
        None => None,
    };
    let need_map = |kind: &str| {
        map.ok_or_else(|| anyhow!("a {kind} widget needs a \"map\" entry in the configuration"))
    };

    for widget in config.widgets {
        match widget {
            WidgetConfig::Pie(o) => { doc.add_to(cf, PieFilter::new(cf, o))?; }
            WidgetConfig::RowBar(o) => { doc.add_to(cf, RowBarFilter::new(cf, o))?; }
            WidgetConfig::Bar(o) => { doc.add_to(cf, BarFilter::new(cf, o))?; }
            WidgetConfig::GeoChoropleth(o) => {
                doc.add_to(cf, GeoChoroplethFilter::new(cf, o))?;
            }
            WidgetConfig::Table(o) => { doc.add_to(cf, TableFilter::new(cf, o))?; }
            WidgetConfig::Count(o) => { doc.add_to(cf, CountFilter::new(cf, o))?; }
            WidgetConfig::Reset(o) => { doc.add_to(cf, ResetFilter::new(o))?; }
            WidgetConfig::FeatureGroup { fit_bounds, marker } => {
                let overlay = doc.add_to(need_map("feature_group")?, FeatureGroupFilter::new(
                    cf, FeatureGroupOptions { fit_bounds }))?;
                add_marker(&mut doc, overlay, marker)?;
            }
            WidgetConfig::MarkerCluster { fit_bounds, cluster_options, marker } => {
                let overlay = doc.add_to(need_map("marker_cluster")?, MarkerClusterFilter::new(
                    cf, MarkerClusterOptions { fit_bounds, cluster_options }))?;
                add_marker(&mut doc, overlay, marker)?;
            }
            WidgetConfig::Heatmap(o) => {
                doc.add_to(need_map("heatmap")?, HeatmapFilter::new(cf, o))?;
            }
        }
    }
    Ok((doc, figure))
}

/// `build_document` followed by rendering to a complete page.
pub fn render_html(config: DashboardConfig, base_dir: &Path) -> Result<String> {
    let (doc, figure) = build_document(config, base_dir)?;
    doc.render(figure)?.to_html()
}


#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "title": "Fruit",
        "data": [{"fruit": "apple", "n": 3, "lat": 48.1, "lng": 11.5}],
        "map": {"location": [48, 11], "zoom_start": 6},
        "widgets": [
            {"type": "pie", "column": "fruit", "title": "Fruit", "order": ["pear", "apple"]},
            {"type": "bar", "column": "n", "domain": [0, 10], "groupby": 2},
            {"type": "count", "html_template": "{filter} of {total}"},
            {"type": "reset"},
            {"type": "feature_group", "fit_bounds": true,
             "marker": {"kind": "circle", "radius": 5, "popup": "fruit"}},
            {"type": "heatmap", "intensity": "n"}
        ]
    }"#;

    #[test]
    fn t_parse() {
        let c = DashboardConfig::from_json_str(CONFIG).unwrap();
        assert_eq!(c.title.as_deref(), Some("Fruit"));
        assert!(matches!(&c.data, DataSource::Rows(d) if d.len() == 1));
        assert_eq!(c.widgets.len(), 6);
        match &c.widgets[1] {
            WidgetConfig::Bar(o) => {
                assert_eq!(o.domain, [0., 10.]);
                assert_eq!(o.groupby, 2.);
                assert_eq!(o.width, 150);
            }
            w => panic!("{w:?}")
        }
        match &c.widgets[4] {
            WidgetConfig::FeatureGroup { fit_bounds: true, marker: Some(MarkerConfig::Circle(m)) } =>
                assert_eq!(m.popup.as_deref(), Some("fruit")),
            w => panic!("{w:?}")
        }
    }

    #[test]
    fn t_build() {
        let c = DashboardConfig::from_json_str(CONFIG).unwrap();
        let (doc, figure) = build_document(c, Path::new(".")).unwrap();
        // figure, crossfilter, map, 4 widgets, 2 overlays, 1 marker function
        assert_eq!(doc.len(), 10);
        let html = doc.render(figure).unwrap().to_html().unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Fruit</title>"));
        assert!(html.contains("dc.renderAll();"));
        assert!(html.contains("leaflet-heat.js"));
    }

    #[test]
    fn t_overlay_without_map() {
        let c = DashboardConfig::from_json_str(
            r#"{"data": [], "widgets": [{"type": "heatmap"}]}"#).unwrap();
        let e = build_document(c, Path::new(".")).unwrap_err();
        assert!(e.to_string().contains("heatmap"));
    }

    #[test]
    fn t_unknown_widget() {
        assert!(DashboardConfig::from_json_str(
            r#"{"data": [], "widgets": [{"type": "sunburst"}]}"#).is_err());
    }
}
