//! CDN links of the client side libraries.

use ajs::ks;

use crate::document::HeadItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Css,
    Js,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub name: &'static str,
    pub kind: LinkKind,
    pub url: &'static str,
}

const fn css(name: &'static str, url: &'static str) -> Link {
    Link { name, kind: LinkKind::Css, url }
}

const fn js(name: &'static str, url: &'static str) -> Link {
    Link { name, kind: LinkKind::Js, url }
}

impl Link {
    pub fn head_item(&self) -> HeadItem {
        match self.kind {
            LinkKind::Css => HeadItem::Stylesheet { name: ks(self.name), url: ks(self.url) },
            LinkKind::Js => HeadItem::Javascript { name: ks(self.name), url: ks(self.url) },
        }
    }
}

pub const LEAFLET: &[Link] = &[
    css("leaflet_css", "https://cdnjs.cloudflare.com/ajax/libs/leaflet/0.7.3/leaflet.css"),
    js("leaflet", "https://cdnjs.cloudflare.com/ajax/libs/leaflet/0.7.3/leaflet.js"),
];

/// Everything the charts need, Leaflet included.
pub const CROSSFILTER: &[Link] = &[
    css("dc_css", "https://cdnjs.cloudflare.com/ajax/libs/dc/1.7.5/dc.css"),
    css("leaflet_css", "https://cdnjs.cloudflare.com/ajax/libs/leaflet/0.7.3/leaflet.css"),
    css("bootstrap_css",
        "https://maxcdn.bootstrapcdn.com/bootstrap/3.2.0/css/bootstrap.min.css"),
    js("d3", "https://cdnjs.cloudflare.com/ajax/libs/d3/3.5.6/d3.min.js"),
    js("crossfilter",
       "https://cdnjs.cloudflare.com/ajax/libs/crossfilter/1.3.12/crossfilter.min.js"),
    js("dc", "https://cdnjs.cloudflare.com/ajax/libs/dc/2.0.0-beta.20/dc.js"),
    js("leaflet", "https://cdnjs.cloudflare.com/ajax/libs/leaflet/0.7.3/leaflet.js"),
    js("underscore",
       "https://cdnjs.cloudflare.com/ajax/libs/underscore.js/1.8.3/underscore-min.js"),
];

pub const HEAT: &[Link] = &[
    js("leaflet_heat", "https://leaflet.github.io/Leaflet.heat/dist/leaflet-heat.js"),
];

pub const MARKER_CLUSTER: &[Link] = &[
    css("marker_cluster_css",
        "https://cdnjs.cloudflare.com/ajax/libs/leaflet.markercluster/0.4.0/MarkerCluster.css"),
    css("marker_cluster_default_css",
        "https://cdnjs.cloudflare.com/ajax/libs/leaflet.markercluster/0.4.0/MarkerCluster.Default.css"),
    js("marker_cluster",
       "https://cdnjs.cloudflare.com/ajax/libs/leaflet.markercluster/0.4.0/leaflet.markercluster.js"),
];

pub const AWESOME_MARKERS: &[Link] = &[
    css("bootstrap_css",
        "https://maxcdn.bootstrapcdn.com/bootstrap/3.2.0/css/bootstrap.min.css"),
    css("font_awesome_css",
        "https://maxcdn.bootstrapcdn.com/font-awesome/4.6.3/css/font-awesome.min.css"),
    css("awesome_markers_css",
        "https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.css"),
    js("awesome_markers",
       "https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.js"),
];

pub fn head_items(links: &[Link]) -> Vec<HeadItem> {
    links.iter().map(Link::head_item).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_unique_names() {
        for links in [LEAFLET, CROSSFILTER, HEAT, MARKER_CLUSTER, AWESOME_MARKERS] {
            for (i, l) in links.iter().enumerate() {
                assert!(links[i + 1..].iter().all(|m| m.name != l.name), "{}", l.name);
            }
        }
    }

    #[test]
    fn t_shared_links_agree() {
        // Same name must mean same url, since the first registration wins.
        let all: Vec<&Link> = [LEAFLET, CROSSFILTER, HEAT, MARKER_CLUSTER, AWESOME_MARKERS]
            .iter().flat_map(|ls| ls.iter()).collect();
        for a in &all {
            for b in &all {
                if a.name == b.name {
                    assert_eq!(a.url, b.url);
                }
            }
        }
    }
}
