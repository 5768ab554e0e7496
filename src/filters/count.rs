use ajs::{Js, Markup, Stmt};
use kstring::KString;
use serde::Deserialize;

use crate::{document::{Component, Fragments, NodeId, RenderContext},
            error::RenderError,
            layout::Layout};

use super::chart::declare;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CountOptions {
    /// HTML in which `{filter}` and `{total}` are replaced by the
    /// number of selected rows and of all rows. `{{` and `}}` stand for
    /// literal braces; other `{...}` text is kept as is.
    pub html_template: KString,
    pub layout: Layout,
}

impl Default for CountOptions {
    fn default() -> Self {
        CountOptions {
            html_template: KString::from_static("{filter}/{total}"),
            layout: Layout::default(),
        }
    }
}

impl CountOptions {
    pub fn new(html_template: &str) -> Self {
        CountOptions { html_template: KString::from_ref(html_template), ..Default::default() }
    }

    pub fn html(&self) -> String {
        let mut out = String::with_capacity(self.html_template.len() + 64);
        let mut rest: &str = &self.html_template;
        while let Some(i) = rest.find(|c| c == '{' || c == '}') {
            out.push_str(&rest[..i]);
            rest = &rest[i..];
            let (replacement, len) = if rest.starts_with("{{") {
                ("{", 2)
            } else if rest.starts_with("}}") {
                ("}", 2)
            } else if rest.starts_with("{filter}") {
                ("<span class=\"filter-count\"></span>", 8)
            } else if rest.starts_with("{total}") {
                ("<span class=\"total-count\"></span>", 7)
            } else {
                (&rest[..1], 1)
            };
            out.push_str(replacement);
            rest = &rest[len..];
        }
        out.push_str(rest);
        out
    }
}

#[derive(Debug, Clone)]
pub struct CountFilter {
    crossfilter: NodeId,
    options: CountOptions,
}

impl CountFilter {
    pub fn new(crossfilter: NodeId, options: CountOptions) -> Self {
        CountFilter { crossfilter, options }
    }
}

impl Component for CountFilter {
    fn kind(&self) -> &'static str {
        "count_filter"
    }

    fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError> {
        ctx.require_figure()?;
        let name = ctx.name()?;
        let cf = Js::ident(ctx.crossfilter_name(self.crossfilter)?).dot("crossfilter");
        let o = &self.options;

        let count = Js::path("dc").method("dataCount", [Js::str(format!("#{name}"))])
            .method("dimension", [cf.clone()])
            .method("group", [cf.method("groupAll", [])]);

        Ok(Fragments {
            head: o.layout.style(name).into_iter().collect(),
            body: Some(o.layout.div(name, [Markup::raw(o.html())])),
            script: vec![
                declare(name),
                Stmt::Assign(Js::ident(name).dot("dataCount"), count),
            ],
            ..Default::default()
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_html() {
        assert_eq!(CountOptions::default().html(),
                   "<span class=\"filter-count\"></span>/<span class=\"total-count\"></span>");
        assert_eq!(CountOptions::new("{filter} selected out of {total} records").html(),
                   "<span class=\"filter-count\"></span> selected out of \
                    <span class=\"total-count\"></span> records");
        assert_eq!(CountOptions::new("no placeholders").html(), "no placeholders");
    }

    #[test]
    fn t_html_braces() {
        assert_eq!(CountOptions::new("{{n}}: {filter}").html(),
                   "{n}: <span class=\"filter-count\"></span>");
        assert_eq!(CountOptions::new("{{filter}}").html(), "{filter}");
        assert_eq!(CountOptions::new("{other} {").html(), "{other} {");
    }
}
