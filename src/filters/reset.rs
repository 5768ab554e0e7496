use ajs::{Js, Markup, Stmt, att};
use kstring::KString;
use serde::Deserialize;

use crate::{document::{Component, Fragments, RenderContext},
            error::RenderError,
            layout::Layout};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResetOptions {
    /// Link content, inserted as HTML.
    pub html: KString,
    pub layout: Layout,
}

impl Default for ResetOptions {
    fn default() -> Self {
        ResetOptions { html: KString::from_static("Reset all"), layout: Layout::default() }
    }
}

/// A link clearing the filters of all charts. Every reset link on the
/// page triggers the same handler.
#[derive(Debug, Clone, Default)]
pub struct ResetFilter {
    options: ResetOptions,
}

impl ResetFilter {
    pub fn new(options: ResetOptions) -> Self {
        ResetFilter { options }
    }
}

impl Component for ResetFilter {
    fn kind(&self) -> &'static str {
        "reset_filter"
    }

    fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError> {
        ctx.require_figure()?;
        let name = ctx.name()?;
        let o = &self.options;

        let handler = Js::path("d3").method("selectAll", [Js::str(".reset-filters")])
            .method("on", [
                Js::str("click"),
                Js::func::<&str>([], vec![
                    Stmt::Expr(Js::path("dc").method("filterAll", [])),
                    Stmt::Expr(Js::path("dc").method("renderAll", [])),
                ]),
            ]);

        Ok(Fragments {
            head: o.layout.style(name).into_iter().collect(),
            body: Some(ajs::markup::a(
                [att("id", name), o.layout.class_att(Some("reset-filters"))],
                [Markup::raw(&o.html)])),
            script: vec![Stmt::Expr(handler)],
            ..Default::default()
        })
    }
}
