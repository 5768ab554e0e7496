use ajs::{Js, Stmt};
use itertools::Itertools;

use crate::{dataset::Dataset,
            document::{Component, Fragments, RenderContext, Role},
            error::RenderError,
            filters::chart::declare,
            layout::Layout,
            links,
            trace};

/// Holds the dataset and builds the client side crossfilter index.
/// Widgets bound to it are usually placed below it, so that they end
/// up inside its `<div>`; charts are drawn after all of its children
/// have been set up.
#[derive(Debug, Clone)]
pub struct Crossfilter {
    data: Dataset,
    layout: Layout,
}

impl Crossfilter {
    pub fn new(data: Dataset) -> Self {
        Crossfilter { data, layout: Layout::default() }
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}

impl Component for Crossfilter {
    fn kind(&self) -> &'static str {
        "crossfilter"
    }

    fn role(&self) -> Role {
        Role::Crossfilter
    }

    fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError> {
        ctx.require_figure()?;
        let name = ctx.name()?;
        trace!("{name}: {} rows, fields {}", self.data.len(),
               self.data.rows().first().map(|r| r.keys().join(", ")).unwrap_or_default());
        let cf = || Js::ident(name);

        let mut head = links::head_items(links::CROSSFILTER);
        head.extend(self.layout.style(name));
        Ok(Fragments {
            head,
            body: Some(self.layout.div(name, [])),
            nest_children: true,
            script: vec![
                declare(name),
                Stmt::Assign(cf().dot("data"), self.data.to_js()),
                Stmt::Assign(cf().dot("crossfilter"),
                             Js::ident("crossfilter").call([cf().dot("data")])),
                Stmt::Assign(cf().dot("allDim"),
                             cf().dot("crossfilter").method(
                                 "dimension",
                                 [Js::func(["d"], vec![Stmt::Return(Js::ident("d"))])])),
            ],
            finish: vec![Stmt::Expr(Js::path("dc").method("renderAll", []))],
        })
    }
}
