use ajs::{Js, Markup, Stmt, att};
use kstring::KString;
use serde::Deserialize;

use crate::{document::{Component, Fragments, NodeId, RenderContext},
            error::RenderError,
            layout::Layout};

use super::chart::{column_accessor, declare};

/// Options of a `dc.dataTable` listing the currently filtered rows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    pub columns: Vec<KString>,
    /// Maximum number of rows shown.
    pub size: u32,
    pub sort_by: Option<KString>,
    /// Only used together with `sort_by`.
    pub ascending: bool,
    pub layout: Layout,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            columns: Vec::new(),
            size: 10,
            sort_by: None,
            ascending: true,
            layout: Layout::default(),
        }
    }
}

impl TableOptions {
    pub fn new<'s>(columns: impl IntoIterator<Item = &'s str>) -> Self {
        TableOptions {
            columns: columns.into_iter().map(KString::from_ref).collect(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableFilter {
    crossfilter: NodeId,
    options: TableOptions,
}

impl TableFilter {
    pub fn new(crossfilter: NodeId, options: TableOptions) -> Self {
        TableFilter { crossfilter, options }
    }
}

impl Component for TableFilter {
    fn kind(&self) -> &'static str {
        "table_filter"
    }

    fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError> {
        ctx.require_figure()?;
        let name = ctx.name()?;
        let cf = ctx.crossfilter_name(self.crossfilter)?;
        let o = &self.options;

        let body = ajs::markup::table(
            [att("id", name), o.layout.class_att(None)],
            [ajs::markup::thead([], [
                ajs::markup::tr(
                    [att("class", "header")],
                    o.columns.iter().map(|c| ajs::markup::th([], [Markup::text(c)])))
            ])]);

        let mut table = Js::ident(name).dot("dataTable")
            .method("dimension", [Js::ident(cf).dot("allDim")])
            .method("group", [Js::func(["d"], vec![Stmt::Return(Js::str("dc.js extra line"))])])
            .method("size", [Js::num(o.size)])
            .method("columns", [Js::array(o.columns.iter().map(|c| column_accessor(c)))]);
        if let Some(sort_by) = &o.sort_by {
            table = table
                .method("sortBy", [Js::path("dc").method("pluck", [Js::str(sort_by)])])
                .method("order", [Js::path(if o.ascending { "d3.ascending" }
                                           else { "d3.descending" })]);
        }
        // drop the group header rows
        table = table.method("on", [
            Js::str("renderlet"),
            Js::func(["table"], vec![Stmt::Expr(
                Js::ident("table").method("select", [Js::str("tr.dc-table-group")])
                    .method("remove", []))]),
        ]);

        Ok(Fragments {
            head: o.layout.style(name).into_iter().collect(),
            body: Some(body),
            script: vec![
                declare(name),
                Stmt::Assign(Js::ident(name).dot("dataTable"),
                             Js::path("dc").method("dataTable", [Js::str(format!("#{name}"))])),
                Stmt::Expr(table),
            ],
            ..Default::default()
        })
    }
}
