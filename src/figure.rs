use ajs::{Markup, att, ks};
use kstring::KString;

use crate::{document::{Component, Fragments, HeadItem, RenderContext, Role},
            error::RenderError};

/// The page: root of every renderable tree.
#[derive(Debug, Clone, Default)]
pub struct Figure {
    title: Option<KString>,
}

impl Figure {
    pub fn new() -> Self {
        Figure { title: None }
    }

    pub fn with_title(title: &str) -> Self {
        Figure { title: Some(ks(title)) }
    }
}

impl Component for Figure {
    fn kind(&self) -> &'static str {
        "figure"
    }

    fn role(&self) -> Role {
        Role::Figure
    }

    fn render(&self, _ctx: &RenderContext) -> Result<Fragments, RenderError> {
        let mut head = vec![HeadItem::Markup {
            name: ks("meta_http"),
            markup: ajs::markup::meta([att("http-equiv", "content-type"),
                                       att("content", "text/html; charset=UTF-8")]),
        }];
        if let Some(title) = &self.title {
            head.push(HeadItem::Markup {
                name: ks("title"),
                markup: ajs::markup::title([], [Markup::text(title)]),
            });
        }
        Ok(Fragments { head, ..Default::default() })
    }
}
