//! The element tree: an arena of components with generated names,
//! and the render pass that collects their fragments.

use std::{collections::HashSet,
          fmt::Debug,
          sync::atomic::{AtomicU32, Ordering}};

use ajs::{Markup, Print, Printer, Stmt, ks};
use anyhow::Result;
use kstring::KString;
use rand::Rng;

use crate::{error::RenderError, structural_bail, trace};

/// What a node is, as far as other nodes binding to it care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Figure,
    Crossfilter,
    Map,
    Widget,
    /// A map layer drawing one marker per row through its
    /// `marker_function`; the parent of marker functions.
    MarkerOverlay,
    /// Any other map layer.
    Overlay,
    MarkerFunction,
}

pub trait Component: Debug {
    /// Prefix for the generated node name, e.g. `"pie_filter"`.
    fn kind(&self) -> &'static str;

    fn role(&self) -> Role {
        Role::Widget
    }

    fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError>;
}

/// An entry for the document head. Entries are deduplicated by name.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadItem {
    Stylesheet { name: KString, url: KString },
    Javascript { name: KString, url: KString },
    Markup { name: KString, markup: Markup },
}

impl HeadItem {
    pub fn name(&self) -> &str {
        match self {
            HeadItem::Stylesheet { name, .. } => name,
            HeadItem::Javascript { name, .. } => name,
            HeadItem::Markup { name, .. } => name,
        }
    }

    pub fn to_markup(&self) -> Markup {
        match self {
            HeadItem::Stylesheet { url, .. } =>
                ajs::markup::link([ajs::att("rel", "stylesheet"), ajs::att("href", url)]),
            HeadItem::Javascript { url, .. } =>
                ajs::markup::script([ajs::att("src", url)], []),
            HeadItem::Markup { markup, .. } => markup.clone(),
        }
    }
}

/// What a single component contributes to the document.
#[derive(Debug, Default)]
pub struct Fragments {
    pub head: Vec<HeadItem>,
    pub body: Option<Markup>,
    /// Put the children's markup inside `body` (if it is an element)
    /// instead of after it.
    pub nest_children: bool,
    /// Emitted before the children's scripts.
    pub script: Vec<Stmt>,
    /// Emitted after the children's scripts.
    pub finish: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    docid: u32,
    index: u32,
}

#[derive(Debug)]
struct Slot {
    name: KString,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    component: Box<dyn Component>,
}

static NEXT_DOCUMENT_ID: AtomicU32 = AtomicU32::new(0);

fn generate_name(kind: &str) -> KString {
    let n: u128 = rand::thread_rng().gen();
    KString::from_string(format!("{kind}_{n:032x}"))
}

#[derive(Debug)]
pub struct Document {
    docid: u32,
    slots: Vec<Slot>,
    names: HashSet<KString>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Document {
            docid: NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            names: HashSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Store a new, detached node.
    pub fn add(&mut self, component: impl Component + 'static) -> NodeId {
        let mut name = generate_name(component.kind());
        while self.names.contains(&name) {
            name = generate_name(component.kind());
        }
        self.names.insert(name.clone());
        let id = NodeId { docid: self.docid, index: self.slots.len() as u32 };
        self.slots.push(Slot {
            name,
            parent: None,
            children: Vec::new(),
            component: Box::new(component),
        });
        id
    }

    fn slot(&self, id: NodeId) -> Result<&Slot, RenderError> {
        if id.docid != self.docid {
            return Err(RenderError::ForeignNode(ks(format!("{id:?}"))))
        }
        self.slots.get(id.index as usize)
            .ok_or_else(|| RenderError::ForeignNode(ks(format!("{id:?}"))))
    }

    /// Attach `child` as the last child of `parent`. A node can only
    /// have one parent, and cycles are refused.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), RenderError> {
        if let Some(p) = self.slot(child)?.parent {
            structural_bail!("{} already has parent {}",
                             self.get_name(child)?, self.get_name(p)?)
        }
        let mut ancestor = Some(parent);
        while let Some(a) = ancestor {
            if a == child {
                structural_bail!("attaching {} below {} would create a cycle",
                                 self.get_name(child)?, self.get_name(parent)?)
            }
            ancestor = self.slot(a)?.parent;
        }
        self.slots[child.index as usize].parent = Some(parent);
        self.slots[parent.index as usize].children.push(child);
        Ok(())
    }

    /// `add` followed by `add_child`.
    pub fn add_to(
        &mut self,
        parent: NodeId,
        component: impl Component + 'static
    ) -> Result<NodeId, RenderError> {
        self.slot(parent)?;
        let id = self.add(component);
        self.add_child(parent, id)?;
        Ok(id)
    }

    pub fn get_name(&self, id: NodeId) -> Result<&str, RenderError> {
        Ok(&self.slot(id)?.name)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, RenderError> {
        Ok(self.slot(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], RenderError> {
        Ok(&self.slot(id)?.children)
    }

    pub fn role(&self, id: NodeId) -> Result<Role, RenderError> {
        Ok(self.slot(id)?.component.role())
    }

    pub fn get_root(&self, id: NodeId) -> Result<NodeId, RenderError> {
        let mut id = id;
        while let Some(p) = self.slot(id)?.parent {
            id = p;
        }
        Ok(id)
    }

    /// Render the tree below `id` (usually a `Figure`), parent before
    /// children.
    pub fn render(&self, id: NodeId) -> Result<RenderedDocument, RenderError> {
        let mut out = RenderedDocument::default();
        let body = self.render_node(id, &mut out)?;
        out.body = body;
        Ok(out)
    }

    fn render_node(
        &self,
        id: NodeId,
        out: &mut RenderedDocument
    ) -> Result<Vec<Markup>, RenderError> {
        let slot = self.slot(id)?;
        trace!("render {}", slot.name);
        let ctx = RenderContext { doc: self, id };
        let fragments = slot.component.render(&ctx)?;
        for item in fragments.head {
            out.add_head(item);
        }
        out.script.extend(fragments.script);
        let mut child_bodies = Vec::new();
        for child in &slot.children {
            child_bodies.extend(self.render_node(*child, out)?);
        }
        out.script.extend(fragments.finish);
        Ok(match fragments.body {
            Some(Markup::Element(mut e)) if fragments.nest_children => {
                e.body.extend(child_bodies);
                vec![Markup::Element(e)]
            }
            Some(m) => {
                let mut v = vec![m];
                v.extend(child_bodies);
                v
            }
            None => child_bodies,
        })
    }
}


/// Access to the tree for a component while it renders.
pub struct RenderContext<'d> {
    doc: &'d Document,
    id: NodeId,
}

impl<'d> RenderContext<'d> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The generated name of the node being rendered.
    pub fn name(&self) -> Result<&'d str, RenderError> {
        self.doc.get_name(self.id)
    }

    /// Fails unless the root ancestor is a `Figure`.
    pub fn require_figure(&self) -> Result<(), RenderError> {
        let root = self.doc.get_root(self.id)?;
        if self.doc.role(root)? != Role::Figure {
            structural_bail!("cannot render {} outside of a Figure (root is {})",
                             self.name()?, self.doc.get_name(root)?)
        }
        Ok(())
    }

    pub fn parent(&self) -> Result<NodeId, RenderError> {
        match self.doc.parent(self.id)? {
            Some(p) => Ok(p),
            None => structural_bail!("{} has no parent", self.name()?)
        }
    }

    /// The name of the parent, which must have role `role`.
    pub fn parent_name_with_role(&self, role: Role) -> Result<&'d str, RenderError> {
        let parent = self.parent()?;
        let actual = self.doc.role(parent)?;
        if actual != role {
            structural_bail!("{} must be attached to a {role:?}, not to {} ({actual:?})",
                             self.name()?, self.doc.get_name(parent)?)
        }
        self.doc.get_name(parent)
    }

    /// The name of the crossfilter `id` this widget is bound to.
    pub fn crossfilter_name(&self, id: NodeId) -> Result<&'d str, RenderError> {
        let role = self.doc.role(id)?;
        if role != Role::Crossfilter {
            structural_bail!("{} is bound to {} which is a {role:?}, not a Crossfilter",
                             self.name()?, self.doc.get_name(id)?)
        }
        self.doc.get_name(id)
    }
}


fn print_section(p: &mut Printer, tag: &str, items: &dyn Print) -> Result<()> {
    p.push("<");
    p.push(tag);
    p.push(">");
    p.indented(|p| {
        p.newline();
        items.print(p)
    })?;
    p.newline();
    p.push("</");
    p.push(tag);
    p.push(">");
    p.newline();
    Ok(())
}

/// The collected fragments of one render pass.
#[derive(Debug, Default)]
pub struct RenderedDocument {
    pub head: Vec<HeadItem>,
    pub body: Vec<Markup>,
    pub script: Vec<Stmt>,
}

impl RenderedDocument {
    fn add_head(&mut self, item: HeadItem) {
        if self.head.iter().any(|h| h.name() == item.name()) {
            trace!("head item {:?} already present", item.name());
        } else {
            self.head.push(item);
        }
    }

    pub fn head_item(&self, name: &str) -> Option<&HeadItem> {
        self.head.iter().find(|h| h.name() == name)
    }

    pub fn body_html(&self) -> Result<String> {
        self.body.to_code_string()
    }

    pub fn script_js(&self) -> Result<String> {
        self.script.to_code_string()
    }

    /// The complete HTML page.
    pub fn to_html(&self) -> Result<String> {
        let mut p = Printer::new();
        p.push("<!DOCTYPE html>");
        p.newline();
        let head: Vec<Markup> = self.head.iter().map(HeadItem::to_markup).collect();
        print_section(&mut p, "head", &head)?;
        print_section(&mut p, "body", &self.body)?;
        print_section(&mut p, "script", &self.script)?;
        Ok(p.finish())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Probe(&'static str, Role);

    impl Component for Probe {
        fn kind(&self) -> &'static str {
            self.0
        }
        fn role(&self) -> Role {
            self.1
        }
        fn render(&self, ctx: &RenderContext) -> Result<Fragments, RenderError> {
            let name = ctx.name()?;
            Ok(Fragments {
                head: vec![HeadItem::Javascript { name: ks("shared"), url: ks(name) }],
                body: Some(ajs::markup::div([ajs::att("id", name)], [])),
                nest_children: true,
                script: vec![Stmt::Expr(Js::ident("open").call([Js::str(name)]))],
                finish: vec![Stmt::Expr(Js::ident("close").call([Js::str(name)]))],
            })
        }
    }

    use ajs::Js;

    #[test]
    fn t_names() {
        let mut doc = Document::new();
        let a = doc.add(Probe("probe", Role::Widget));
        let b = doc.add(Probe("probe", Role::Widget));
        let na = doc.get_name(a).unwrap();
        assert!(na.starts_with("probe_"));
        assert_eq!(na.len(), "probe_".len() + 32);
        assert_ne!(na, doc.get_name(b).unwrap());
    }

    #[test]
    fn t_add_child() {
        let mut doc = Document::new();
        let a = doc.add(Probe("a", Role::Figure));
        let b = doc.add_to(a, Probe("b", Role::Widget)).unwrap();
        let c = doc.add_to(b, Probe("c", Role::Widget)).unwrap();
        assert_eq!(doc.parent(c).unwrap(), Some(b));
        assert_eq!(doc.children(a).unwrap(), &[b]);
        assert_eq!(doc.get_root(c).unwrap(), a);
        // second parent
        assert!(doc.add_child(a, c).unwrap_err().is_structural());
        // cycle
        assert!(doc.add_child(c, a).unwrap_err().is_structural());
        assert!(doc.add_child(a, a).unwrap_err().is_structural());
    }

    #[test]
    fn t_foreign_node() {
        let mut doc1 = Document::new();
        let mut doc2 = Document::new();
        let a = doc1.add(Probe("a", Role::Figure));
        doc2.add(Probe("a", Role::Figure));
        assert!(matches!(doc2.get_name(a), Err(RenderError::ForeignNode(_))));
    }

    #[test]
    fn t_render_order() {
        let mut doc = Document::new();
        let a = doc.add(Probe("a", Role::Figure));
        let b = doc.add_to(a, Probe("b", Role::Widget)).unwrap();
        let c = doc.add_to(a, Probe("c", Role::Widget)).unwrap();
        let (na, nb, nc) = (doc.get_name(a).unwrap(), doc.get_name(b).unwrap(),
                            doc.get_name(c).unwrap());
        let out = doc.render(a).unwrap();
        let calls: Vec<String> = out.script.iter()
            .map(|s| s.to_code_string().unwrap())
            .collect();
        assert_eq!(calls, vec![
            format!("open(\"{na}\");"),
            format!("open(\"{nb}\");"),
            format!("close(\"{nb}\");"),
            format!("open(\"{nc}\");"),
            format!("close(\"{nc}\");"),
            format!("close(\"{na}\");"),
        ]);
        // first registration of a head name wins
        assert_eq!(out.head.len(), 1);
        assert_eq!(out.head_item("shared"),
                   Some(&HeadItem::Javascript { name: ks("shared"), url: ks(na) }));
        assert_eq!(out.body_html().unwrap(),
                   format!("<div id=\"{na}\"><div id=\"{nb}\"></div><div id=\"{nc}\"></div></div>"));
    }

    #[test]
    fn t_require_figure() {
        let mut doc = Document::new();
        let a = doc.add(Probe("a", Role::Crossfilter));
        let b = doc.add_to(a, Probe("b", Role::Widget)).unwrap();
        let ctx = RenderContext { doc: &doc, id: b };
        assert!(ctx.require_figure().unwrap_err().is_structural());
        assert_eq!(ctx.crossfilter_name(a).unwrap(), doc.get_name(a).unwrap());
        assert!(ctx.crossfilter_name(b).unwrap_err().is_structural());
        assert!(ctx.parent_name_with_role(Role::Map).unwrap_err().is_structural());
    }
}
