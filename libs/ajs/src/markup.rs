//! HTML markup IR for the head and body fragments.

use anyhow::Result;
use kstring::KString;

use crate::{Print, Printer, html_escape, myfrom::MyFrom};

#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Element(Element),
    /// Text, escaped on printing.
    Text(KString),
    /// Preformatted HTML (or CSS inside `<style>`), printed verbatim.
    Raw(KString),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attr: Vec<(KString, KString)>,
    pub body: Vec<Markup>,
    /// Void elements like `<link>` have no closing tag.
    pub void: bool,
}

impl Element {
    pub fn attr_value(&self, key: &str) -> Option<&str> {
        self.attr.iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }
}

pub fn att<T, U>(key: T, val: U) -> Option<(KString, KString)>
where KString: MyFrom<T> + MyFrom<U>
{
    Some((KString::myfrom(key), KString::myfrom(val)))
}

pub fn opt_att<T, U>(key: T, val: Option<U>) -> Option<(KString, KString)>
where KString: MyFrom<T> + MyFrom<U>
{
    val.map(|val| (KString::myfrom(key), KString::myfrom(val)))
}

impl Markup {
    pub fn element(
        tag: &'static str,
        void: bool,
        attr: impl IntoIterator<Item = Option<(KString, KString)>>,
        body: impl IntoIterator<Item = Markup>,
    ) -> Markup {
        Markup::Element(Element {
            tag,
            attr: attr.into_iter().flatten().collect(),
            body: body.into_iter().collect(),
            void,
        })
    }

    pub fn text<T>(s: T) -> Markup where KString: MyFrom<T> {
        Markup::Text(KString::myfrom(s))
    }

    pub fn raw<T>(s: T) -> Markup where KString: MyFrom<T> {
        Markup::Raw(KString::myfrom(s))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Markup::Element(e) => Some(e),
            _ => None
        }
    }
}

macro_rules! def_elements {
    { $($name:ident),* } => {
        $(
            pub fn $name(
                attr: impl IntoIterator<Item = Option<(KString, KString)>>,
                body: impl IntoIterator<Item = Markup>,
            ) -> Markup {
                Markup::element(stringify!($name), false, attr, body)
            }
        )*
    }
}

macro_rules! def_void_elements {
    { $($name:ident),* } => {
        $(
            pub fn $name(
                attr: impl IntoIterator<Item = Option<(KString, KString)>>,
            ) -> Markup {
                Markup::element(stringify!($name), true, attr, [])
            }
        )*
    }
}

def_elements! { a, div, h4, small, span, style, script, table, thead, tr, th, title }
def_void_elements! { link, meta }

impl Print for Markup {
    fn print(&self, p: &mut Printer) -> Result<()> {
        match self {
            Markup::Element(e) => e.print(p)?,
            Markup::Text(s) => p.push(&html_escape(s)),
            Markup::Raw(s) => p.push(s),
        }
        Ok(())
    }
}

impl Print for Element {
    fn print(&self, p: &mut Printer) -> Result<()> {
        p.push("<");
        p.push(self.tag);
        for (k, v) in &self.attr {
            p.push(" ");
            p.push(k);
            p.push("=\"");
            p.push(&html_escape(v));
            p.push("\"");
        }
        p.push(">");
        if self.void {
            return Ok(())
        }
        for node in &self.body {
            node.print(p)?;
        }
        p.push("</");
        p.push(self.tag);
        p.push(">");
        Ok(())
    }
}
