//! JavaScript expression and statement IR.
//!
//! Values are always carried as typed nodes (strings as `Str`, data as
//! `Json`, ...) and only turned into source text by `Print`, so that
//! quoting and escaping happen in exactly one place. `Raw` is for
//! fixed snippets and user supplied expressions.

use anyhow::Result;
use itertools::Itertools;
use kstring::KString;

use crate::{Print, Printer, js_string, js_json, is_identifier, myfrom::MyFrom};

#[derive(Debug, Clone, PartialEq)]
pub enum Js {
    /// A variable or global name, e.g. `dc`, `d`, `Infinity`.
    Ident(KString),
    /// Verbatim expression text.
    Raw(KString),
    Null,
    Bool(bool),
    Num(f64),
    Str(KString),
    Json(serde_json::Value),
    Array(Vec<Js>),
    Object(Vec<(KString, Js)>),
    Member(Box<Js>, KString),
    Index(Box<Js>, Box<Js>),
    Call(Box<Js>, Vec<Js>),
    New(Box<Js>, Vec<Js>),
    Binary(Box<Js>, &'static str, Box<Js>),
    Function(Vec<KString>, Vec<Stmt>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Var(KString, Js),
    Assign(Js, Js),
    Expr(Js),
    Return(Js),
    If(Js, Vec<Stmt>),
    /// `for (var v = init; cond; update) {body}`
    For {
        var: KString,
        init: Js,
        cond: Js,
        update: Js,
        body: Vec<Stmt>,
    },
    /// `for (var v in obj) {body}`
    ForIn(KString, Js, Vec<Stmt>),
}

impl Js {
    pub fn ident<T>(s: T) -> Js where KString: MyFrom<T> {
        Js::Ident(KString::myfrom(s))
    }

    /// A dotted path like `cf.crossfilter` as nested member accesses.
    pub fn path(s: &str) -> Js {
        let mut parts = s.split('.');
        let first = Js::ident(parts.next().unwrap_or(""));
        parts.fold(first, |e, part| e.dot(part))
    }

    pub fn raw<T>(s: T) -> Js where KString: MyFrom<T> {
        Js::Raw(KString::myfrom(s))
    }

    pub fn str<T>(s: T) -> Js where KString: MyFrom<T> {
        Js::Str(KString::myfrom(s))
    }

    pub fn num(n: impl Into<f64>) -> Js {
        Js::Num(n.into())
    }

    pub fn array(items: impl IntoIterator<Item = Js>) -> Js {
        Js::Array(items.into_iter().collect())
    }

    pub fn object<K>(items: impl IntoIterator<Item = (K, Js)>) -> Js
    where KString: MyFrom<K>
    {
        Js::Object(items.into_iter().map(|(k, v)| (KString::myfrom(k), v)).collect())
    }

    pub fn func<P>(params: impl IntoIterator<Item = P>, body: Vec<Stmt>) -> Js
    where KString: MyFrom<P>
    {
        Js::Function(params.into_iter().map(KString::myfrom).collect(), body)
    }

    /// `new callee(args)`
    pub fn new_(callee: Js, args: impl IntoIterator<Item = Js>) -> Js {
        Js::New(Box::new(callee), args.into_iter().collect())
    }

    /// `row["field"]`
    pub fn field(row: &str, field: &str) -> Js {
        Js::ident(row).index(Js::str(field))
    }

    pub fn dot<T>(self, name: T) -> Js where KString: MyFrom<T> {
        Js::Member(Box::new(self), KString::myfrom(name))
    }

    pub fn index(self, key: Js) -> Js {
        Js::Index(Box::new(self), Box::new(key))
    }

    pub fn call(self, args: impl IntoIterator<Item = Js>) -> Js {
        Js::Call(Box::new(self), args.into_iter().collect())
    }

    /// `self.name(args)`
    pub fn method<T>(self, name: T, args: impl IntoIterator<Item = Js>) -> Js
    where KString: MyFrom<T>
    {
        self.dot(name).call(args)
    }

    pub fn op(self, op: &'static str, rhs: Js) -> Js {
        Js::Binary(Box::new(self), op, Box::new(rhs))
    }

    fn needs_parens(&self, postfix: bool) -> bool {
        match self {
            Js::Binary(..) | Js::Function(..) | Js::Raw(_) => true,
            // `1.x` would not parse
            Js::Num(_) => postfix,
            _ => false
        }
    }

    /// Print as the operand of a binary operator.
    fn print_operand(&self, p: &mut Printer) -> Result<()> {
        self.print_parenthesized(self.needs_parens(false), p)
    }

    /// Print as the target of a member access, index or call.
    fn print_target(&self, p: &mut Printer) -> Result<()> {
        self.print_parenthesized(self.needs_parens(true), p)
    }

    fn print_parenthesized(&self, parens: bool, p: &mut Printer) -> Result<()> {
        if parens {
            p.push("(");
            self.print(p)?;
            p.push(")");
            Ok(())
        } else {
            self.print(p)
        }
    }
}

fn print_list(items: &[Js], p: &mut Printer) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            p.push(", ");
        }
        item.print(p)?;
    }
    Ok(())
}

fn print_block(body: &[Stmt], p: &mut Printer) -> Result<()> {
    p.push("{");
    p.indented(|p| {
        for stmt in body {
            p.newline();
            stmt.print(p)?;
        }
        Ok(())
    })?;
    p.newline();
    p.push("}");
    Ok(())
}

fn print_number(n: f64, p: &mut Printer) {
    if n.is_nan() {
        p.push("NaN")
    } else if n.is_infinite() {
        p.push(if n > 0. { "Infinity" } else { "-Infinity" })
    } else {
        p.push(&n.to_string())
    }
}

impl Print for Js {
    fn print(&self, p: &mut Printer) -> Result<()> {
        match self {
            Js::Ident(s) | Js::Raw(s) => p.push(s),
            Js::Null => p.push("null"),
            Js::Bool(b) => p.push(if *b { "true" } else { "false" }),
            Js::Num(n) => print_number(*n, p),
            Js::Str(s) => p.push(&js_string(s)?),
            Js::Json(v) => p.push(&js_json(v)?),
            Js::Array(items) => {
                p.push("[");
                print_list(items, p)?;
                p.push("]");
            }
            Js::Object(items) => {
                p.push("{");
                for (i, (k, v)) in items.iter().enumerate() {
                    p.push(if i > 0 { ", " } else { "" });
                    if is_identifier(k) {
                        p.push(k);
                    } else {
                        p.push(&js_string(k)?);
                    }
                    p.push(": ");
                    v.print(p)?;
                }
                p.push("}");
            }
            Js::Member(target, name) => {
                target.print_target(p)?;
                if let Js::Call(..) = **target {
                    // method chains get one call per line
                    p.indented(|p| {
                        p.newline();
                        Ok(())
                    })?;
                }
                p.push(".");
                p.push(name);
            }
            Js::Index(target, key) => {
                target.print_target(p)?;
                p.push("[");
                key.print(p)?;
                p.push("]");
            }
            Js::Call(callee, args) => {
                callee.print_target(p)?;
                p.push("(");
                print_list(args, p)?;
                p.push(")");
            }
            Js::New(callee, args) => {
                p.push("new ");
                callee.print_target(p)?;
                p.push("(");
                print_list(args, p)?;
                p.push(")");
            }
            Js::Binary(l, op, r) => {
                l.print_operand(p)?;
                p.push(" ");
                p.push(op);
                p.push(" ");
                r.print_operand(p)?;
            }
            Js::Function(params, body) => {
                p.push("function (");
                p.push(&params.iter().join(", "));
                p.push(") ");
                print_block(body, p)?;
            }
        }
        Ok(())
    }
}

impl Print for Stmt {
    fn print(&self, p: &mut Printer) -> Result<()> {
        match self {
            Stmt::Var(name, e) => {
                p.push("var ");
                p.push(name);
                p.push(" = ");
                e.print(p)?;
                p.push(";");
            }
            Stmt::Assign(lhs, rhs) => {
                lhs.print(p)?;
                p.push(" = ");
                rhs.print(p)?;
                p.push(";");
            }
            Stmt::Expr(e) => {
                e.print(p)?;
                p.push(";");
            }
            Stmt::Return(e) => {
                p.push("return ");
                e.print(p)?;
                p.push(";");
            }
            Stmt::If(cond, body) => {
                p.push("if (");
                cond.print(p)?;
                p.push(") ");
                print_block(body, p)?;
            }
            Stmt::For { var, init, cond, update, body } => {
                p.push("for (var ");
                p.push(var);
                p.push(" = ");
                init.print(p)?;
                p.push("; ");
                cond.print(p)?;
                p.push("; ");
                update.print(p)?;
                p.push(") ");
                print_block(body, p)?;
            }
            Stmt::ForIn(var, obj, body) => {
                p.push("for (var ");
                p.push(var);
                p.push(" in ");
                obj.print(p)?;
                p.push(") ");
                print_block(body, p)?;
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn squeeze(s: &str) -> String {
        s.split_whitespace().collect()
    }

    fn t(e: &Js) -> String {
        e.to_code_string().unwrap()
    }

    #[test]
    fn t_literals() {
        assert_eq!(t(&Js::Null), "null");
        assert_eq!(t(&Js::Bool(false)), "false");
        assert_eq!(t(&Js::num(10)), "10");
        assert_eq!(t(&Js::num(0.1)), "0.1");
        assert_eq!(t(&Js::num(f64::INFINITY)), "Infinity");
        assert_eq!(t(&Js::str("a\"b")), "\"a\\\"b\"");
        assert_eq!(t(&Js::Json(serde_json::json!([{"a": 1}]))), "[{\"a\":1}]");
    }

    #[test]
    fn t_object_keys() {
        let o = Js::object([("minOpacity", Js::num(0.5)),
                            ("fill-rule", Js::str("evenodd"))]);
        assert_eq!(t(&o), "{minOpacity: 0.5, \"fill-rule\": \"evenodd\"}");
        assert_eq!(t(&Js::object::<&str>([])), "{}");
    }

    #[test]
    fn t_field_and_path() {
        assert_eq!(t(&Js::field("d", "lat")), "d[\"lat\"]");
        assert_eq!(t(&Js::path("cf.crossfilter.dimension")), "cf.crossfilter.dimension");
    }

    #[test]
    fn t_binary_parens() {
        let e = Js::ident("Math").method(
            "floor",
            [Js::field("d", "x").op("-", Js::num(0)).op("/", Js::num(10))])
            .op("+", Js::num(0).op("/", Js::num(10)));
        assert_eq!(t(&e), "Math.floor((d[\"x\"] - 0) / 10) + (0 / 10)");
    }

    #[test]
    fn t_method_chain() {
        let e = Js::path("dc").method("pieChart", [Js::str("#p")])
            .method("width", [Js::num(150)])
            .method("height", [Js::num(150)]);
        assert_eq!(t(&e), "dc.pieChart(\"#p\")\n    .width(150)\n    .height(150)");
    }

    #[test]
    fn t_function() {
        let f = Js::func(["d"], vec![Stmt::Return(Js::field("d", "x"))]);
        assert_eq!(squeeze(&t(&f)), "function(d){returnd[\"x\"];}");
    }

    #[test]
    fn t_statements() {
        let stmts = vec![
            Stmt::Var("out".into(), Js::Null),
            Stmt::For {
                var: "j".into(),
                init: Js::num(0),
                cond: Js::ident("j").op("<", Js::path("order.length")),
                update: Js::raw("j++"),
                body: vec![
                    Stmt::If(Js::ident("order").index(Js::ident("j")).op("==", Js::path("d.key")),
                             vec![Stmt::Assign(Js::ident("out"),
                                               Js::num(1).op("+", Js::ident("j")))])
                ]
            },
            Stmt::Return(Js::ident("out")),
        ];
        assert_eq!(squeeze(&stmts.to_code_string().unwrap()),
                   "varout=null;for(varj=0;j<order.length;j++){\
                    if(order[j]==d.key){out=1+j;}}returnout;");
    }
}
