//! Module linking.
//!
//! Turns one transpiled ES module into the body of a registry function
//! `function (__module, __exports, __require) { ... }`. Import declarations are
//! hoisted into a prologue of `__require` calls, export declarations lose
//! their `export` keyword, and every exported name becomes a getter on
//! `__exports`. Statements are spliced by span from the transpiled text, so
//! the module's own code passes through untouched.
//!
//! Imported bindings are snapshotted when the importing module first runs.

use super::BundleError;
use crate::codes;
use crate::text::js_string;
use std::fmt::Write as _;
use swc_common::{sync::Lrc, FileName, SourceMap, Spanned};
use swc_ecma_ast::{
    Decl, DefaultDecl, EsVersion, ExportSpecifier, ImportSpecifier, ModuleDecl, ModuleExportName,
    ModuleItem, ObjectPatProp, Pat,
};
use swc_ecma_parser::{lexer::Lexer, EsSyntax, Parser, StringInput, Syntax};

/// Local that holds an anonymous default export.
const DEFAULT_LOCAL: &str = "__default";

/// Link a transpiled module.
///
/// `resolve` maps an import specifier to the registry key it is required
/// under; it is called once per import or re-export declaration, in source
/// order, and its errors abort linking.
///
/// # Errors
///
/// Returns a `BundleError` if the code does not parse as an ES module or
/// uses module syntax that has no registry equivalent, or the first error
/// from `resolve`.
pub fn link_module<E>(
    path: &str,
    code: &str,
    resolve: &mut dyn FnMut(&str) -> Result<String, E>,
) -> Result<String, E>
where
    E: From<BundleError>,
{
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(Lrc::new(FileName::Custom(path.to_string())), code.to_string());

    let lexer = Lexer::new(
        Syntax::Es(EsSyntax::default()),
        EsVersion::EsNext,
        StringInput::from(&*fm),
        None,
    );
    let mut parser = Parser::new_from(lexer);
    let module = parser.parse_module().map_err(|e| {
        BundleError::new(
            codes::BUNDLE_INTERNAL_ERROR,
            format!("Transpiled output does not parse: {}", e.kind().msg()),
            Some(path.to_string()),
        )
    })?;

    let base = fm.start_pos.0;
    let range = |item: &ModuleItem| {
        let span = item.span();
        ((span.lo.0 - base) as usize, (span.hi.0 - base) as usize)
    };

    let mut linker = Linker::default();
    let mut body = String::with_capacity(code.len() + 256);
    let mut cursor = 0usize;

    for item in &module.body {
        let ModuleItem::ModuleDecl(decl) = item else {
            continue;
        };
        let (lo, hi) = range(item);
        body.push_str(&code[cursor..lo]);
        let text = &code[lo..hi];
        cursor = hi;

        match decl {
            ModuleDecl::Import(import) => {
                let key = resolve(&*import.src.value)?;
                linker.import(&key, &import.specifiers);
            }
            ModuleDecl::ExportDecl(export) => {
                let names = decl_names(&export.decl).ok_or_else(|| unsupported(path, text))?;
                for name in names {
                    linker.getter(name.clone(), name);
                }
                body.push_str(strip_keywords(text, &["export"]));
            }
            ModuleDecl::ExportDefaultDecl(export) => {
                let ident = match &export.decl {
                    DefaultDecl::Fn(f) => f.ident.as_ref(),
                    DefaultDecl::Class(c) => c.ident.as_ref(),
                    DefaultDecl::TsInterfaceDecl(_) => return Err(unsupported(path, text).into()),
                };
                let rest = strip_keywords(text, &["export", "default"]);
                match ident {
                    Some(ident) => {
                        linker.getter("default".to_string(), ident.sym.to_string());
                        body.push_str(rest);
                    }
                    None => {
                        linker.getter("default".to_string(), DEFAULT_LOCAL.to_string());
                        push_default_var(&mut body, rest);
                    }
                }
            }
            ModuleDecl::ExportDefaultExpr(_) => {
                linker.getter("default".to_string(), DEFAULT_LOCAL.to_string());
                push_default_var(&mut body, strip_keywords(text, &["export", "default"]));
            }
            ModuleDecl::ExportNamed(named) => match &named.src {
                None => {
                    for spec in &named.specifiers {
                        let ExportSpecifier::Named(n) = spec else {
                            return Err(unsupported(path, text).into());
                        };
                        let local = export_name(&n.orig);
                        let exported = n.exported.as_ref().map_or_else(|| local.clone(), export_name);
                        linker.getter(exported, local);
                    }
                }
                Some(src) => {
                    let key = resolve(&*src.value)?;
                    let binding = linker.require_binding(&key);
                    for spec in &named.specifiers {
                        match spec {
                            ExportSpecifier::Named(n) => {
                                let orig = export_name(&n.orig);
                                let exported =
                                    n.exported.as_ref().map_or_else(|| orig.clone(), export_name);
                                linker.getter(exported, member(&binding, &orig));
                            }
                            ExportSpecifier::Namespace(ns) => {
                                linker.getter(export_name(&ns.name), binding.clone());
                            }
                            ExportSpecifier::Default(d) => {
                                linker.getter(d.exported.sym.to_string(), member(&binding, "default"));
                            }
                        }
                    }
                }
            },
            ModuleDecl::ExportAll(all) => {
                let key = resolve(&*all.src.value)?;
                linker.star(&key);
            }
            ModuleDecl::TsImportEquals(_)
            | ModuleDecl::TsExportAssignment(_)
            | ModuleDecl::TsNamespaceExport(_) => return Err(unsupported(path, text).into()),
        }
    }
    body.push_str(&code[cursor..]);

    Ok(linker.finish(&body))
}

/// Accumulates the prologue of one module.
#[derive(Debug, Default)]
struct Linker {
    /// `__require` bindings and import locals, in source order.
    imports: String,
    /// `(exported name, getter expression)`.
    getters: Vec<(String, String)>,
    /// Registry keys re-exported with `export *`.
    stars: Vec<String>,
    next_binding: usize,
}

impl Linker {
    fn require_binding(&mut self, key: &str) -> String {
        let binding = format!("__import_{}", self.next_binding);
        self.next_binding += 1;
        let _ = writeln!(self.imports, "var {binding} = __require({});", js_string(key));
        binding
    }

    fn import(&mut self, key: &str, specifiers: &[ImportSpecifier]) {
        if specifiers.is_empty() {
            let _ = writeln!(self.imports, "__require({});", js_string(key));
            return;
        }
        let binding = self.require_binding(key);
        for spec in specifiers {
            let (local, init) = match spec {
                ImportSpecifier::Default(d) => (&d.local, format!("__importDefault({binding})")),
                ImportSpecifier::Namespace(ns) => (&ns.local, binding.clone()),
                ImportSpecifier::Named(n) => {
                    let imported = n
                        .imported
                        .as_ref()
                        .map_or_else(|| n.local.sym.to_string(), export_name);
                    (&n.local, member(&binding, &imported))
                }
            };
            let _ = writeln!(self.imports, "var {} = {init};", local.sym);
        }
    }

    fn getter(&mut self, exported: String, expr: String) {
        self.getters.push((exported, expr));
    }

    fn star(&mut self, key: &str) {
        self.stars.push(key.to_string());
    }

    fn finish(self, body: &str) -> String {
        let mut out = String::with_capacity(body.len() + self.imports.len() + 128);
        out.push_str("Object.defineProperty(__exports, \"__esModule\", { value: true });\n");
        if !self.getters.is_empty() {
            out.push_str("__export(__exports, {\n");
            for (exported, expr) in &self.getters {
                let _ = writeln!(
                    out,
                    "  {}: function () {{ return {expr}; }},",
                    js_string(exported)
                );
            }
            out.push_str("});\n");
        }
        for key in &self.stars {
            let _ = writeln!(out, "__exportStar(__exports, __require({}));", js_string(key));
        }
        out.push_str(&self.imports);
        out.push_str(body);
        out
    }
}

fn push_default_var(body: &mut String, expr: &str) {
    let expr = expr.trim_end();
    body.push_str("var ");
    body.push_str(DEFAULT_LOCAL);
    body.push_str(" = ");
    body.push_str(expr);
    if !expr.ends_with(';') {
        body.push(';');
    }
}

/// Property access on `object` that stays valid for any export name.
fn member(object: &str, name: &str) -> String {
    if name == "default" {
        format!("__importDefault({object})")
    } else if is_identifier(name) {
        format!("{object}.{name}")
    } else {
        format!("{object}[{}]", js_string(name))
    }
}

fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        ModuleExportName::Str(s) => s.value.to_string(),
    }
}

/// Binding names a declaration introduces, or `None` for declarations with
/// no runtime form.
fn decl_names(decl: &Decl) -> Option<Vec<String>> {
    match decl {
        Decl::Class(c) => Some(vec![c.ident.sym.to_string()]),
        Decl::Fn(f) => Some(vec![f.ident.sym.to_string()]),
        Decl::Var(var) => {
            let mut names = Vec::new();
            for declarator in &var.decls {
                pat_names(&declarator.name, &mut names);
            }
            Some(names)
        }
        _ => None,
    }
}

fn pat_names(pat: &Pat, names: &mut Vec<String>) {
    match pat {
        Pat::Ident(binding) => names.push(binding.id.sym.to_string()),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                pat_names(elem, names);
            }
        }
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => pat_names(&kv.value, names),
                    ObjectPatProp::Assign(assign) => names.push(assign.key.sym.to_string()),
                    ObjectPatProp::Rest(rest) => pat_names(&rest.arg, names),
                }
            }
        }
        Pat::Rest(rest) => pat_names(&rest.arg, names),
        Pat::Assign(assign) => pat_names(&assign.left, names),
        Pat::Invalid(_) | Pat::Expr(_) => {}
    }
}

/// Drop leading keywords from a declaration's source text.
fn strip_keywords<'a>(text: &'a str, keywords: &[&str]) -> &'a str {
    let mut rest = text;
    for keyword in keywords {
        rest = rest.strip_prefix(keyword).unwrap_or(rest).trim_start();
    }
    rest
}

fn unsupported(path: &str, text: &str) -> BundleError {
    let snippet: String = text.chars().take(60).collect();
    BundleError::new(
        codes::BUNDLE_UNSUPPORTED_SYNTAX,
        format!("Unsupported module syntax: {snippet}"),
        Some(path.to_string()),
    )
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}


#[cfg(test)]
mod tests {
    use super::*;

    fn link(code: &str) -> String {
        link_module::<BundleError>("Test.js", code, &mut |spec: &str| Ok(spec.to_string())).unwrap()
    }

    #[test]
    fn test_link_default_import_and_named_import() {
        let out = link("import React, { useState as useS } from \"react\";\nconst x = useS;\n");
        assert!(out.contains("var __import_0 = __require(\"react\");"));
        assert!(out.contains("var React = __importDefault(__import_0);"));
        assert!(out.contains("var useS = __import_0.useState;"));
        assert!(out.contains("const x = useS;"));
        assert!(!out.contains("import "));
    }

    #[test]
    fn test_link_namespace_and_side_effect_import() {
        let out = link("import * as utils from \"./utils.ts\";\nimport \"./setup.js\";\n");
        assert!(out.contains("var utils = __import_0;"));
        assert!(out.contains("__require(\"./setup.js\");"));
    }

    #[test]
    fn test_link_export_declarations() {
        let out = link(
            "export const a = 1, { b, c: d, ...e } = obj, [f] = arr;\nexport function g() {}\nexport class H {}\n",
        );
        for name in ["a", "b", "d", "e", "f", "g", "H"] {
            assert!(
                out.contains(&format!("\"{name}\": function () {{ return {name}; }}")),
                "missing getter for {name}: {out}"
            );
        }
        assert!(out.contains("const a = 1"));
        assert!(out.contains("function g() {}"));
        assert!(out.contains("class H {}"));
        assert!(!out.contains("export "));
    }

    #[test]
    fn test_link_default_exports() {
        let out = link("export default function Card() {}\n");
        assert!(out.contains("\"default\": function () { return Card; }"));
        assert!(out.contains("function Card() {}"));

        let out = link("export default () => 1;\n");
        assert!(out.contains("var __default = () => 1;"));
        assert!(out.contains("\"default\": function () { return __default; }"));

        let out = link("export default function () { return 2; }\n");
        assert!(out.contains("var __default = function"));
    }

    #[test]
    fn test_link_export_list_and_reexports() {
        let out = link("const a = 1;\nexport { a as b, a };\nexport { x as y, default as Z } from \"./m.tsx\";\nexport * from \"./n.tsx\";\nexport * as ns from \"./o.tsx\";\n");
        assert!(out.contains("\"b\": function () { return a; }"));
        assert!(out.contains("\"a\": function () { return a; }"));
        assert!(out.contains("var __import_0 = __require(\"./m.tsx\");"));
        assert!(out.contains("\"y\": function () { return __import_0.x; }"));
        assert!(out.contains("\"Z\": function () { return __importDefault(__import_0); }"));
        assert!(out.contains("__exportStar(__exports, __require(\"./n.tsx\"));"));
        assert!(out.contains("\"ns\": function () { return __import_1; }"));
    }

    #[test]
    fn test_link_marks_es_module() {
        let out = link("const a = 1;\n");
        assert!(out.starts_with("Object.defineProperty(__exports, \"__esModule\", { value: true });"));
        assert!(!out.contains("__export(__exports"));
    }

    #[test]
    fn test_link_resolve_error_propagates() {
        let result = link_module::<BundleError>("A.js", "import x from \"./Missing\";", &mut |spec: &str| {
            Err(BundleError::new(codes::MODULE_NOT_FOUND, spec, None))
        });
        assert_eq!(result.unwrap_err().code, codes::MODULE_NOT_FOUND);
    }

    #[test]
    fn test_member_access() {
        assert_eq!(member("m", "foo"), "m.foo");
        assert_eq!(member("m", "default"), "__importDefault(m)");
        assert_eq!(member("m", "a-b"), "m[\"a-b\"]");
    }
}
