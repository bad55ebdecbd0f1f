//! Run compiled documents against stub React globals and check what mounts.

use deno_core::{v8, JsRuntime, RuntimeOptions};
use previewer_core::{ComponentFile, Compiler, PreviewConfig, ToolchainCell};
use std::sync::Arc;

/// Minimal `React` / `ReactDOM` / `document`: elements are plain objects and
/// rendering flattens them to their text content.
const STUB_GLOBALS: &str = r#"
function __h(type, props) {
  return { type: type, props: props || {}, children: Array.prototype.slice.call(arguments, 2) };
}
function __text(node) {
  if (node == null || typeof node === "boolean") return "";
  if (typeof node === "string" || typeof node === "number") return String(node);
  if (Array.isArray(node)) return node.map(__text).join("");
  if (typeof node.type === "function") {
    var props = Object.assign({}, node.props, {
      children: node.children.length === 1 ? node.children[0] : node.children
    });
    return __text(node.type(props));
  }
  return node.children.map(__text).join("");
}
var __root = { text: null };
globalThis.React = {
  createElement: __h,
  Fragment: function (props) { return props.children; },
  useState: function (value) { return [value, function () {}]; }
};
globalThis.ReactDOM = {
  createRoot: function (el) { return { render: function (node) { el.text = __text(node); } }; }
};
globalThis.window = globalThis;
globalThis.document = {
  getElementById: function (id) {
    if (id !== "root") throw new Error("unexpected container " + id);
    return __root;
  }
};
"#;

fn compiler() -> Compiler {
    Compiler::with_toolchain(PreviewConfig::default(), Arc::new(ToolchainCell::swc())).unwrap()
}

/// The script the document runs on `DOMContentLoaded`.
fn bundle_of(html: &str) -> &str {
    let open = "window.addEventListener(\"DOMContentLoaded\", function () {\n";
    let start = html.find(open).unwrap() + open.len();
    let end = html[start..].rfind("\n});").unwrap() + start;
    &html[start..end]
}

/// Run the document's bundle and return the text mounted into the root.
fn rendered_text(html: &str) -> Result<String, String> {
    let mut runtime = JsRuntime::new(RuntimeOptions::default());
    runtime
        .execute_script("<stubs>", STUB_GLOBALS.to_string())
        .map_err(|e| e.to_string())?;
    runtime
        .execute_script("<bundle>", bundle_of(html).to_string())
        .map_err(|e| e.to_string())?;
    let value = runtime
        .execute_script("<result>", "String(__root.text)".to_string())
        .map_err(|e| e.to_string())?;
    let scope = &mut runtime.handle_scope();
    let local = v8::Local::new(scope, value);
    Ok(local.to_rust_string_lossy(scope))
}

async fn render(files: &[ComponentFile]) -> String {
    let doc = compiler().compile(files).await.unwrap();
    rendered_text(&doc.html).unwrap()
}

#[tokio::test]
async fn test_single_section_mounts_its_text() {
    let files = [ComponentFile::new(
        "Section.tsx",
        "export default () => <div className='p-4'>Hi</div>",
    )
    .main()];
    assert_eq!(render(&files).await, "Hi");
}

#[tokio::test]
async fn test_imported_component_renders_inside_main() {
    let files = [
        ComponentFile::new(
            "Header.tsx",
            "import Footer from './Footer';\nexport default function Header() { return <header><h1>Top</h1><Footer /></header>; }",
        )
        .main(),
        ComponentFile::new(
            "Footer.tsx",
            "export default function Footer() { return <footer>Bottom</footer>; }",
        ),
    ];
    assert_eq!(render(&files).await, "TopBottom");
}

#[tokio::test]
async fn test_flagged_main_is_the_one_mounted() {
    let files = [
        ComponentFile::new("Nav.tsx", "export default () => <nav>nav</nav>;"),
        ComponentFile::new("Hero.tsx", "export default () => <section>hero</section>;").main(),
    ];
    assert_eq!(render(&files).await, "hero");

    let files = [
        ComponentFile::new("Nav.tsx", "export default () => <nav>nav</nav>;"),
        ComponentFile::new("Hero.tsx", "export default () => <section>hero</section>;"),
    ];
    assert_eq!(render(&files).await, "nav");
}

#[tokio::test]
async fn test_top_level_module_and_exports_names_are_user_bindings() {
    let files = [ComponentFile::new(
        "App.tsx",
        "const module = { title: 'Mod' };\nconst exports = { suffix: 'ule' };\nexport default () => <p>{module.title}{exports.suffix}</p>;",
    )
    .main()];
    assert_eq!(render(&files).await, "Module");
}

#[tokio::test]
async fn test_named_exports_and_utilities() {
    let files = [
        ComponentFile::new(
            "Page.tsx",
            "import { Badge, label } from './parts';\nimport { shout } from './util';\nexport default () => <main><Badge text={shout(label)} /></main>;",
        )
        .main(),
        ComponentFile::new(
            "parts.tsx",
            "export const label = 'new';\nexport function Badge({ text }: { text: string }) { return <span>{text}</span>; }",
        ),
        ComponentFile::new("util.ts", "export const shout = (s: string): string => s.toUpperCase() + '!';"),
    ];
    assert_eq!(render(&files).await, "NEW!");
}

#[tokio::test]
async fn test_comment_opener_in_unicode_regex_still_runs() {
    let files = [ComponentFile::new(
        "Note.tsx",
        "const opener = /<!--/u;\nexport default () => <p>{opener.test('<!-- x') ? 'matched' : 'missed'}</p>;",
    )
    .main()];
    assert_eq!(render(&files).await, "matched");
}
