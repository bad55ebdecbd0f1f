//! Bundle output emission.
//!
//! Generates the bundle text from the linked module graph: a small ES2015
//! module registry, one registry function per module, then a require of the
//! entry. Requiring a key that is not registered defers to `__external`,
//! which the transform stage supplies.

use super::graph::{ModuleGraph, ModuleId};
use crate::text::js_string;

/// Module registry runtime.
///
/// Modules are cached before they run, so a cyclic import observes the
/// partially initialized exports object.
const RUNTIME: &str = r#"var __modules = {};
var __cache = {};
var __hasOwn = Object.prototype.hasOwnProperty;
function __require(id) {
  var cached = __cache[id];
  if (cached) return cached.exports;
  if (!__hasOwn.call(__modules, id)) return __external(id);
  var module = { exports: {} };
  __cache[id] = module;
  __modules[id](module, module.exports, __require);
  return module.exports;
}
function __export(target, getters) {
  for (var name in getters) {
    Object.defineProperty(target, name, { get: getters[name], enumerable: true });
  }
}
function __exportStar(target, source) {
  Object.keys(source).forEach(function (name) {
    if (name === "default" || __hasOwn.call(target, name)) return;
    Object.defineProperty(target, name, {
      get: function () { return source[name]; },
      enumerable: true
    });
  });
}
function __importDefault(m) {
  return m && m.__esModule ? m["default"] : m;
}
"#;

/// Registry key of a module path. Local keys are always `./`-prefixed, so
/// they never collide with a bare external specifier.
#[must_use]
pub fn registry_key(path: &str) -> String {
    format!("./{path}")
}

/// Emit the bundle for `graph` in `order`, running `entry` last.
#[must_use]
pub fn emit_bundle(graph: &ModuleGraph, order: &[ModuleId], entry: &str) -> String {
    let body_len: usize = graph.iter().map(|(_, m)| m.code.len() + 96).sum();
    let mut output = String::with_capacity(RUNTIME.len() + body_len + 64);
    output.push_str(RUNTIME);

    for &id in order {
        let Some(module) = graph.get(id) else {
            continue;
        };
        output.push_str(&format!("// {}\n", module.path.replace(['\n', '\r'], " ")));
        output.push_str(&format!(
            "__modules[{}] = function (__module, __exports, __require) {{\n",
            js_string(&registry_key(&module.path))
        ));
        output.push_str(&module.code);
        if !module.code.ends_with('\n') {
            output.push('\n');
        }
        output.push_str("};\n");
    }

    output.push_str(&format!("__require({});\n", js_string(&registry_key(entry))));
    output
}
