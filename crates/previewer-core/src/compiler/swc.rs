//! SWC compiler backend implementation.
//!
//! Each module is parsed with the syntax its extension selects, then run
//! through resolver, classic JSX lowering (`React.createElement` /
//! `React.Fragment`), TypeScript stripping, hygiene and fixer before being
//! printed at the requested target. No type checking happens anywhere in
//! this pipeline; type errors are simply discarded with the types.

#![allow(clippy::default_trait_access)]

use super::spec::{Diagnostic, EsTarget};
use super::{CompilerBackend, CompilerError, TranspileOutput, TranspileSpec};
use swc_common::{
    comments::SingleThreadedComments, sync::Lrc, FileName, Globals, Mark, SourceMap, Spanned,
    GLOBALS,
};
use swc_ecma_ast::{EsVersion, Program};
use swc_ecma_codegen::{text_writer::JsWriter, Emitter};
use swc_ecma_parser::{lexer::Lexer, EsSyntax, Parser, StringInput, Syntax, TsSyntax};
use swc_ecma_transforms_base::{fixer::fixer, hygiene::hygiene, resolver};
use swc_ecma_transforms_react::{react, Options as ReactOptions, Runtime};
use swc_ecma_transforms_typescript::strip;
use swc_ecma_visit::FoldWith;

/// SWC-based compiler backend.
///
/// `SwcBackend` is `Send + Sync`; every `transpile` call builds its own
/// source map and globals, so calls are independent.
#[derive(Debug, Clone, Default)]
pub struct SwcBackend {
    _private: (),
}

impl SwcBackend {
    /// Create a new SWC backend with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn is_typescript(ext: &str) -> bool {
        matches!(ext, "ts" | "tsx")
    }

    fn is_jsx(ext: &str) -> bool {
        matches!(ext, "jsx" | "tsx")
    }
}

/// Map the public target onto the SWC version enum.
pub(crate) fn es_version(target: EsTarget) -> EsVersion {
    match target {
        EsTarget::ES2015 => EsVersion::Es2015,
        EsTarget::ES2016 => EsVersion::Es2016,
        EsTarget::ES2017 => EsVersion::Es2017,
        EsTarget::ES2018 => EsVersion::Es2018,
        EsTarget::ES2019 => EsVersion::Es2019,
        EsTarget::ES2020 => EsVersion::Es2020,
        EsTarget::ES2021 => EsVersion::Es2021,
        EsTarget::ES2022 => EsVersion::Es2022,
        EsTarget::ESNext => EsVersion::EsNext,
    }
}

impl CompilerBackend for SwcBackend {
    fn name(&self) -> &'static str {
        "swc"
    }

    fn transpile(
        &self,
        spec: &TranspileSpec,
        source: &str,
    ) -> Result<TranspileOutput, CompilerError> {
        let ext = spec.extension();
        if !self.supports_extension(&ext) {
            return Err(CompilerError::unsupported_file(format!(
                "Unsupported file type: {}",
                spec.filename
            )));
        }

        if source.trim().is_empty() {
            return Ok(TranspileOutput::new(""));
        }

        compile_with_swc(spec, source, Self::is_typescript(&ext), Self::is_jsx(&ext))
    }
}

fn compile_with_swc(
    spec: &TranspileSpec,
    source: &str,
    is_ts: bool,
    is_jsx: bool,
) -> Result<TranspileOutput, CompilerError> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        Lrc::new(FileName::Custom(spec.filename.clone())),
        source.to_string(),
    );

    let syntax = if is_ts {
        Syntax::Typescript(TsSyntax {
            tsx: is_jsx,
            decorators: true,
            ..Default::default()
        })
    } else {
        Syntax::Es(EsSyntax {
            jsx: is_jsx,
            decorators: true,
            ..Default::default()
        })
    };

    let target = es_version(spec.target);
    let comments = SingleThreadedComments::default();

    let lexer = Lexer::new(syntax, EsVersion::EsNext, StringInput::from(&*fm), Some(&comments));
    let mut parser = Parser::new_from(lexer);

    let located = |e: &swc_ecma_parser::error::Error| {
        let loc = cm.lookup_char_pos(e.span().lo);
        let message = e.kind().msg().to_string();
        Diagnostic::error(message).with_location(
            spec.filename.clone(),
            u32::try_from(loc.line).unwrap_or(u32::MAX),
            u32::try_from(loc.col_display + 1).unwrap_or(u32::MAX),
        )
    };

    let module = parser.parse_module().map_err(|e| {
        let diag = located(&e);
        CompilerError::parse_error(diag.message.clone()).with_diagnostics(vec![diag])
    })?;

    // Recoverable errors still mean the source is not valid for the target.
    let recovered: Vec<Diagnostic> = parser.take_errors().iter().map(located).collect();
    if let Some(first) = recovered.first() {
        return Err(CompilerError::parse_error(first.message.clone()).with_diagnostics(recovered));
    }

    let program = GLOBALS.set(&Globals::default(), || {
        let unresolved_mark = Mark::new();
        let top_level_mark = Mark::new();

        let mut program = Program::Module(module);
        program = program.fold_with(&mut resolver(unresolved_mark, top_level_mark, is_ts));

        // JSX lowering runs before stripping so the `React` binding it
        // introduces counts as a use when unused imports are elided.
        if is_jsx {
            let react_options = ReactOptions {
                runtime: Some(Runtime::Classic),
                ..Default::default()
            };
            program = program.fold_with(&mut react(
                cm.clone(),
                Some(&comments),
                react_options,
                top_level_mark,
                unresolved_mark,
            ));
        }

        if is_ts {
            program = program.fold_with(&mut strip(unresolved_mark, top_level_mark));
        }

        program = program.fold_with(&mut hygiene());
        program.fold_with(&mut fixer(Some(&comments)))
    });

    let Program::Module(output) = program else {
        return Err(CompilerError::transform_error(format!(
            "{} did not transform to a module",
            spec.filename
        )));
    };

    let mut buf = Vec::new();
    {
        let writer = JsWriter::new(cm.clone(), "\n", &mut buf, None);

        let mut emitter = Emitter {
            cfg: swc_ecma_codegen::Config::default()
                .with_minify(spec.minify)
                .with_target(target),
            cm: cm.clone(),
            comments: None,
            wr: writer,
        };

        emitter
            .emit_module(&output)
            .map_err(|e| CompilerError::transform_error(format!("Failed to emit: {e}")))?;
    }

    let code = String::from_utf8(buf)
        .map_err(|e| CompilerError::transform_error(format!("Invalid UTF-8 output: {e}")))?;

    Ok(TranspileOutput::new(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swc_backend_name() {
        let backend = SwcBackend::new();
        assert_eq!(backend.name(), "swc");
    }

    #[test]
    fn test_syntax_selection() {
        assert!(SwcBackend::is_typescript("ts"));
        assert!(SwcBackend::is_typescript("tsx"));
        assert!(!SwcBackend::is_typescript("jsx"));
        assert!(SwcBackend::is_jsx("jsx"));
        assert!(SwcBackend::is_jsx("tsx"));
        assert!(!SwcBackend::is_jsx("ts"));
    }

    #[test]
    fn test_transpile_empty_source() {
        let backend = SwcBackend::new();
        let output = backend
            .transpile(&TranspileSpec::new("Empty.tsx"), "  \n")
            .unwrap();
        assert_eq!(output.code, "");
    }

    #[test]
    fn test_transpile_unsupported_extension() {
        let backend = SwcBackend::new();
        let err = backend
            .transpile(&TranspileSpec::new("styles.css"), ".a{}")
            .unwrap_err();
        assert_eq!(err.code, crate::codes::BUNDLE_UNSUPPORTED_SYNTAX);
    }

    #[test]
    fn test_transpile_typescript_strips_types() {
        let backend = SwcBackend::new();
        let source = r#"
            interface User {
                name: string;
                age: number;
            }
            export const user: User = { name: "Alice", age: 30 };
            export function greet(u: User): string {
                return "hi " + u.name;
            }
        "#;

        let output = backend.transpile(&TranspileSpec::new("user.ts"), source).unwrap();

        assert!(!output.code.contains("interface"));
        assert!(!output.code.contains(": User"));
        assert!(!output.code.contains(": string"));
        assert!(output.code.contains("export const user"));
        assert!(output.code.contains("function greet"));
    }

    #[test]
    fn test_transpile_tsx_uses_classic_runtime() {
        let backend = SwcBackend::new();
        let source = r#"
            import React from "react";
            interface Props { title: string }
            export default function Card({ title }: Props) {
                return <><h1 className="text-sm">{title}</h1></>;
            }
        "#;

        let output = backend.transpile(&TranspileSpec::new("Card.tsx"), source).unwrap();

        assert!(output.code.contains("React.createElement"));
        assert!(output.code.contains("React.Fragment"));
        assert!(!output.code.contains("<h1"));
        assert!(!output.code.contains("jsx-runtime"));
        assert!(output.code.contains("\"text-sm\""));
    }

    #[test]
    fn test_transpile_parse_error_has_location() {
        let backend = SwcBackend::new();
        let err = backend
            .transpile(&TranspileSpec::new("Broken.tsx"), "const x = {\n  a: 1,\n")
            .unwrap_err();

        assert_eq!(err.code, crate::codes::BUNDLE_PARSE_ERROR);
        let diag = err.diagnostics.first().unwrap();
        assert_eq!(diag.file.as_deref(), Some("Broken.tsx"));
        assert!(diag.line.is_some());
        assert!(diag.column.is_some());
    }

    #[test]
    fn test_transpile_plain_js_keeps_code() {
        let backend = SwcBackend::new();
        let output = backend
            .transpile(&TranspileSpec::new("util.js"), "export const x = 1;")
            .unwrap();
        assert!(output.code.contains("export const x = 1;"));
    }
}
