//! The process-wide toolchain shared by `Compiler::new`.

use previewer_core::toolchain::shared;
use previewer_core::{compile_preview, ComponentFile, Compiler, PreviewConfig};
use serial_test::serial;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_shared_cell_is_one_instance() {
    let a = shared();
    let b = shared();
    assert!(Arc::ptr_eq(&a, &b));

    let (x, y) = tokio::join!(a.get(), b.get());
    assert!(Arc::ptr_eq(&x.unwrap(), &y.unwrap()));
    assert!(a.is_ready());
}

#[tokio::test]
#[serial]
async fn test_concurrent_compilers_use_shared_toolchain() {
    let files = [ComponentFile::new("A.tsx", "export default () => <p className=\"m-2\">a</p>;").main()];
    let first = Compiler::new(PreviewConfig::default()).unwrap();
    let second = Compiler::new(PreviewConfig::default()).unwrap();

    let (a, b) = tokio::join!(first.compile(&files), second.compile(&files));
    assert_eq!(a.unwrap().html, b.unwrap().html);
    assert!(shared().is_ready());
}

#[tokio::test]
#[serial]
async fn test_compile_preview_returns_html() {
    let files = [ComponentFile::new("Section.tsx", "export default () => <div>Hi</div>;")];
    let html = compile_preview(&files).await.unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<div id=\"root\"></div>"));
}
