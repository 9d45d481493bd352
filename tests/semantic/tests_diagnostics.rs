use fusion_lens::semantic::{DiagnosticCode, InvalidationPolicy, Severity};

use crate::helpers::package_fixture::PackageFixture;

#[test]
fn test_argument_count_diagnostics() {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);
    let uri = package.uri("Resources/Root.fusion");
    workspace.open_file(
        uri.clone(),
        "a = ${I18n.translate()}\nb = ${I18n.translate('x', 'y')}\nc = ${Foo.join(',', 'a', 'b', 'c')}\nd = ${Foo.baz().end()}\n",
    );

    let found: Vec<_> = workspace
        .diagnostics(&uri)
        .iter()
        .map(|d| (d.severity, d.code, d.span.start.line))
        .collect();
    assert_eq!(
        found,
        vec![
            (Severity::Error, DiagnosticCode::MissingArgument, 0),
            (Severity::Warning, DiagnosticCode::TooManyArguments, 1),
            (Severity::Error, DiagnosticCode::MissingArgument, 3),
        ]
    );
}

#[test]
fn test_surplus_argument_range_covers_the_argument() {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);
    let uri = package.uri("Resources/Root.fusion");
    let text = "b = ${I18n.translate('x', 'extra')}\n";
    workspace.open_file(uri.clone(), text);

    let diagnostics = workspace.diagnostics(&uri);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(&text[diagnostics[0].range], "'extra'");
    assert_eq!(diagnostics[0].code.as_str(), "F0102");
}

#[test]
fn test_syntax_errors_are_reported() {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);
    let uri = package.uri("Resources/Broken.fusion");
    workspace.open_file(uri.clone(), "a = ${Foo.bar(\n");

    let diagnostics = workspace.diagnostics(&uri);
    assert!(!diagnostics.is_empty());
    assert!(
        diagnostics
            .iter()
            .all(|d| d.code == DiagnosticCode::SyntaxError && d.is_error())
    );
}

#[test]
fn test_intersection_typed_parameter_counts() {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);
    let uri = package.uri("Resources/Root.fusion");
    workspace.open_file(uri.clone(), "a = ${Foo.pair(items, 'x')}\nb = ${Foo.pair(items)}\n");

    let found: Vec<_> = workspace
        .diagnostics(&uri)
        .iter()
        .map(|d| (d.code, d.span.start.line))
        .collect();
    assert_eq!(found, vec![(DiagnosticCode::MissingArgument, 1)]);
}

#[test]
fn test_license_header_comment_is_clean() {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);
    let uri = package.uri("Resources/Button.fusion");
    let file = workspace.open_file(
        uri.clone(),
        "/*\n * This file is part of the Acme.Site package.\n */\ninclude: Components/**/*.fusion\n\
         prototype(Acme:Button) < prototype(Neos.Fusion:Component) {\n    label = ${I18n.translate('x')} /* id */\n}\n",
    );

    assert!(workspace.diagnostics(&uri).is_empty());
    assert_eq!(file.component_creations().count(), 1);
}
