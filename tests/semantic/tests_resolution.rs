use fusion_lens::semantic::reflection::{ReturnType, normalize_alias};
use fusion_lens::semantic::{
    HelperMethodNode, HelperNode, InvalidationPolicy, TranslationShortHandNode,
};
use rstest::rstest;

use crate::helpers::package_fixture::PackageFixture;

fn method_names(file: &fusion_lens::SourceFile) -> Vec<String> {
    file.nodes_of::<HelperMethodNode>()
        .map(|(_, node)| node.method.name.to_string())
        .collect()
}

#[test]
fn test_translate_call_links_helper_method_and_shorthand() {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);
    let file = workspace.open_file(
        package.uri("Resources/Root.fusion"),
        "label = ${I18n.translate('shortcut.label')}\n",
    );

    let helpers: Vec<_> = file.nodes_of::<HelperNode>().collect();
    assert_eq!(helpers.len(), 1);
    assert_eq!(helpers[0].1.class.class_name(), "TranslationHelper");
    assert_eq!(file.text_of(helpers[0].0), "I18n");

    let methods: Vec<_> = file.nodes_of::<HelperMethodNode>().collect();
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0].1.method.name, "translate");
    assert_eq!(file.text_of(methods[0].0), "translate");
    assert_eq!(
        methods[0].1.method.return_description.as_deref(),
        Some("the translated label")
    );

    let shorthands: Vec<_> = file.nodes_of::<TranslationShortHandNode>().collect();
    assert_eq!(shorthands.len(), 1);
    assert_eq!(file.text_of(shorthands[0].0), "shortcut.label");
}

#[test]
fn test_void_return_ends_the_walk() {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);
    let file = workspace.open_file(
        package.uri("Resources/Root.fusion"),
        "x = ${Foo.bar().baz()}\n",
    );
    assert_eq!(method_names(&file), vec!["bar"]);
}

#[test]
fn test_walk_follows_imported_return_class() {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);
    let file = workspace.open_file(
        package.uri("Resources/Root.fusion"),
        "x = ${I18n.service().baz().end(3)}\n",
    );

    assert_eq!(method_names(&file), vec!["service", "baz", "end"]);
    let classes: Vec<_> = file
        .nodes_of::<HelperMethodNode>()
        .map(|(_, node)| node.class.fqcn.to_string())
        .collect();
    assert_eq!(
        classes,
        vec![
            "Acme\\Service\\TranslationHelper",
            "Acme\\Service\\Chain\\Foo",
            "Acme\\Service\\Chain\\Bar",
        ]
    );
}

#[test]
fn test_getter_alias_matches_call() {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);
    let file = workspace.open_file(
        package.uri("Resources/Root.fusion"),
        "x = ${Foo.foo()}\ny = ${Foo.get()}\n",
    );
    assert_eq!(method_names(&file), vec!["getFoo", "get"]);
}

#[rstest]
#[case("getFoo", "foo")]
#[case("get", "get")]
#[case("getURL", "uRL")]
#[case("format", "format")]
fn test_alias_normalization(#[case] name: &str, #[case] alias: &str) {
    assert_eq!(normalize_alias(name), alias);
}

#[rstest]
#[case::static_call_binding("x = ${Json.encode(value)}\n")]
#[case::unbound_helper("x = ${Date.now()}\n")]
#[case::plain_value("x = 'I18n.translate'\n")]
fn test_unresolvable_chains_attach_nothing(#[case] text: &str) {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);
    let file = workspace.open_file(package.uri("Resources/Root.fusion"), text);
    assert_eq!(file.nodes_of::<HelperNode>().count(), 0);
    assert_eq!(file.nodes_of::<HelperMethodNode>().count(), 0);
}

#[test]
fn test_return_types_reflect_signatures() {
    let package = PackageFixture::new();
    let workspace = package.workspace(InvalidationPolicy::Rediagnose);
    let foo = workspace
        .registry()
        .lookup("Acme\\Service\\Chain\\Foo")
        .unwrap();

    let (_, baz) = foo.method_matching("baz").unwrap();
    assert_eq!(
        baz.return_type,
        ReturnType::ClassRef("Acme\\Service\\Chain\\Bar".into())
    );
    let (_, join) = foo.method_matching("join").unwrap();
    assert!(join.is_static);
    assert!(join.is_variadic());
}
