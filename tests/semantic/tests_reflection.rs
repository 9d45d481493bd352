use std::sync::Arc;

use fusion_lens::semantic::reflection::{ClassRegistry, LookupMiss, NamespaceRoot};

use crate::helpers::package_fixture::PackageFixture;
use crate::helpers::source_fixtures::{FOO_SERVICE, MISPLACED_FOO};

#[test]
fn test_class_in_wrong_namespace_directory_is_not_found() {
    let package = PackageFixture::empty();
    package.write("Classes/Sub/Foo.php", MISPLACED_FOO);
    let root = NamespaceRoot::new("Acme", package.path("Classes"));

    assert!(root.lookup("Acme\\Sub\\Foo").is_none());
    assert_eq!(
        root.try_lookup("Acme\\Sub\\Foo").unwrap_err(),
        LookupMiss::NamespaceMismatch {
            expected: "Acme\\Sub".into(),
            found: Some("Acme".into()),
        }
    );
    assert_eq!(root.cached_count(), 0);
}

#[test]
fn test_missing_file_is_not_found() {
    let package = PackageFixture::new();
    let workspace = package.workspace(fusion_lens::semantic::InvalidationPolicy::Rediagnose);
    assert!(
        workspace
            .registry()
            .lookup("Acme\\Service\\Nowhere")
            .is_none()
    );
    assert!(workspace.registry().lookup("Other\\Vendor\\Foo").is_none());
}

#[test]
fn test_lookup_is_cached_until_purged() {
    let package = PackageFixture::empty();
    package.write("Classes/Chain/Foo.php", FOO_SERVICE);
    let registry = ClassRegistry::with_roots([NamespaceRoot::new(
        "Acme\\Service",
        package.path("Classes"),
    )]);

    let first = registry.lookup("Acme\\Service\\Chain\\Foo").unwrap();
    let again = registry.lookup("Acme\\Service\\Chain\\Foo").unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    assert!(registry.purge_file(&package.uri("Classes/Chain/Foo.php")));
    let rebuilt = registry.lookup("Acme\\Service\\Chain\\Foo").unwrap();
    assert!(!Arc::ptr_eq(&first, &rebuilt));
    assert_eq!(rebuilt.methods.len(), first.methods.len());
}

#[test]
fn test_variadic_parameter_is_optional() {
    let package = PackageFixture::new();
    let registry = ClassRegistry::with_roots([NamespaceRoot::new(
        "Acme\\Service",
        package.path("Classes"),
    )]);
    let foo = registry.lookup("Acme\\Service\\Chain\\Foo").unwrap();
    let (_, join) = foo.method_matching("join").unwrap();

    assert_eq!(join.parameters.len(), 2);
    assert!(!join.parameters[0].is_optional());
    assert!(join.parameters[1].spread);
    assert!(join.parameters[1].is_optional());
}
