use std::sync::Arc;

use fusion_lens::FileUri;
use fusion_lens::Workspace;
use fusion_lens::WorkspaceSettings;
use fusion_lens::config::LayeredConfiguration;
use fusion_lens::semantic::workspace::BatchOutcome;
use fusion_lens::semantic::{
    FileChangeEvent, FileChangeKind, HelperMethodNode, InvalidationPolicy,
};

use crate::helpers::package_fixture::PackageFixture;
use crate::helpers::source_fixtures::FOO_SERVICE;

const BAR_WITHOUT_LIMIT: &str =
    "<?php\nnamespace Acme\\Service\\Chain;\n\nclass Bar\n{\n    public function end(): int {}\n}\n";

#[test]
fn test_host_edit_replaces_cached_class() {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);
    let uri = package.uri("Resources/Root.fusion");
    workspace.open_file(uri, "x = ${Foo.baz().end(1)}\n");

    let before = workspace
        .registry()
        .lookup("Acme\\Service\\Chain\\Bar")
        .unwrap();
    package.write("Classes/Chain/Bar.php", BAR_WITHOUT_LIMIT);
    let outcome =
        workspace.handle_file_event(&FileChangeEvent::changed(package.uri("Classes/Chain/Bar.php")));
    assert!(outcome.purged);

    let after = workspace
        .registry()
        .lookup("Acme\\Service\\Chain\\Bar")
        .unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(after.methods[0].parameters.is_empty());
}

#[test]
fn test_rediagnose_policy_keeps_snapshots_until_reresolved() {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);
    let uri = package.uri("Resources/Root.fusion");
    let original = workspace.open_file(uri.clone(), "x = ${Foo.baz().end(1)}\n");
    assert!(workspace.diagnostics(&uri).is_empty());

    package.write("Classes/Chain/Bar.php", BAR_WITHOUT_LIMIT);
    let outcome =
        workspace.handle_file_event(&FileChangeEvent::changed(package.uri("Classes/Chain/Bar.php")));
    assert!(outcome.rebuilt.is_empty());
    assert_eq!(outcome.scheduled, 1);
    assert_eq!(
        workspace.run_scheduled_diagnostics(),
        BatchOutcome::Completed { diagnosed: 1 }
    );
    assert!(Arc::ptr_eq(&workspace.snapshot(&uri).unwrap(), &original));
    assert!(workspace.diagnostics(&uri).is_empty());

    let rebuilt = workspace.reresolve_file(&uri).unwrap();
    assert!(!Arc::ptr_eq(&rebuilt, &original));
    assert_eq!(workspace.diagnostics(&uri).len(), 1);
}

#[test]
fn test_reresolve_policy_rebuilds_dependent_files() {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Reresolve);
    let dependent = package.uri("Resources/Root.fusion");
    let unrelated = package.uri("Resources/Other.fusion");
    workspace.open_file(dependent.clone(), "x = ${Foo.baz().end(1)}\n");
    let untouched = workspace.open_file(unrelated.clone(), "y = ${I18n.translate('a')}\n");

    package.write("Classes/Chain/Bar.php", BAR_WITHOUT_LIMIT);
    let outcome =
        workspace.handle_file_event(&FileChangeEvent::changed(package.uri("Classes/Chain/Bar.php")));

    assert_eq!(outcome.rebuilt, vec![dependent.clone()]);
    assert!(Arc::ptr_eq(&workspace.snapshot(&unrelated).unwrap(), &untouched));
    assert_eq!(workspace.diagnostics(&dependent).len(), 1);
}

#[test]
fn test_deleted_host_file_drops_resolution() {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Reresolve);
    let uri = package.uri("Resources/Root.fusion");
    workspace.open_file(uri.clone(), "x = ${Foo.baz().end(1)}\n");

    std::fs::remove_file(package.path("Classes/Chain/Bar.php")).unwrap();
    workspace.handle_file_event(&FileChangeEvent::new(
        package.uri("Classes/Chain/Bar.php"),
        FileChangeKind::Deleted,
    ));

    let file = workspace.snapshot(&uri).unwrap();
    let methods: Vec<_> = file
        .nodes_of::<HelperMethodNode>()
        .map(|(_, node)| node.method.name.to_string())
        .collect();
    assert_eq!(methods, vec!["baz"]);
}

#[test]
fn test_template_events_track_disk_state() {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);
    package.write("Resources/New.fusion", "x = ${Foo.bar()}\n");
    let uri = package.uri("Resources/New.fusion");

    workspace.handle_file_event(&FileChangeEvent::new(uri.clone(), FileChangeKind::Created));
    assert!(workspace.contains_file(&uri));

    workspace.handle_file_event(&FileChangeEvent::new(uri.clone(), FileChangeKind::Deleted));
    assert!(!workspace.contains_file(&uri));
}

#[test]
fn test_host_event_for_path_with_space_purges() {
    let package = PackageFixture::empty();
    package.write("my dir/Classes/Chain/Foo.php", FOO_SERVICE);
    let settings = WorkspaceSettings::default()
        .with_namespace_root("Acme\\Service", package.path("my dir/Classes"));
    let mut workspace = Workspace::new(settings, Arc::new(LayeredConfiguration::new()));
    assert!(workspace.registry().lookup("Acme\\Service\\Chain\\Foo").is_some());

    let class_path = package.path("my dir/Classes/Chain/Foo.php");
    let encoded = FileUri::from_path(&class_path);
    assert!(encoded.as_str().contains("my%20dir"));
    assert_eq!(encoded.to_path(), Some(class_path.clone()));

    // watchers may report the unencoded form
    let raw = FileUri::new(format!("file://{}", class_path.display()));
    let outcome = workspace.handle_file_event(&FileChangeEvent::changed(raw));
    assert!(outcome.purged);
    assert!(!workspace.registry().roots()[0].is_cached("Acme\\Service\\Chain\\Foo"));
}

#[test]
fn test_template_event_with_encoded_uri_reads_from_disk() {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);
    package.write("Resources/my dir/New.fusion", "x = ${Foo.bar()}\n");
    let uri = FileUri::new(format!(
        "file://{}",
        package.path("Resources/my dir/New.fusion").display().to_string().replace(' ', "%20")
    ));

    workspace.handle_file_event(&FileChangeEvent::new(uri.clone(), FileChangeKind::Created));
    let file = workspace.snapshot(&uri).unwrap();
    assert_eq!(file.nodes_of::<HelperMethodNode>().count(), 1);
}
