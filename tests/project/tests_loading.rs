use fusion_lens::config::ConfigurationSource;
use fusion_lens::project::{ProjectError, WorkspaceLoader};
use fusion_lens::semantic::{HelperMethodNode, InvalidationPolicy};

use crate::helpers::package_fixture::PackageFixture;
use crate::helpers::source_fixtures::{BUTTON_CREATION, BUTTON_OVERWRITE};

#[test]
fn test_load_package_resolves_every_template() {
    let package = PackageFixture::new();
    package.write("Resources/Fusion/Button.fusion", BUTTON_CREATION);
    package.write("Resources/Fusion/Overrides.fusion", BUTTON_OVERWRITE);
    package.write("Resources/Fusion/Chain.fusion", "x = ${Foo.baz().end(1)}\n");

    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);
    let report = WorkspaceLoader::new()
        .load_directory(package.path("Resources"), &mut workspace)
        .unwrap();

    assert_eq!(report.loaded.len(), 3);
    assert_eq!(workspace.file_count(), 3);
    let resolved: usize = workspace
        .files()
        .map(|file| file.nodes_of::<HelperMethodNode>().count())
        .sum();
    assert_eq!(resolved, 3);
}

#[test]
fn test_settings_bind_helpers() {
    let package = PackageFixture::new();
    let config = package.config();
    assert!(config.get_merged("Neos.Fusion.defaultContext.I18n").is_some());

    let workspace = package.workspace(InvalidationPolicy::Rediagnose);
    let helpers = workspace.bound_helpers();
    assert_eq!(helpers.len(), 3);
}

#[test]
fn test_load_single_file() {
    let package = PackageFixture::new();
    package.write("Resources/Root.fusion", "a = ${I18n.translate('x')}\n");
    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);

    let uri = WorkspaceLoader::new()
        .load_file(package.path("Resources/Root.fusion"), &mut workspace)
        .unwrap();
    assert_eq!(uri, package.uri("Resources/Root.fusion"));
    assert!(workspace.contains_file(&uri));

    let missing = WorkspaceLoader::new().load_file(package.path("Resources/Nope.fusion"), &mut workspace);
    assert!(matches!(missing, Err(ProjectError::Io { .. })));
}
