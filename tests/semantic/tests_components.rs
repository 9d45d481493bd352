use fusion_lens::semantic::InvalidationPolicy;
use fusion_lens::syntax::NodeKind;
use fusion_lens::{FileUri, SourceFile};

use crate::helpers::package_fixture::PackageFixture;
use crate::helpers::source_fixtures::{BUTTON_CREATION, BUTTON_OVERWRITE};

fn prototype_names<'a>(
    file: &SourceFile,
    entries: impl Iterator<Item = &'a fusion_lens::semantic::PositionedNode>,
) -> Vec<String> {
    entries
        .filter_map(|entry| match file.kind(entry.syntax_id()?)? {
            NodeKind::PrototypePathSegment { identifier } => Some(identifier.to_string()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_creation_and_overwrite_across_files() {
    let package = PackageFixture::new();
    package.write("Resources/Fusion/Button.fusion", BUTTON_CREATION);
    package.write("Resources/Fusion/Overrides.fusion", BUTTON_OVERWRITE);
    let workspace = package.loaded_workspace(InvalidationPolicy::Rediagnose);

    let a = workspace
        .snapshot(&package.uri("Resources/Fusion/Button.fusion"))
        .unwrap();
    let b = workspace
        .snapshot(&package.uri("Resources/Fusion/Overrides.fusion"))
        .unwrap();

    assert_eq!(prototype_names(&a, a.component_creations()), vec!["Acme:Button"]);
    assert!(a.component_overwrites().next().is_none());
    assert_eq!(
        prototype_names(&a, a.component_extends()),
        vec!["Neos.Fusion:Component"]
    );

    assert!(b.component_creations().next().is_none());
    assert_eq!(prototype_names(&b, b.component_overwrites()), vec!["Acme:Button"]);

    let creation = a.component_creations().next().unwrap();
    assert_eq!(a.text_of(creation), "prototype(Acme:Button)");
}

#[test]
fn test_position_query_finds_component_segment() {
    let package = PackageFixture::new();
    let mut workspace = package.workspace(InvalidationPolicy::Rediagnose);
    let uri = FileUri::new("file:///Resources/Button.fusion");
    let file = workspace.open_file(uri, BUTTON_CREATION);

    let entry = file.node_at(0, 12).unwrap();
    assert_eq!(file.text_of(entry), "prototype(Acme:Button)");
}
