//! Host class and template sources shared by the integration tests.

pub const TRANSLATION_HELPER: &str = r#"<?php
namespace Acme\Service;

use Acme\Service\Chain\Foo as FooService;

class TranslationHelper
{
    /**
     * Translate a label id
     *
     * @return string the translated label
     */
    public function translate(string $id): string {}

    public function service(): FooService {}
}
"#;

pub const FOO_SERVICE: &str = r#"<?php
namespace Acme\Service\Chain;

class Foo
{
    public function bar(): void {}

    public function baz(): Bar {}

    public function getFoo(): string {}

    public function get(): string {}

    public static function join(string $glue, string ...$parts): string {}

    public function pair(\Countable&\Traversable $items, string $label): string {}
}
"#;

pub const BAR_SERVICE: &str = r#"<?php
namespace Acme\Service\Chain;

class Bar
{
    public function end(int $limit): int {}
}
"#;

/// Declares `namespace Acme;` though it lives where `Acme\Sub` is expected
pub const MISPLACED_FOO: &str = r#"<?php
namespace Acme;

class Foo
{
    public function bar(): void {}
}
"#;

pub const SETTINGS: &str = r#"Neos:
  Fusion:
    defaultContext:
      I18n: 'Acme\Service\TranslationHelper'
      Foo: '\Acme\Service\Chain\Foo'
      Json: 'Acme\Service\JsonHelper::encode'
"#;

pub const BUTTON_CREATION: &str = "prototype(Acme:Button) < prototype(Neos.Fusion:Component) {\n    label = ${I18n.translate('shortcut.label')}\n}\n";

pub const BUTTON_OVERWRITE: &str = "prototype(Acme:Button).label = 'Fixed'\n";
