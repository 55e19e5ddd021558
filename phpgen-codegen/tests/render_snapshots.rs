//! Snapshot tests for rendered PHP.
//!
//! Every test renders with four-space indentation so the inline snapshots
//! read like the PHP a user would see.

use phpgen_codegen::{Renderer, engine::flatten, synth};
use phpgen_core::{Indent, PhpVersion, RenderContext};
use phpgen_ir::{
    Capabilities, Class, ClassName, ClassRef, Constant, DocComment, Enum, EnumBacking, EnumCase,
    Function, Interface, Method, Param, PhpFile, PhpType, Property, Trait, to_value,
};
use serde_json::json;

fn renderer(version: PhpVersion) -> Renderer {
    Renderer::with_context(version, RenderContext::new().indent(Indent::PSR12))
}

fn name(s: &str) -> ClassName {
    ClassName::parse(s).unwrap()
}

fn class_type(s: &str) -> PhpType {
    PhpType::class(name(s))
}

/// A value object whose constructor promotes every property.
fn money() -> Class {
    Class::new(name("App\\Money"))
        .final_()
        .property(Property::new("amount").ty(PhpType::Int).readonly())
        .unwrap()
        .property(Property::new("currency").ty(PhpType::String).readonly())
        .unwrap()
        .method(
            Method::constructor()
                .param(Param::new("amount").promote())
                .unwrap()
                .param(Param::new("currency").promote())
                .unwrap(),
        )
        .unwrap()
}

#[test]
fn test_class_php73_assigns_promoted_params() {
    let out = renderer(PhpVersion::Php73).render(&money()).unwrap();
    insta::assert_snapshot!(out, @r"
final class Money
{
    /** @var int */
    private $amount;

    /** @var string */
    private $currency;

    public function __construct(int $amount, string $currency)
    {
        $this->amount = $amount;
        $this->currency = $currency;
    }
}
");
}

#[test]
fn test_class_php74_typed_properties() {
    let out = renderer(PhpVersion::Php74).render(&money()).unwrap();
    insta::assert_snapshot!(out, @r"
final class Money
{
    private int $amount;

    private string $currency;

    public function __construct(int $amount, string $currency)
    {
        $this->amount = $amount;
        $this->currency = $currency;
    }
}
");
}

#[test]
fn test_class_php80_promotes() {
    let out = renderer(PhpVersion::Php80).render(&money()).unwrap();
    insta::assert_snapshot!(out, @r"
final class Money
{
    public function __construct(private int $amount, private string $currency)
    {
    }
}
");
}

#[test]
fn test_class_php81_readonly_promotion() {
    let out = renderer(PhpVersion::Php81).render(&money()).unwrap();
    insta::assert_snapshot!(out, @r"
final class Money
{
    public function __construct(private readonly int $amount, private readonly string $currency)
    {
    }
}
");
}

#[test]
fn test_readonly_class() {
    let point = Class::new(name("App\\Point"))
        .readonly()
        .property(Property::new("x").ty(PhpType::Int))
        .unwrap()
        .property(Property::new("y").ty(PhpType::Int))
        .unwrap()
        .method(
            Method::constructor()
                .param(Param::new("x").promote())
                .unwrap()
                .param(Param::new("y").promote())
                .unwrap(),
        )
        .unwrap();

    let out = renderer(PhpVersion::Php82).render(&point).unwrap();
    insta::assert_snapshot!(out, @r"
readonly class Point
{
    public function __construct(private int $x, private int $y)
    {
    }
}
");

    let out = renderer(PhpVersion::Php81).render(&point).unwrap();
    insta::assert_snapshot!(out, @r"
class Point
{
    public function __construct(private readonly int $x, private readonly int $y)
    {
    }
}
");
}

#[test]
fn test_promoted_properties_come_back_for_older_targets() {
    let price = Class::new(name("App\\Price"))
        .final_()
        .property(Property::new("amount").ty(PhpType::Int).readonly())
        .unwrap()
        .property(Property::new("currency").ty(PhpType::String).readonly())
        .unwrap()
        .property(Property::new("scale").ty(PhpType::Int).default(2))
        .unwrap()
        .method(
            Method::constructor()
                .param(Param::new("amount").promote())
                .unwrap()
                .param(Param::new("currency").promote())
                .unwrap()
                .param(Param::new("scale").promote())
                .unwrap(),
        )
        .unwrap();

    let out = renderer(PhpVersion::Php81).render(&price).unwrap();
    insta::assert_snapshot!(out, @r"
final class Price
{
    public function __construct(
        private readonly int $amount,
        private readonly string $currency,
        private int $scale = 2,
    ) {
    }
}
");

    // The same declaration, rendered again for a target without promotion.
    let out = renderer(PhpVersion::Php74).render(&price).unwrap();
    insta::assert_snapshot!(out, @r"
final class Price
{
    private int $amount;

    private string $currency;

    private int $scale = 2;

    public function __construct(
        int $amount,
        string $currency,
        int $scale = 2,
    ) {
        $this->amount = $amount;
        $this->currency = $currency;
        $this->scale = $scale;
    }
}
");
}

#[test]
fn test_native_enum() {
    let status = Enum::backed(name("App\\Status"), EnumBacking::String)
        .implements(name("App\\Contracts\\HasLabel"))
        .case(EnumCase::new("Active").value("active"))
        .unwrap()
        .case(
            EnumCase::new("Archived")
                .value("archived")
                .doc(DocComment::text("No longer listed.")),
        )
        .unwrap()
        .method(
            Method::new("label")
                .returns(PhpType::String)
                .line("return ucfirst($this->value);"),
        )
        .unwrap();

    let out = renderer(PhpVersion::Php81).render(&status).unwrap();
    insta::assert_snapshot!(out, @r"
enum Status: string implements HasLabel
{
    case Active = 'active';
    /**
     * No longer listed.
     */
    case Archived = 'archived';

    public function label(): string
    {
        return ucfirst($this->value);
    }
}
");
}

#[test]
fn test_emulated_enum() {
    let status = Enum::backed(name("App\\Status"), EnumBacking::String)
        .case(EnumCase::new("Active").value("active"))
        .unwrap()
        .case(EnumCase::new("Inactive").value("inactive"))
        .unwrap();

    let out = renderer(PhpVersion::Php74).render(&status).unwrap();
    insta::assert_snapshot!(out, @r"
final class Status implements JsonSerializable
{
    public const Active = 'active';
    public const Inactive = 'inactive';

    private string $value;

    /** @var self[] */
    private static array $instances = [];

    private function __construct(string $value)
    {
        $this->value = $value;
    }

    public static function Active(): self
    {
        return self::of(self::Active);
    }

    public static function Inactive(): self
    {
        return self::of(self::Inactive);
    }

    /** @return self[] */
    public static function cases(): array
    {
        return [
            self::Active(),
            self::Inactive(),
        ];
    }

    public function getValue(): string
    {
        return $this->value;
    }

    public static function from(string $value): self
    {
        foreach (self::cases() as $caseKey => $caseValue) {
            if ($caseValue->getValue() === $value) {
                return $caseValue;
            }
        }
        throw new InvalidArgumentException(sprintf('%s is not a valid %s', $value, self::class));
    }

    public function jsonSerialize(): string
    {
        return $this->value;
    }

    private static function of(string $value): self
    {
        if (!isset(self::$instances[$value])) {
            self::$instances[$value] = new self($value);
        }
        return self::$instances[$value];
    }
}
");
}

#[test]
fn test_file_imports_and_collisions() {
    let controller = Class::new(name("App\\Http\\Controllers\\UserController"))
        .extends(name("App\\Http\\Controllers\\Controller"))
        .implements(name("Psr\\Log\\LoggerAwareInterface"))
        .property(Property::new("users").ty(class_type("App\\Repositories\\UserRepository")))
        .unwrap()
        .method(
            Method::new("show")
                .param(Param::new("user").ty(class_type("App\\Models\\User")))
                .unwrap()
                .param(Param::new("actor").ty(class_type("Vendor\\Auth\\User")))
                .unwrap()
                .returns(class_type("Vendor\\Http\\Response"))
                .line("return $this->respond($user);"),
        )
        .unwrap();
    let file = PhpFile::for_declaration(controller).strict_types(true);

    let out = renderer(PhpVersion::Php81).render(&file).unwrap();
    insta::assert_snapshot!(out, @r"
<?php

declare(strict_types=1);

namespace App\Http\Controllers;

use App\Models\User;
use App\Repositories\UserRepository;
use Psr\Log\LoggerAwareInterface;
use Vendor\Http\Response;

class UserController extends Controller implements LoggerAwareInterface
{
    private UserRepository $users;

    public function show(User $user, \Vendor\Auth\User $actor): Response
    {
        return $this->respond($user);
    }
}
");
}

#[test]
fn test_file_with_function() {
    let function = Function::new(name("App\\Support\\format_money"))
        .param(Param::new("amount").ty(PhpType::Int))
        .unwrap()
        .returns(PhpType::String)
        .line("return number_format($amount / 100, 2);");
    let file = PhpFile::for_declaration(function);

    let out = renderer(PhpVersion::Php81).render(&file).unwrap();
    insta::assert_snapshot!(out, @r"
<?php

namespace App\Support;

function format_money(int $amount): string
{
    return number_format($amount / 100, 2);
}
");
}

#[test]
fn test_interface_signatures() {
    let repository = Interface::new(name("App\\Contracts\\Repository"))
        .extends(name("Countable"))
        .constant(Constant::new("PAGE_SIZE", 50))
        .unwrap()
        .method(
            Method::new("find")
                .param(Param::new("id").ty(PhpType::Int))
                .unwrap()
                .returns(PhpType::nullable(PhpType::Object)),
        )
        .unwrap()
        .method(Method::new("all").returns(PhpType::array_of(class_type("App\\Models\\User"))))
        .unwrap();

    let out = renderer(PhpVersion::Php80).render(&repository).unwrap();
    insta::assert_snapshot!(out, @r"
interface Repository extends Countable
{
    public const PAGE_SIZE = 50;

    public function find(int $id): ?object;

    /** @return User[] */
    public function all(): array;
}
");
}

#[test]
fn test_trait_on_untyped_target() {
    let timestamps = Trait::new(name("App\\Concerns\\HasTimestamps"))
        .property(
            Property::new("createdAt")
                .ty(PhpType::nullable(class_type("DateTimeImmutable")))
                .protected(),
        )
        .unwrap()
        .method(
            Method::new("touch")
                .returns(PhpType::Void)
                .line("$this->createdAt = new \\DateTimeImmutable();"),
        )
        .unwrap();

    let out = renderer(PhpVersion::Php73).render(&timestamps).unwrap();
    insta::assert_snapshot!(out, @r"
trait HasTimestamps
{
    /** @var DateTimeImmutable|null */
    protected $createdAt;

    public function touch(): void
    {
        $this->createdAt = new \DateTimeImmutable();
    }
}
");
}

#[test]
fn test_constant_from_json() {
    let defaults = to_value(&json!({"currency": "EUR", "scale": 2})).unwrap();
    let settings = Class::new(name("App\\Settings"))
        .constant(Constant::new("DEFAULTS", defaults))
        .unwrap();

    let out = renderer(PhpVersion::Php81).render(&settings).unwrap();
    insta::assert_snapshot!(out, @r"
class Settings
{
    public const DEFAULTS = [
        'currency' => 'EUR',
        'scale' => 2,
    ];
}
");
}

fn post() -> Class {
    let author = PhpType::Class(ClassRef {
        name: name("App\\Author"),
        capabilities: Capabilities::default().with_to_array("toArray"),
    });
    Class::new(name("App\\Post"))
        .final_()
        .property(Property::new("author").ty(PhpType::nullable(author)))
        .unwrap()
}

#[test]
fn test_json_serialize_uses_nullsafe_when_available() {
    let mut class = post();
    synth::add_json_serialize(&mut class, PhpVersion::Php80).unwrap();

    let out = renderer(PhpVersion::Php80).render(&class).unwrap();
    insta::assert_snapshot!(out, @r"
final class Post implements JsonSerializable
{
    private ?Author $author;

    public function jsonSerialize(): array
    {
        return [
            'author' => $this->author?->toArray(),
        ];
    }
}
");
}

#[test]
fn test_json_serialize_checks_null_before_nullsafe() {
    let mut class = post();
    synth::add_json_serialize(&mut class, PhpVersion::Php74).unwrap();

    let out = renderer(PhpVersion::Php74).render(&class).unwrap();
    insta::assert_snapshot!(out, @r"
final class Post implements JsonSerializable
{
    private ?Author $author;

    public function jsonSerialize(): array
    {
        return [
            'author' => $this->author === null ? null : $this->author->toArray(),
        ];
    }
}
");
}

#[test]
fn test_nested_indentation_is_uniform() {
    let ctx = RenderContext::new().indent(Indent::PSR12);
    let renderer = Renderer::with_context(PhpVersion::Php74, ctx.clone());
    let class = money();

    let lines = renderer.render_class(&class).unwrap();
    let top = flatten(&ctx, &lines, 0).unwrap();
    let nested = flatten(&ctx, &lines, 1).unwrap();

    let expected: String = top
        .lines()
        .map(|line| {
            if line.is_empty() {
                "\n".to_string()
            } else {
                format!("    {}\n", line)
            }
        })
        .collect();
    assert_eq!(nested, expected);
}

#[test]
fn test_line_limit_controls_wrapping() {
    let method = Method::new("send")
        .param(Param::new("to").ty(PhpType::String))
        .unwrap()
        .param(Param::new("subject").ty(PhpType::String))
        .unwrap()
        .returns(PhpType::Bool)
        .line("return true;");
    let mailer = Class::new(name("App\\Mailer")).method(method).unwrap();

    let narrow = Renderer::with_context(
        PhpVersion::Php81,
        RenderContext::new().indent(Indent::PSR12).max_line_length(40),
    );
    insta::assert_snapshot!(narrow.render(&mailer).unwrap(), @r"
class Mailer
{
    public function send(
        string $to,
        string $subject,
    ): bool {
        return true;
    }
}
");

    let wide = Renderer::with_context(
        PhpVersion::Php81,
        RenderContext::new().indent(Indent::PSR12),
    );
    insta::assert_snapshot!(wide.render(&mailer).unwrap(), @r"
class Mailer
{
    public function send(string $to, string $subject): bool
    {
        return true;
    }
}
");
}
