//! Integration tests for `#[derive(HostObject)]`.

use fnspec::{FromValue, HostObject, Value};

/// No attributes: the Rust name, no readable fields.
#[derive(Debug, Clone, HostObject)]
struct Opaque {
    #[allow(dead_code)]
    secret: i32,
}

#[test]
fn test_plain_derive() {
    let value = Value::object(Opaque { secret: 1 });
    assert_eq!(value.type_name(), "Opaque");
    let Value::Object(obj) = &value else {
        panic!("expected an object");
    };
    assert_eq!(obj.field("secret"), None);
    assert!(obj.set_field("secret", Value::Int(2)).is_err());
}

/// Renamed type and field.
#[derive(Debug, Clone, PartialEq, HostObject)]
#[fnspec(name = "game.Player", eq)]
struct Player {
    #[fnspec(get)]
    health: i32,
    #[fnspec(get, name = "displayName")]
    name: String,
    #[fnspec(get)]
    alive: bool,
}

#[test]
fn test_named_fields() {
    let player = Player {
        health: 90,
        name: "ann".to_string(),
        alive: true,
    };
    assert_eq!(player.type_name(), "game.Player");
    assert_eq!(player.field("health"), Some(Value::Int(90)));
    assert_eq!(player.field("displayName"), Some(Value::from("ann")));
    assert_eq!(player.field("name"), None);
    assert_eq!(player.field("alive"), Some(Value::Boolean(true)));
}

#[test]
fn test_eq_and_downcast() {
    let a = Value::object(Player {
        health: 1,
        name: String::new(),
        alive: false,
    });
    let b = Value::object(Player {
        health: 1,
        name: String::new(),
        alive: false,
    });
    assert_eq!(a, b);
    assert!(!a.same(&b));
    assert_eq!(Player::from_value(a).unwrap().health, 1);
    assert!(Player::from_value(Value::Int(1)).is_err());
}

/// Without `eq`, only the same object is equal.
#[derive(Debug, Clone, PartialEq, HostObject)]
struct Token {
    #[fnspec(get)]
    id: i64,
}

#[test]
fn test_identity_without_eq() {
    let a = Value::object(Token { id: 1 });
    assert_ne!(a, Value::object(Token { id: 1 }));
    assert_eq!(a, a.clone());
}

/// `display` switches rendering to `Display`.
#[derive(Debug, HostObject)]
#[fnspec(display)]
struct Celsius {
    #[fnspec(get)]
    degrees: f64,
}

impl std::fmt::Display for Celsius {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°C", self.degrees)
    }
}

#[test]
fn test_display() {
    let value = Value::object(Celsius { degrees: 21.5 });
    assert_eq!(value.to_string(), "21.5°C");
    assert_eq!(Value::object(Token { id: 3 }).to_string(), "Token { id: 3 }");
}

/// Generic structs keep their bounds.
#[derive(Debug, Clone, HostObject)]
struct Wrapper<T: Clone + std::fmt::Debug + Send + Sync + 'static>
where
    Value: From<T>,
{
    #[fnspec(get)]
    inner: T,
}

#[test]
fn test_generic_derive() {
    let wrapper = Wrapper { inner: 2.5f64 };
    assert_eq!(wrapper.field("inner"), Some(Value::Double(2.5)));
}

mod renamed {
    pub use fnspec_core as vocabulary;
}

/// `crate = "..."` points generated code at a re-export.
#[derive(Debug, HostObject)]
#[fnspec(crate = "renamed::vocabulary")]
struct Pathed {
    #[fnspec(get)]
    n: i16,
}

#[test]
fn test_crate_path() {
    assert_eq!(Pathed { n: 4 }.field("n"), Some(Value::Short(4)));
}
