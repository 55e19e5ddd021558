//! Identifier case conversion.

use std::str::FromStr;

use crate::Error;

/// Split an identifier into lowercase words.
///
/// Word boundaries are `_`, `-`, spaces, lower-to-upper transitions and the
/// last capital of an acronym (`HTTPServer` -> `http`, `server`).
fn words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

/// Convert to camelCase (e.g. "hello_world" -> "helloWorld")
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::new();
    for (i, word) in words(s).iter().enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

/// Convert to PascalCase (e.g. "hello_world" -> "HelloWorld")
pub fn to_pascal_case(s: &str) -> String {
    words(s).iter().map(|w| capitalize(w)).collect()
}

/// Convert to snake_case (e.g. "HelloWorld" -> "hello_world")
pub fn to_snake_case(s: &str) -> String {
    words(s).join("_")
}

/// Convert to UPPER_SNAKE_CASE (e.g. "inProgress" -> "IN_PROGRESS")
pub fn to_upper_snake_case(s: &str) -> String {
    to_snake_case(s).to_uppercase()
}

/// A named case transform, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Camel,
    Pascal,
    Snake,
    UpperSnake,
}

impl Case {
    /// Apply the transform.
    pub fn apply(&self, s: &str) -> String {
        match self {
            Self::Camel => to_camel_case(s),
            Self::Pascal => to_pascal_case(s),
            Self::Snake => to_snake_case(s),
            Self::UpperSnake => to_upper_snake_case(s),
        }
    }
}

impl FromStr for Case {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "camel" | "camelCase" => Ok(Self::Camel),
            "pascal" | "PascalCase" => Ok(Self::Pascal),
            "snake" | "snake_case" => Ok(Self::Snake),
            "upper_snake" | "UPPER_SNAKE" => Ok(Self::UpperSnake),
            other => Err(Error::invalid_argument(format!(
                "unknown case transform '{}', expected camel, pascal, snake or upper_snake",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("hello_world"), "helloWorld");
        assert_eq!(to_camel_case("HelloWorld"), "helloWorld");
        assert_eq!(to_camel_case("in-progress"), "inProgress");
        assert_eq!(to_camel_case("ACTIVE"), "active");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("hello"), "Hello");
        assert_eq!(to_pascal_case("hello_world"), "HelloWorld");
        assert_eq!(to_pascal_case("createdAt"), "CreatedAt");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("HelloWorld"), "hello_world");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("address2Line"), "address2_line");
        assert_eq!(to_snake_case("hello-world"), "hello_world");
    }

    #[test]
    fn test_to_upper_snake_case() {
        assert_eq!(to_upper_snake_case("inProgress"), "IN_PROGRESS");
        assert_eq!(to_upper_snake_case("Active"), "ACTIVE");
    }

    #[test]
    fn test_case_from_str() {
        assert_eq!("camel".parse::<Case>().unwrap(), Case::Camel);
        assert_eq!("UPPER_SNAKE".parse::<Case>().unwrap(), Case::UpperSnake);
        assert!(matches!(
            "kebab".parse::<Case>(),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(Case::Pascal.apply("user_id"), "UserId");
    }
}
