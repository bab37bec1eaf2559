//! Bound values and type tags
//!
//! [`Value`] is the typed way to hand data to a statement: every value knows
//! its own SQL type. The legacy shape, type tags such as `"sid"` or
//! `["s", "i", "d"]` zipped with a list of untyped values, is still accepted
//! through [`bind_tagged`], which converts it to [`Value`]s before anything is
//! bound.
//!
//! | tag | type    | accepted JSON                       |
//! |-----|---------|-------------------------------------|
//! | `s` | text    | string                              |
//! | `i` | integer | integer number                      |
//! | `d` | float   | any number                          |
//! | `b` | blob    | base64 string                       |
//!
//! JSON `null` binds SQL `NULL` under every tag.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::{Error, Result};

/// A value bound to one `?` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Value {
   Null,
   Text(String),
   Integer(i64),
   Float(f64),
   Blob(Vec<u8>),
}

impl Value {
   /// The type tag matching this value, `None` for `Null`.
   pub fn type_tag(&self) -> Option<TypeTag> {
      match self {
         Value::Null => None,
         Value::Text(_) => Some(TypeTag::Text),
         Value::Integer(_) => Some(TypeTag::Integer),
         Value::Float(_) => Some(TypeTag::Float),
         Value::Blob(_) => Some(TypeTag::Blob),
      }
   }
}

impl From<&str> for Value {
   fn from(value: &str) -> Self {
      Value::Text(value.to_owned())
   }
}

impl From<String> for Value {
   fn from(value: String) -> Self {
      Value::Text(value)
   }
}

impl From<i64> for Value {
   fn from(value: i64) -> Self {
      Value::Integer(value)
   }
}

impl From<i32> for Value {
   fn from(value: i32) -> Self {
      Value::Integer(value.into())
   }
}

impl From<u32> for Value {
   fn from(value: u32) -> Self {
      Value::Integer(value.into())
   }
}

impl From<f64> for Value {
   fn from(value: f64) -> Self {
      Value::Float(value)
   }
}

impl From<Vec<u8>> for Value {
   fn from(value: Vec<u8>) -> Self {
      Value::Blob(value)
   }
}

impl From<bool> for Value {
   fn from(value: bool) -> Self {
      Value::Integer(value.into())
   }
}

impl<T: Into<Value>> From<Option<T>> for Value {
   fn from(value: Option<T>) -> Self {
      value.map_or(Value::Null, Into::into)
   }
}

/// Native type a bound value is treated as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
   /// `s`
   Text,
   /// `i`
   Integer,
   /// `d`
   Float,
   /// `b`
   Blob,
}

impl TypeTag {
   pub fn from_char(tag: char) -> Result<Self> {
      match tag {
         's' => Ok(TypeTag::Text),
         'i' => Ok(TypeTag::Integer),
         'd' => Ok(TypeTag::Float),
         'b' => Ok(TypeTag::Blob),
         other => Err(Error::UnknownTypeTag(other)),
      }
   }

   pub fn as_char(self) -> char {
      match self {
         TypeTag::Text => 's',
         TypeTag::Integer => 'i',
         TypeTag::Float => 'd',
         TypeTag::Blob => 'b',
      }
   }

   /// Convert an untyped value according to this tag.
   ///
   /// `position` only feeds the error message.
   fn convert(self, position: usize, value: JsonValue) -> Result<Value> {
      let wrong_kind = |value: &JsonValue| Error::WrongValueKind {
         position,
         tag: self.as_char(),
         found: json_kind(value),
      };

      match (self, value) {
         (_, JsonValue::Null) => Ok(Value::Null),
         (TypeTag::Text, JsonValue::String(s)) => Ok(Value::Text(s)),
         (TypeTag::Integer, JsonValue::Number(n)) => match n.as_i64() {
            Some(i) => Ok(Value::Integer(i)),
            None => Err(wrong_kind(&JsonValue::Number(n))),
         },
         (TypeTag::Float, JsonValue::Number(n)) => match n.as_f64() {
            Some(f) => Ok(Value::Float(f)),
            None => Err(wrong_kind(&JsonValue::Number(n))),
         },
         (TypeTag::Blob, JsonValue::String(s)) => match STANDARD.decode(s.as_bytes()) {
            Ok(bytes) => Ok(Value::Blob(bytes)),
            Err(_) => Err(Error::WrongValueKind {
               position,
               tag: 'b',
               found: "a string that is not base64",
            }),
         },
         (_, other) => Err(wrong_kind(&other)),
      }
   }
}

fn json_kind(value: &JsonValue) -> &'static str {
   match value {
      JsonValue::Null => "null",
      JsonValue::Bool(_) => "a boolean",
      JsonValue::Number(n) if n.is_i64() || n.is_u64() => "an integer",
      JsonValue::Number(_) => "a float",
      JsonValue::String(_) => "a string",
      JsonValue::Array(_) => "an array",
      JsonValue::Object(_) => "an object",
   }
}

/// Parse a joined tag string such as `"sid"`.
pub fn parse_tags(tags: &str) -> Result<Vec<TypeTag>> {
   tags.chars().map(TypeTag::from_char).collect()
}

/// Parse a tag list such as `["s", "i", "d"]`, one character per entry.
pub fn parse_tag_list<S: AsRef<str>>(tags: &[S]) -> Result<Vec<TypeTag>> {
   tags
      .iter()
      .map(|tag| {
         let tag = tag.as_ref();
         let mut chars = tag.chars();
         match (chars.next(), chars.next()) {
            (Some(c), None) => TypeTag::from_char(c),
            _ => Err(Error::MalformedTypeTag(tag.to_string())),
         }
      })
      .collect()
}

/// Anything that names a sequence of type tags.
///
/// Implemented for joined tag strings (`"si"`), tag lists (`["s", "i"]`,
/// `&[String]`) and already parsed [`TypeTag`]s.
pub trait IntoTypeTags {
   fn into_type_tags(self) -> Result<Vec<TypeTag>>;
}

impl IntoTypeTags for &str {
   fn into_type_tags(self) -> Result<Vec<TypeTag>> {
      parse_tags(self)
   }
}

impl<S: AsRef<str>> IntoTypeTags for &[S] {
   fn into_type_tags(self) -> Result<Vec<TypeTag>> {
      parse_tag_list(self)
   }
}

impl<S: AsRef<str>, const N: usize> IntoTypeTags for [S; N] {
   fn into_type_tags(self) -> Result<Vec<TypeTag>> {
      parse_tag_list(&self)
   }
}

impl<S: AsRef<str>, const N: usize> IntoTypeTags for &[S; N] {
   fn into_type_tags(self) -> Result<Vec<TypeTag>> {
      parse_tag_list(self)
   }
}

impl IntoTypeTags for Vec<TypeTag> {
   fn into_type_tags(self) -> Result<Vec<TypeTag>> {
      Ok(self)
   }
}

impl IntoTypeTags for &[TypeTag] {
   fn into_type_tags(self) -> Result<Vec<TypeTag>> {
      Ok(self.to_vec())
   }
}

/// Zip type tags with untyped values into typed [`Value`]s.
///
/// Fails before converting anything when the counts differ.
pub fn bind_tagged(tags: impl IntoTypeTags, values: Vec<JsonValue>) -> Result<Vec<Value>> {
   let tags = tags.into_type_tags()?;
   if tags.len() != values.len() {
      return Err(Error::TagValueMismatch {
         tags: tags.len(),
         values: values.len(),
      });
   }

   tags
      .into_iter()
      .zip(values)
      .enumerate()
      .map(|(position, (tag, value))| tag.convert(position, value))
      .collect()
}

/// Helper function to bind a [`Value`] to a SQLx query
pub(crate) fn bind_value<'a>(
   query: sqlx::query::Query<'a, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'a>>,
   value: Value,
) -> sqlx::query::Query<'a, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'a>> {
   match value {
      Value::Null => query.bind(None::<String>),
      Value::Text(s) => query.bind(s),
      Value::Integer(i) => query.bind(i),
      Value::Float(f) => query.bind(f),
      Value::Blob(b) => query.bind(b),
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;

   #[test]
   fn test_bind_tagged_converts_positionally() {
      let values = bind_tagged(
         "sidb",
         vec![json!("Ada"), json!(30), json!(1.5), json!("SGVsbG8=")],
      )
      .unwrap();

      assert_eq!(
         values,
         vec![
            Value::Text("Ada".into()),
            Value::Integer(30),
            Value::Float(1.5),
            Value::Blob(b"Hello".to_vec()),
         ]
      );
   }

   #[test]
   fn test_float_tag_accepts_integers() {
      let values = bind_tagged("d", vec![json!(3)]).unwrap();
      assert_eq!(values, vec![Value::Float(3.0)]);
   }

   #[test]
   fn test_null_binds_under_any_tag() {
      let values = bind_tagged("sib", vec![json!(null), json!(null), json!(null)]).unwrap();
      assert!(values.iter().all(|v| *v == Value::Null));
   }

   #[test]
   fn test_length_mismatch_is_rejected() {
      let err = bind_tagged("si", vec![json!("Ada")]).unwrap_err();
      assert!(matches!(err, Error::TagValueMismatch { tags: 2, values: 1 }));

      let err = bind_tagged("s", vec![json!("Ada"), json!(30)]).unwrap_err();
      assert!(matches!(err, Error::TagValueMismatch { tags: 1, values: 2 }));
   }

   #[test]
   fn test_unknown_tag_is_rejected() {
      let err = bind_tagged("sx", vec![json!("a"), json!(1)]).unwrap_err();
      assert!(matches!(err, Error::UnknownTypeTag('x')));
   }

   #[test]
   fn test_wrong_kind_is_rejected() {
      let err = bind_tagged("si", vec![json!("Ada"), json!("thirty")]).unwrap_err();
      assert!(matches!(
         err,
         Error::WrongValueKind {
            position: 1,
            tag: 'i',
            found: "a string"
         }
      ));

      let err = bind_tagged("i", vec![json!(2.5)]).unwrap_err();
      assert!(matches!(err, Error::WrongValueKind { found: "a float", .. }));

      let err = bind_tagged("b", vec![json!("not base64!")]).unwrap_err();
      assert!(matches!(err, Error::WrongValueKind { tag: 'b', .. }));
   }

   #[test]
   fn test_parse_tag_list() {
      assert_eq!(
         parse_tag_list(&["s", "i"]).unwrap(),
         vec![TypeTag::Text, TypeTag::Integer]
      );
      assert!(matches!(
         parse_tag_list(&["si"]),
         Err(Error::MalformedTypeTag(_))
      ));
      assert!(matches!(
         parse_tag_list(&[""]),
         Err(Error::MalformedTypeTag(_))
      ));
   }

   #[test]
   fn test_bind_tagged_accepts_tag_lists() {
      let values = vec![json!("Ada"), json!(30)];
      let expected = vec![Value::Text("Ada".into()), Value::Integer(30)];

      assert_eq!(bind_tagged(["s", "i"], values.clone()).unwrap(), expected);

      let owned = vec!["s".to_string(), "i".to_string()];
      assert_eq!(
         bind_tagged(owned.as_slice(), values.clone()).unwrap(),
         expected
      );

      let parsed = parse_tag_list(&["s", "i"]).unwrap();
      assert_eq!(bind_tagged(parsed, values.clone()).unwrap(), expected);

      let err = bind_tagged(["s", "int"], values).unwrap_err();
      assert!(matches!(err, Error::MalformedTypeTag(tag) if tag == "int"));
   }

   #[test]
   fn test_type_tag_round_trips_through_char() {
      for tag in [TypeTag::Text, TypeTag::Integer, TypeTag::Float, TypeTag::Blob] {
         assert_eq!(TypeTag::from_char(tag.as_char()).unwrap(), tag);
      }
   }

   #[test]
   fn test_value_conversions() {
      assert_eq!(Value::from("a"), Value::Text("a".into()));
      assert_eq!(Value::from(7), Value::Integer(7));
      assert_eq!(Value::from(true), Value::Integer(1));
      assert_eq!(Value::from(None::<i64>), Value::Null);
      assert_eq!(Value::from(2.5).type_tag(), Some(TypeTag::Float));
   }
}
