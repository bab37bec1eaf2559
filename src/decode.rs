//! Decoding of SQLite values into JSON

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use sqlx::sqlite::{SqliteRow, SqliteValueRef};
use sqlx::{Column, Decode, Row, Sqlite, TypeInfo, ValueRef};

use crate::Error;
use crate::result_set::ResultRow;

/// Convert one SQLite value to JSON.
///
/// Dispatches on the value's storage class, not the declared column type, so
/// a `BOOLEAN` column reads back as an integer and a `DATETIME` column as text.
///
/// Integers stay integers, reals become JSON numbers, text stays text and
/// blobs are base64-encoded. Non-finite reals have no JSON form and decode
/// to `null`.
pub(crate) fn to_json(column: &str, value: SqliteValueRef<'_>) -> Result<JsonValue, Error> {
   if value.is_null() {
      return Ok(JsonValue::Null);
   }

   let type_name = value.type_info().name().to_string();
   let decode_err = |source| Error::Decode {
      column: column.to_string(),
      source,
   };

   let json = match type_name.as_str() {
      "INTEGER" => {
         JsonValue::from(<i64 as Decode<'_, Sqlite>>::decode(value).map_err(decode_err)?)
      }
      "REAL" => {
         let real = <f64 as Decode<'_, Sqlite>>::decode(value).map_err(decode_err)?;
         serde_json::Number::from_f64(real).map_or(JsonValue::Null, JsonValue::Number)
      }
      "TEXT" => {
         JsonValue::String(<String as Decode<'_, Sqlite>>::decode(value).map_err(decode_err)?)
      }
      "BLOB" => {
         let bytes = <Vec<u8> as Decode<'_, Sqlite>>::decode(value).map_err(decode_err)?;
         JsonValue::String(STANDARD.encode(bytes))
      }
      other => return Err(Error::UnsupportedDatatype(other.to_string())),
   };

   Ok(json)
}

/// Helper to decode SQLite rows to JSON
pub(crate) fn decode_rows(rows: Vec<SqliteRow>) -> Result<Vec<ResultRow>, Error> {
   let mut values = Vec::with_capacity(rows.len());
   for row in rows {
      let mut value = IndexMap::default();
      for (i, column) in row.columns().iter().enumerate() {
         let raw = row.try_get_raw(i).map_err(|e| Error::Decode {
            column: column.name().to_string(),
            source: Box::new(e),
         })?;
         value.insert(column.name().to_string(), to_json(column.name(), raw)?);
      }
      values.push(value);
   }
   Ok(values)
}
