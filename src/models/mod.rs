// src/models/mod.rs

/// Closed enumeration stored in a text column under its snake_case name.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("unknown {} '{}'", stringify!($name), other)),
                }
            }
        }

        impl sqlx::Type<sqlx::MySql> for $name {
            fn type_info() -> sqlx::mysql::MySqlTypeInfo {
                <str as sqlx::Type<sqlx::MySql>>::type_info()
            }

            fn compatible(ty: &sqlx::mysql::MySqlTypeInfo) -> bool {
                <str as sqlx::Type<sqlx::MySql>>::compatible(ty)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::MySql> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::MySql as sqlx::database::HasArguments<'q>>::ArgumentBuffer,
            ) -> sqlx::encode::IsNull {
                <&str as sqlx::Encode<'q, sqlx::MySql>>::encode_by_ref(&self.as_str(), buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::MySql> for $name {
            fn decode(
                value: <sqlx::MySql as sqlx::database::HasValueRef<'r>>::ValueRef,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let text = <&str as sqlx::Decode<'r, sqlx::MySql>>::decode(value)?;
                Ok(text.parse::<$name>()?)
            }
        }
    };
}

pub mod comment;
pub mod project;
pub mod sprint;
pub mod task;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Longest name, title or person a `VARCHAR(255)` column holds.
pub const MAX_NAME_CHARS: usize = 255;

/// Upper bound for a single hours figure.
pub const MAX_HOURS: f64 = 1_000_000.0;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time at the precision a DATETIME(6) column keeps.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Trims `value` and rejects it when nothing is left.
pub fn required_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// `required_text` for columns capped at `MAX_NAME_CHARS`.
pub fn required_name(field: &str, value: &str) -> AppResult<String> {
    short_text(field, required_text(field, value)?)
}

pub fn short_text(field: &str, value: String) -> AppResult<String> {
    if value.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::InvalidInput(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_CHARS
        )));
    }
    Ok(value)
}

pub fn optional_text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

pub fn non_negative_hours(field: &str, hours: f64) -> AppResult<f64> {
    if !hours.is_finite() || !(0.0..=MAX_HOURS).contains(&hours) {
        return Err(AppError::InvalidInput(format!(
            "{} must be between 0 and {} hours",
            field, MAX_HOURS
        )));
    }
    Ok(hours)
}

/// Empty or blank foreign keys coming from forms mean "no reference".
pub fn normalize_ref(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
/// in partial updates. Use together with `#[serde(default)]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
