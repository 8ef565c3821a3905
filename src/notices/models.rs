//! Notice Models
//! Mission: Define the stored notice and the loosely-typed client fields

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// A stored notice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
    pub posted_by: Option<String>, // free-text label, not a user reference
    pub date: DateTime<Utc>,
    pub pinned: bool,
}

/// Client-supplied notice fields, used for both create and partial update.
///
/// Text fields are tri-state: absent (`None`) leaves the stored value alone,
/// explicit null (`Some(None)`) clears it, and a value replaces it. Values are
/// coerced the way a loose document schema would: numbers and booleans become
/// text, `date` takes RFC 3339, a bare `YYYY-MM-DD` (midnight UTC) or epoch
/// milliseconds, `pinned` takes `"true"`/`"false"`/`1`/`0`. A null `date` or
/// `pinned` counts as absent since the stored record always has both.
/// Unknown keys, including `id`, are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NoticeFields {
    #[serde(default, deserialize_with = "nullable_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable_text", skip_serializing_if = "Option::is_none")]
    pub body: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable_text", skip_serializing_if = "Option::is_none")]
    pub posted_by: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient_date", skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_flag", skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
}

impl NoticeFields {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(Some(title.to_string())),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(Some(body.to_string()));
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(Some(category.to_string()));
        self
    }

    pub fn with_posted_by(mut self, posted_by: &str) -> Self {
        self.posted_by = Some(Some(posted_by.to_string()));
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_pinned(mut self, pinned: bool) -> Self {
        self.pinned = Some(pinned);
        self
    }

    pub fn clearing_body(mut self) -> Self {
        self.body = Some(None);
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextInput {
    Text(String),
    Int(i64),
    Float(f64),
    Flag(bool),
}

impl TextInput {
    fn into_text(self) -> String {
        match self {
            TextInput::Text(s) => s,
            TextInput::Int(n) => n.to_string(),
            TextInput::Float(x) => x.to_string(),
            TextInput::Flag(b) => b.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DateInput {
    Millis(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagInput {
    Flag(bool),
    Int(i64),
    Text(String),
}

/// Only called when the key is present, so null maps to `Some(None)`.
fn nullable_text<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextInput>::deserialize(deserializer)?;
    Ok(Some(value.map(TextInput::into_text)))
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<DateInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(DateInput::Millis(ms)) => DateTime::<Utc>::from_timestamp_millis(ms)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("date out of range: {}", ms))),
        Some(DateInput::Text(s)) => parse_date(&s)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date: {}", s))),
    }
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FlagInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FlagInput::Flag(b)) => Ok(Some(b)),
        Some(FlagInput::Int(1)) => Ok(Some(true)),
        Some(FlagInput::Int(0)) => Ok(Some(false)),
        Some(FlagInput::Text(s)) => match s.as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(de::Error::custom(format!("invalid boolean: {}", s))),
        },
        Some(FlagInput::Int(n)) => Err(de::Error::custom(format!("invalid boolean: {}", n))),
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Dates are stored with millisecond precision.
pub(crate) fn to_stored_precision(date: DateTime<Utc>) -> DateTime<Utc> {
    date.trunc_subsecs(3)
}
