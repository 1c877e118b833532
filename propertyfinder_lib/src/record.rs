//! The flat property record and its exported projection.

use std::fmt;

use serde::Serialize;
use serde_json::{Number, Value};

/// Fields extracted from a detail page but left out of the exported rows.
pub const EXCLUDED_FIELDS: [&str; 7] = [
    "share_url",
    "reference",
    "video_id",
    "live_viewing",
    "listed_date",
    "project",
    "is_under_offer_by_competitor",
];

/// Column names of the exported table, in order.
pub const EXPORT_COLUMNS: [&str; 32] = [
    "ID",
    "PROPERTY_TYPE",
    "PRICE",
    "AD_TITLE",
    "LOCATION_DESCRIPTION",
    "LOCATION_COORDINATES_LAT_LON",
    "IMAGES",
    "AGENT_NAME",
    "AGENT_EMAIL",
    "AGENT_SOCIAL",
    "AGENT_LANGUAGES",
    "BROKER_NAME",
    "BROKER_LOGO",
    "BROKER_ADDRESS",
    "BROKER_EMAIL",
    "BROKER_PHONE",
    "IS_VERIFIED",
    "IS_DIRECT_FROM_DEVELOPER",
    "IS_NEW_CONSTRUCTION",
    "IS_AVAILABLE",
    "IS_NEW_INSERT",
    "BEDROOMS",
    "BATHROOMS",
    "SIZE",
    "CONTACT_OPTIONS",
    "IMAGES_COUNT",
    "AMENITIES",
    "COMPLETION_STATUS",
    "FURNISHED",
    "VIEW_360",
    "OFFERING_TYPE",
    "DESCRIPTION",
];

/// A scalar whose JSON type varies between listings, such as bedroom
/// counts (`3`, `"studio"`) or the furnished flag (`true`, `"partly"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    Number(Number),
    Flag(bool),
    Text(String),
    Null,
}

impl FieldValue {
    /// Converts a scalar JSON value. Arrays and objects are not scalars.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::Bool(b) => Some(Self::Flag(*b)),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Null => Some(Self::Null),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Flag(b) => write!(f, "{}", b),
            Self::Text(s) => f.write_str(s),
            Self::Null => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContactOption {
    pub kind: String,
    pub value: String,
}

/// Contact options keyed by type.
///
/// Inserting a type that is already present replaces its value but keeps
/// its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ContactOptions(Vec<ContactOption>);

impl ContactOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: impl Into<String>, value: impl Into<String>) {
        let kind = kind.into();
        let value = value.into();
        match self.0.iter_mut().find(|o| o.kind == kind) {
            Some(existing) => existing.value = value,
            None => self.0.push(ContactOption { kind, value }),
        }
    }

    pub fn get(&self, kind: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|o| o.kind == kind)
            .map(|o| o.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContactOption> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Human-readable `'type': 'value'` pairs joined with `", "`.
    ///
    /// Lossy: values containing quotes or commas are not escaped, so the
    /// result is for display only.
    pub fn render(&self) -> String {
        self.0
            .iter()
            .map(|o| format!("'{}': '{}'", o.kind, o.value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContactOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (kind, value) in iter {
            options.insert(kind, value);
        }
        options
    }
}

/// Every field extracted from one property detail page.
///
/// List-valued fields keep their structured form; [`DetailRecord::to_export_row`]
/// renders them as joined strings.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRecord {
    pub id: String,
    pub property_type: String,
    pub price: String,
    pub ad_title: String,
    pub location_description: String,
    pub location_coordinates_lat_lon: String,
    pub images: Vec<String>,
    pub agent_name: String,
    pub agent_email: String,
    pub agent_social: String,
    pub agent_languages: Vec<String>,
    pub broker_name: String,
    pub broker_logo: String,
    pub broker_address: String,
    pub broker_email: String,
    pub broker_phone: String,
    pub is_verified: bool,
    pub is_direct_from_developer: bool,
    pub is_new_construction: bool,
    pub is_available: bool,
    pub is_new_insert: bool,
    pub live_viewing: Option<bool>,
    pub bedrooms: FieldValue,
    pub bathrooms: FieldValue,
    pub size: String,
    pub share_url: String,
    pub reference: String,
    pub listed_date: String,
    pub contact_options: ContactOptions,
    pub images_count: i64,
    pub project: Option<Value>,
    pub amenities: Vec<String>,
    pub completion_status: String,
    pub furnished: FieldValue,
    pub view_360: Option<String>,
    pub offering_type: String,
    pub video_id: Option<String>,
    pub is_under_offer_by_competitor: bool,
    pub description: String,
}

impl DetailRecord {
    pub fn images_joined(&self) -> String {
        self.images.join(", ")
    }

    pub fn agent_languages_joined(&self) -> String {
        self.agent_languages.join(", ")
    }

    pub fn amenities_joined(&self) -> String {
        self.amenities.join(", ")
    }

    /// Projects the record onto the exported columns, dropping
    /// [`EXCLUDED_FIELDS`].
    pub fn to_export_row(&self) -> ExportRow {
        ExportRow {
            id: self.id.clone(),
            property_type: self.property_type.clone(),
            price: self.price.clone(),
            ad_title: self.ad_title.clone(),
            location_description: self.location_description.clone(),
            location_coordinates_lat_lon: self.location_coordinates_lat_lon.clone(),
            images: self.images_joined(),
            agent_name: self.agent_name.clone(),
            agent_email: self.agent_email.clone(),
            agent_social: self.agent_social.clone(),
            agent_languages: self.agent_languages_joined(),
            broker_name: self.broker_name.clone(),
            broker_logo: self.broker_logo.clone(),
            broker_address: self.broker_address.clone(),
            broker_email: self.broker_email.clone(),
            broker_phone: self.broker_phone.clone(),
            is_verified: self.is_verified,
            is_direct_from_developer: self.is_direct_from_developer,
            is_new_construction: self.is_new_construction,
            is_available: self.is_available,
            is_new_insert: self.is_new_insert,
            bedrooms: self.bedrooms.to_string(),
            bathrooms: self.bathrooms.to_string(),
            size: self.size.clone(),
            contact_options: self.contact_options.render(),
            images_count: self.images_count,
            amenities: self.amenities_joined(),
            completion_status: self.completion_status.clone(),
            furnished: self.furnished.to_string(),
            view_360: self.view_360.clone(),
            offering_type: self.offering_type.clone(),
            description: self.description.clone(),
        }
    }
}

/// One exported row. Two rows are duplicates when every column matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ExportRow {
    pub id: String,
    pub property_type: String,
    pub price: String,
    pub ad_title: String,
    pub location_description: String,
    pub location_coordinates_lat_lon: String,
    pub images: String,
    pub agent_name: String,
    pub agent_email: String,
    pub agent_social: String,
    pub agent_languages: String,
    pub broker_name: String,
    pub broker_logo: String,
    pub broker_address: String,
    pub broker_email: String,
    pub broker_phone: String,
    pub is_verified: bool,
    pub is_direct_from_developer: bool,
    pub is_new_construction: bool,
    pub is_available: bool,
    pub is_new_insert: bool,
    pub bedrooms: String,
    pub bathrooms: String,
    pub size: String,
    pub contact_options: String,
    pub images_count: i64,
    pub amenities: String,
    pub completion_status: String,
    pub furnished: String,
    pub view_360: Option<String>,
    pub offering_type: String,
    pub description: String,
}
