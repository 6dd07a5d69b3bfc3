use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One row of the `Protest` sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ProtestRecord {
    #[serde(deserialize_with = "required_text")]
    #[schemars(with = "String")]
    pub slug: String,
    #[serde(rename = "naam", default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub name: Option<String>,
    #[serde(rename = "beschrijving", default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub description: Option<String>,
    #[serde(rename = "datum_start", default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub start_date: Option<String>,
    #[serde(rename = "datum_eind", default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub end_date: Option<String>,
    #[serde(rename = "locatie's", default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub locations: Option<String>,
    #[serde(rename = "classificatie's", default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub classifications: Option<String>, // comma separated prefLabels
    #[serde(
        rename = "thumbnail (foto op homepage)",
        default,
        deserialize_with = "optional_text"
    )]
    #[schemars(with = "Option<String>")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub wikidata: Option<String>,
    #[serde(rename = "extra informatie", default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub notes: Option<String>,
}

/// One row of the `Foto` sheet. `protest` refers to [`ProtestRecord::name`], not the slug.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PhotoRecord {
    #[serde(default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub index: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub uri: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub protest: Option<String>,
    #[serde(rename = "naam", default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub name: Option<String>,
    #[serde(rename = "beschrijving", default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub description: Option<String>,
    #[serde(rename = "datum_start", default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub start_date: Option<String>,
    #[serde(rename = "datum_eind", default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub end_date: Option<String>,
    #[serde(rename = "fotograaf", default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub photographer: Option<String>,
    #[serde(rename = "archief", default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub archive: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub url: Option<String>,
    #[serde(rename = "locatie", default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub location: Option<String>,
    #[serde(rename = "iiif_info_json", default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub image_info_url: Option<String>,
}

/// One row of the `Classificatie` sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ConceptRow {
    #[serde(rename = "prefLabel", default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub pref_label: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    #[schemars(with = "Option<String>")]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LangString {
    #[serde(rename = "@language")]
    pub language: String,
    #[serde(rename = "@value")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedLiteral {
    #[serde(rename = "@type")]
    pub datatype: String,
    #[serde(rename = "@value")]
    pub value: String,
}

impl TypedLiteral {
    pub fn date(value: impl Into<String>) -> Self {
        Self {
            datatype: "xsd:date".to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptDescriptor {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "skos:prefLabel")]
    pub pref_label: LangString,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "schema:name")]
    pub name: String,
}

impl Place {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            kind: "schema:Place".to_string(),
            name: name.into(),
        }
    }
}

/// schema.org summary of a protest, embedded in the manifest's `seeAlso`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDescription {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "schema:name")]
    pub name: String,
    #[serde(rename = "schema:description")]
    pub description: String,
    #[serde(rename = "schema:startDate")]
    pub start_date: TypedLiteral,
    #[serde(rename = "schema:endDate")]
    pub end_date: TypedLiteral,
    #[serde(rename = "schema:location")]
    pub location: Vec<Place>,
    #[serde(rename = "schema:additionalType")]
    pub additional_type: Vec<ConceptDescriptor>,
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(cell_text))
}

fn required_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    optional_text(deserializer)?.ok_or_else(|| serde::de::Error::custom("empty required cell"))
}

// Spreadsheet exports mix strings, numbers and blanks in one column.
fn cell_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
