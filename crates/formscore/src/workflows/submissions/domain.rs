use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier wrapper for stored submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

/// Identifier of the form a submission was posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormId(pub u64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw value posted for a single form field.
///
/// Anything that is neither a string nor a flat list is kept as `Other` and
/// ignored by every text check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            FieldValue::List(_) | FieldValue::Other(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(value) => value.is_empty(),
            FieldValue::List(values) => values.is_empty(),
            FieldValue::Other(value) => match value {
                serde_json::Value::Null => true,
                serde_json::Value::Bool(flag) => !flag,
                serde_json::Value::Number(number) => number.as_f64() == Some(0.0),
                serde_json::Value::Array(items) => items.is_empty(),
                serde_json::Value::Object(entries) => entries.is_empty(),
                serde_json::Value::String(text) => text.is_empty(),
            },
        }
    }

    /// Text rendering used when a submission is flattened for keyword scans.
    pub fn flatten(&self) -> String {
        match self {
            FieldValue::Text(value) => value.clone(),
            FieldValue::List(values) => values.join(", "),
            FieldValue::Other(_) => String::new(),
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => FieldValue::Text(text),
            serde_json::Value::Array(items) if items.iter().all(serde_json::Value::is_string) => {
                FieldValue::List(
                    items
                        .into_iter()
                        .filter_map(|item| match item {
                            serde_json::Value::String(text) => Some(text),
                            _ => None,
                        })
                        .collect(),
                )
            }
            other => FieldValue::Other(other),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(FieldValue::from)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::List(values)
    }
}

/// Free-form field map posted by a form.
///
/// Entries keep their insertion (or JSON document) order. Every "first
/// matching field" rule in the scorers walks the fields in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    fields: Vec<(String, FieldValue)>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a field. Replacing keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// String-valued entries only, in submission order.
    pub fn text_values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(|(_, value)| value.as_text())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Submission
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut submission = Submission::new();
        for (name, value) in iter {
            submission.insert(name, value);
        }
        submission
    }
}

impl Serialize for Submission {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Submission {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SubmissionVisitor;

        impl<'de> Visitor<'de> for SubmissionVisitor {
            type Value = Submission;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to form values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut submission = Submission::new();
                while let Some((name, value)) = access.next_entry::<String, FieldValue>()? {
                    submission.insert(name, value);
                }
                Ok(submission)
            }
        }

        deserializer.deserialize_map(SubmissionVisitor)
    }
}

/// Quality band used to steer sample generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityTier {
    pub const ALL: [QualityTier; 4] = [
        QualityTier::Excellent,
        QualityTier::Good,
        QualityTier::Fair,
        QualityTier::Poor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Excellent => "excellent",
            QualityTier::Good => "good",
            QualityTier::Fair => "fair",
            QualityTier::Poor => "poor",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Input widget type declared by a form template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    #[serde(alias = "phone")]
    Tel,
    Textarea,
    Select,
    Checkbox,
    Radio,
    #[serde(other)]
    Other,
}

/// Template field consumed by the sample data generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// Canned values a template supplies for one field at one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileValue {
    Fixed(String),
    Pool(Vec<String>),
}

/// Form blueprint with optional per-tier sample pools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormTemplate {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub sample_data_profiles: BTreeMap<QualityTier, BTreeMap<String, ProfileValue>>,
}

impl FormTemplate {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
            sample_data_profiles: BTreeMap::new(),
        }
    }

    pub fn profile_value(&self, tier: QualityTier, field: &str) -> Option<&ProfileValue> {
        self.sample_data_profiles
            .get(&tier)
            .and_then(|profile| profile.get(field))
    }

    /// Parses a template document and rejects blueprints the generator
    /// cannot use.
    pub fn from_json(document: &str) -> Result<Self, TemplateError> {
        let template: FormTemplate = serde_json::from_str(document)?;
        template.validate()?;
        Ok(template)
    }

    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.fields.is_empty() {
            return Err(TemplateError::NoFields(self.name.clone()));
        }

        let mut seen = std::collections::BTreeSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(TemplateError::UnnamedField);
            }
            if !seen.insert(field.name.as_str()) {
                return Err(TemplateError::DuplicateField(field.name.clone()));
            }
            let needs_options = matches!(
                field.kind,
                FieldKind::Select | FieldKind::Radio | FieldKind::Checkbox
            );
            if needs_options && field.options.is_empty() {
                return Err(TemplateError::MissingOptions(field.name.clone()));
            }
        }

        Ok(())
    }

    /// Contact form used by the demo command and sample-data tests.
    pub fn contact_inquiry() -> Self {
        FormTemplate::new(
            "Contact Inquiry",
            vec![
                FieldDescriptor::new("full_name", FieldKind::Text).required(),
                FieldDescriptor::new("email", FieldKind::Email).required(),
                FieldDescriptor::new("phone", FieldKind::Tel),
                FieldDescriptor::new("company", FieldKind::Text),
                FieldDescriptor::new("subject", FieldKind::Text),
                FieldDescriptor::new("message", FieldKind::Textarea).required(),
                FieldDescriptor::new("services", FieldKind::Checkbox).with_options([
                    "Consulting",
                    "Implementation",
                    "Training",
                    "Support",
                    "Other",
                ]),
                FieldDescriptor::new("preferred_contact", FieldKind::Radio).with_options([
                    "Email",
                    "Phone",
                    "Video call",
                    "No preference",
                ]),
                FieldDescriptor::new("budget", FieldKind::Select).with_options([
                    "$50k+",
                    "$20k-$50k",
                    "$5k-$20k",
                    "Under $5k",
                    "Not sure",
                ]),
            ],
        )
    }
}

/// Reasons a form template document is rejected.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("template '{0}' declares no fields")]
    NoFields(String),
    #[error("template field is missing a name")]
    UnnamedField,
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),
    #[error("choice field '{0}' has no options")]
    MissingOptions(String),
}
