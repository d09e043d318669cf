// File: src/form.rs
// Purpose: Form model - fields, values, validity state and snapshots

use museum_forms_validation::FieldRule;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Which pipeline a form belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Booking,
    Contact,
}

impl FormKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::Booking => "booking",
            FormKind::Contact => "contact",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Control type backing a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Select,
    Date,
    Textarea,
    Checkbox,
    Radio,
    Hidden,
}

/// Current value of a control.
///
/// Checkboxes carry an explicit boolean; every other control carries text,
/// including a radio group, whose text is the chosen option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Checked(bool),
    Text(String),
}

impl FieldValue {
    /// Text content; empty for checkboxes
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::Checked(_) => "",
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self, FieldValue::Checked(true))
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
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

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Checked(value)
    }
}

/// Validity of a field as last computed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldState {
    #[default]
    Unvalidated,
    Valid,
    Invalid(String),
}

/// One form control with its value and validity
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: String,
    kind: FieldKind,
    required: bool,
    rule: Option<FieldRule>,
    options: Vec<String>,
    default: FieldValue,
    value: FieldValue,
    state: FieldState,
}

impl Field {
    /// Create a field; its rule comes from the shared field-identity table.
    pub fn new(key: impl Into<String>, kind: FieldKind) -> Self {
        let key = key.into();
        let default = match kind {
            FieldKind::Checkbox => FieldValue::Checked(false),
            _ => FieldValue::default(),
        };

        Self {
            rule: FieldRule::for_field(&key),
            key,
            kind,
            required: false,
            options: Vec::new(),
            value: default.clone(),
            default,
            state: FieldState::Unvalidated,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        self.rule = Some(rule);
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

    /// Value the field returns to on reset
    pub fn with_default(mut self, default: impl Into<FieldValue>) -> Self {
        self.default = default.into();
        self.value = self.default.clone();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn rule(&self) -> Option<FieldRule> {
        self.rule
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FieldState::Invalid(message) => Some(message),
            _ => None,
        }
    }

    pub(crate) fn set_state(&mut self, state: FieldState) {
        self.state = state;
    }

    /// Whether a choice control can hold `value`. A select may always be
    /// emptied; a radio group always has one of its options chosen.
    fn accepts_option(&self, value: &str) -> bool {
        match self.kind {
            FieldKind::Select if value.is_empty() => true,
            FieldKind::Select | FieldKind::Radio if !self.options.is_empty() => {
                self.options.iter().any(|o| o == value)
            }
            _ => true,
        }
    }

    fn accepts(&self, value: &FieldValue) -> bool {
        match (self.kind, value) {
            (FieldKind::Checkbox, FieldValue::Checked(_)) => true,
            (FieldKind::Checkbox, FieldValue::Text(_)) => false,
            (_, FieldValue::Checked(_)) => false,
            (_, FieldValue::Text(text)) => self.accepts_option(text),
        }
    }

    /// Applies a value coming from a persisted draft.
    ///
    /// Checkboxes take the stored boolean (legacy `"on"` text counts as checked),
    /// radios and selects only take one of their options, text controls take
    /// any text. Returns whether the value was applied.
    fn restore(&mut self, stored: &FieldValue) -> bool {
        match (self.kind, stored) {
            (FieldKind::Checkbox, FieldValue::Checked(checked)) => {
                self.value = FieldValue::Checked(*checked);
                true
            }
            (FieldKind::Checkbox, FieldValue::Text(text)) => {
                self.value = FieldValue::Checked(text == "on" || text == "true");
                true
            }
            (FieldKind::Radio | FieldKind::Select, FieldValue::Text(text)) => {
                if self.accepts_option(text) {
                    self.value = stored.clone();
                    true
                } else {
                    false
                }
            }
            (_, FieldValue::Text(_)) => {
                self.value = stored.clone();
                true
            }
            (_, FieldValue::Checked(_)) => false,
        }
    }

    fn reset(&mut self) {
        self.value = self.default.clone();
        self.state = FieldState::Unvalidated;
    }
}

/// A form: an ordered set of fields owned by one pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    kind: FormKind,
    fields: Vec<Field>,
}

impl Form {
    pub fn new(kind: FormKind, fields: Vec<Field>) -> Self {
        Self { kind, fields }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub(crate) fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.field(key).map(Field::value)
    }

    /// Text of a field; empty when the field is missing or a checkbox
    pub fn text(&self, key: &str) -> &str {
        self.value(key).map(FieldValue::as_text).unwrap_or("")
    }

    pub fn is_checked(&self, key: &str) -> bool {
        self.value(key).is_some_and(FieldValue::is_checked)
    }

    /// Sets a field's value. Returns `false`, leaving the field untouched, for
    /// unknown keys and for values the control cannot hold (text in a
    /// checkbox, a choice that is not one of the options).
    pub fn set_value(&mut self, key: &str, value: impl Into<FieldValue>) -> bool {
        let value = value.into();
        match self.field_mut(key) {
            Some(field) if field.accepts(&value) => {
                field.value = value;
                true
            }
            _ => false,
        }
    }

    /// Replaces a select's choices, keeping the current value only when it is
    /// still one of them.
    pub fn set_options<I, S>(&mut self, key: &str, options: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(field) = self.field_mut(key) else {
            return false;
        };

        field.options = options.into_iter().map(Into::into).collect();
        if !field.accepts_option(field.value.as_text()) {
            field.value = FieldValue::default();
        }
        true
    }

    /// Current value of every field, in form order
    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot(
            self.fields
                .iter()
                .map(|f| (f.key.clone(), f.value.clone()))
                .collect(),
        )
    }

    /// Applies every snapshot entry whose key names a field of this form.
    /// Returns how many values were applied.
    pub fn restore(&mut self, snapshot: &FormSnapshot) -> usize {
        let mut applied = 0;
        for (key, value) in snapshot.iter() {
            if let Some(field) = self.field_mut(key) {
                if field.restore(value) {
                    applied += 1;
                }
            }
        }
        applied
    }

    /// Returns every field to its default value and clears validity.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.reset();
        }
    }
}

/// Field values at one instant, in form order.
///
/// Serialises as a flat JSON object: `{"name":"Maria","terms":true}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormSnapshot(Vec<(String, FieldValue)>);

impl FormSnapshot {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Text of an entry; empty when absent or a checkbox
    pub fn text(&self, key: &str) -> &str {
        self.get(key).map(FieldValue::as_text).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FormSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FormSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = FormSnapshot;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a flat object of field values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, FieldValue>()? {
                    entries.push((key, value));
                }
                Ok(FormSnapshot(entries))
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}
