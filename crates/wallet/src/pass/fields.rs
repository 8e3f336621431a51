//! Pass fields and field groups.
//!
//! Fields are organized in five groups. Each group keeps its fields in
//! insertion order, which is the order they are laid out on the pass.

use crate::{Error, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// The area of the pass a field is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldGroup {
    Header,
    Primary,
    Secondary,
    Auxiliary,
    Back,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 5] = [
        FieldGroup::Header,
        FieldGroup::Primary,
        FieldGroup::Secondary,
        FieldGroup::Auxiliary,
        FieldGroup::Back,
    ];

    /// Key of the group inside the style dictionary of `pass.json`.
    pub fn json_key(&self) -> &'static str {
        match self {
            FieldGroup::Header => "headerFields",
            FieldGroup::Primary => "primaryFields",
            FieldGroup::Secondary => "secondaryFields",
            FieldGroup::Auxiliary => "auxiliaryFields",
            FieldGroup::Back => "backFields",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlignment {
    #[serde(rename = "PKTextAlignmentLeft")]
    Left,
    #[serde(rename = "PKTextAlignmentCenter")]
    Center,
    #[serde(rename = "PKTextAlignmentRight")]
    Right,
    #[serde(rename = "PKTextAlignmentNatural")]
    Natural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateStyle {
    #[serde(rename = "PKDateStyleNone")]
    None,
    #[serde(rename = "PKDateStyleShort")]
    Short,
    #[serde(rename = "PKDateStyleMedium")]
    Medium,
    #[serde(rename = "PKDateStyleLong")]
    Long,
    #[serde(rename = "PKDateStyleFull")]
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberStyle {
    #[serde(rename = "PKNumberStyleDecimal")]
    Decimal,
    #[serde(rename = "PKNumberStylePercent")]
    Percent,
    #[serde(rename = "PKNumberStyleScientific")]
    Scientific,
    #[serde(rename = "PKNumberStyleSpellOut")]
    SpellOut,
}

/// Value of a field.
///
/// Dates are written as ISO 8601 strings and formatted on device according to
/// the field's date and time styles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Date(DateTime<FixedOffset>),
    Text(String),
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

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        FieldValue::Date(value)
    }
}

/// A key/label/value record displayed on the pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub value: FieldValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributed_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_alignment: Option<TextAlignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_style: Option<DateStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_style: Option<DateStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_relative: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignores_time_zone: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_style: Option<NumberStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
}

impl Field {
    /// Create a field with a key, a label and a value.
    pub fn new(key: impl Into<String>, label: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            label: Some(label.into()),
            value: value.into(),
            attributed_value: None,
            change_message: None,
            text_alignment: None,
            date_style: None,
            time_style: None,
            is_relative: None,
            ignores_time_zone: None,
            number_style: None,
            currency_code: None,
        }
    }

    /// Create a date field shown with the same style for date and time.
    pub fn date(
        key: impl Into<String>,
        label: impl Into<String>,
        value: DateTime<FixedOffset>,
        style: DateStyle,
    ) -> Self {
        let mut field = Self::new(key, label, value);
        field.date_style = Some(style);
        field.time_style = Some(style);
        field
    }

    /// Create a currency amount field. `currency_code` is an ISO 4217 code.
    pub fn currency(
        key: impl Into<String>,
        label: impl Into<String>,
        amount: f64,
        currency_code: impl Into<String>,
    ) -> Self {
        let mut field = Self::new(key, label, amount);
        field.currency_code = Some(currency_code.into());
        field
    }

    /// Message shown when the field changes on update. Must contain `%@`.
    pub fn change_message(mut self, message: impl Into<String>) -> Self {
        self.change_message = Some(message.into());
        self
    }

    pub fn text_alignment(mut self, alignment: TextAlignment) -> Self {
        self.text_alignment = Some(alignment);
        self
    }

    /// Value with HTML links, shown on the back of the pass.
    pub fn attributed_value(mut self, html: impl Into<String>) -> Self {
        self.attributed_value = Some(html.into());
        self
    }

    pub fn number_style(mut self, style: NumberStyle) -> Self {
        self.number_style = Some(style);
        self
    }

    pub fn time_style(mut self, style: DateStyle) -> Self {
        self.time_style = Some(style);
        self
    }

    pub fn relative(mut self, relative: bool) -> Self {
        self.is_relative = Some(relative);
        self
    }

    pub fn ignores_time_zone(mut self, ignores: bool) -> Self {
        self.ignores_time_zone = Some(ignores);
        self
    }

    pub(crate) fn validate(&self, path: &str) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(Error::validation(format!("{path}.key"), "is required"));
        }

        if let Some(ref message) = self.change_message {
            if !message.contains("%@") {
                return Err(Error::validation(
                    format!("{path}.changeMessage"),
                    "must contain the %@ placeholder",
                ));
            }
        }

        let is_number = matches!(self.value, FieldValue::Number(_));
        let is_date = matches!(self.value, FieldValue::Date(_));

        if let FieldValue::Number(n) = self.value {
            if !n.is_finite() {
                return Err(Error::validation(format!("{path}.value"), "must be a finite number"));
            }
        }

        if let Some(ref code) = self.currency_code {
            if !is_number {
                return Err(Error::validation(
                    format!("{path}.currencyCode"),
                    "only applies to numeric values",
                ));
            }
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(Error::validation(
                    format!("{path}.currencyCode"),
                    format!("`{code}` is not an ISO 4217 code"),
                ));
            }
        }

        if self.number_style.is_some() && !is_number {
            return Err(Error::validation(
                format!("{path}.numberStyle"),
                "only applies to numeric values",
            ));
        }

        if self.number_style.is_some() && self.currency_code.is_some() {
            return Err(Error::validation(
                format!("{path}.numberStyle"),
                "cannot be combined with currencyCode",
            ));
        }

        let has_date_options = self.date_style.is_some()
            || self.time_style.is_some()
            || self.is_relative.is_some()
            || self.ignores_time_zone.is_some();
        if has_date_options && !is_date {
            return Err(Error::validation(
                format!("{path}.dateStyle"),
                "date options only apply to date values",
            ));
        }

        Ok(())
    }
}

/// The field groups of a pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassFields {
    header: Vec<Field>,
    primary: Vec<Field>,
    secondary: Vec<Field>,
    auxiliary: Vec<Field>,
    back: Vec<Field>,
}

impl PassFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field to the end of a group.
    pub fn push(&mut self, group: FieldGroup, field: Field) {
        self.group_mut(group).push(field);
    }

    /// Fields of one group, in display order.
    pub fn group(&self, group: FieldGroup) -> &[Field] {
        match group {
            FieldGroup::Header => &self.header,
            FieldGroup::Primary => &self.primary,
            FieldGroup::Secondary => &self.secondary,
            FieldGroup::Auxiliary => &self.auxiliary,
            FieldGroup::Back => &self.back,
        }
    }

    fn group_mut(&mut self, group: FieldGroup) -> &mut Vec<Field> {
        match group {
            FieldGroup::Header => &mut self.header,
            FieldGroup::Primary => &mut self.primary,
            FieldGroup::Secondary => &mut self.secondary,
            FieldGroup::Auxiliary => &mut self.auxiliary,
            FieldGroup::Back => &mut self.back,
        }
    }

    /// Iterate over every field along with its group.
    pub fn iter(&self) -> impl Iterator<Item = (FieldGroup, &Field)> {
        FieldGroup::ALL
            .into_iter()
            .flat_map(move |group| self.group(group).iter().map(move |field| (group, field)))
    }

    pub fn len(&self) -> usize {
        FieldGroup::ALL.iter().map(|g| self.group(*g).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate every field and check that keys are unique across groups.
    pub(crate) fn validate(&self) -> Result<()> {
        let mut keys = HashSet::new();
        for group in FieldGroup::ALL {
            for (index, field) in self.group(group).iter().enumerate() {
                let path = format!("{}[{index}]", group.json_key());
                field.validate(&path)?;
                if !keys.insert(field.key.as_str()) {
                    return Err(Error::validation(
                        format!("{path}.key"),
                        format!("duplicate field key `{}`", field.key),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Write the non-empty groups into a style dictionary.
    pub(crate) fn write_groups(&self, style: &mut Map<String, Value>) -> Result<()> {
        for group in FieldGroup::ALL {
            let fields = self.group(group);
            if !fields.is_empty() {
                style.insert(group.json_key().to_string(), serde_json::to_value(fields)?);
            }
        }
        Ok(())
    }
}
