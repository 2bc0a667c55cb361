//! Custom application forms built by HR and the answers candidates submit.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::ValidateEmail;

use crate::domain::types::{
    ApplicationId, CandidateId, FormId, FormResponseId, FormTitle, HubId, JobId,
    TypeConstraintError, UserId, text_enum,
};

text_enum! {
    /// Input widget of a form field.
    FormFieldType {
        Text => "text",
        Textarea => "textarea",
        Email => "email",
        Number => "number",
        Select => "select",
        Radio => "radio",
        Checkbox => "checkbox",
        Date => "date",
        File => "file",
    }
}

impl FormFieldType {
    /// Field types whose answers must come from `options`.
    pub fn has_options(self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FormField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FormFieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

impl FormField {
    fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }

    fn pattern(&self) -> Option<&str> {
        self.validation.as_ref().and_then(|v| v.pattern.as_deref())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Form {
    pub id: FormId,
    pub hub_id: HubId,
    pub job_id: Option<JobId>,
    pub title: FormTitle,
    pub description: Option<String>,
    pub fields: Vec<FormField>,
    pub is_active: bool,
    pub created_by: UserId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewForm {
    pub hub_id: HubId,
    pub job_id: Option<JobId>,
    pub title: FormTitle,
    pub description: Option<String>,
    pub fields: Vec<FormField>,
    pub created_by: UserId,
}

impl NewForm {
    /// Builds a form after checking its field definitions.
    pub fn try_new(
        hub_id: HubId,
        job_id: Option<JobId>,
        title: FormTitle,
        description: Option<String>,
        fields: Vec<FormField>,
        created_by: UserId,
    ) -> Result<Self, TypeConstraintError> {
        validate_fields(&fields)?;
        Ok(Self {
            hub_id,
            job_id,
            title,
            description,
            fields,
            created_by,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct UpdateForm {
    pub title: Option<FormTitle>,
    pub description: Option<String>,
    pub fields: Option<Vec<FormField>>,
    pub is_active: Option<bool>,
}

impl UpdateForm {
    pub fn deactivate() -> Self {
        Self {
            is_active: Some(false),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FormResponse {
    pub id: FormResponseId,
    pub form_id: FormId,
    pub application_id: Option<ApplicationId>,
    pub candidate_id: Option<CandidateId>,
    pub answers: Map<String, Value>,
    pub submitted_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewFormResponse {
    pub form_id: FormId,
    pub application_id: Option<ApplicationId>,
    pub candidate_id: Option<CandidateId>,
    pub answers: Map<String, Value>,
}

/// Checks field definitions: unique non-empty ids, labels, options where needed,
/// sane numeric bounds and compilable patterns.
pub fn validate_fields(fields: &[FormField]) -> Result<(), TypeConstraintError> {
    if fields.is_empty() {
        return Err(invalid("form must have at least one field"));
    }

    let mut seen: Vec<&str> = Vec::with_capacity(fields.len());
    for field in fields {
        let id = field.id.trim();
        if id.is_empty() {
            return Err(invalid("field id cannot be empty"));
        }
        if seen.contains(&id) {
            return Err(invalid(format!("duplicate field id `{id}`")));
        }
        seen.push(id);

        if field.label.trim().is_empty() {
            return Err(invalid(format!("field `{id}` needs a label")));
        }
        if field.field_type.has_options()
            && field.options().iter().all(|o| o.trim().is_empty())
        {
            return Err(invalid(format!("field `{id}` needs options")));
        }
        if let Some(validation) = &field.validation {
            if let (Some(min), Some(max)) = (validation.min, validation.max)
                && min > max
            {
                return Err(invalid(format!("field `{id}` has min greater than max")));
            }
            if let Some(pattern) = &validation.pattern
                && Regex::new(pattern).is_err()
            {
                return Err(invalid(format!("field `{id}` has an invalid pattern")));
            }
        }
    }
    Ok(())
}

/// Checks submitted answers against the form fields.
///
/// Every problem is reported, joined into one message. Answers for unknown
/// field ids are ignored.
pub fn validate_answers(
    fields: &[FormField],
    answers: &Map<String, Value>,
) -> Result<(), TypeConstraintError> {
    let problems: Vec<String> = fields
        .iter()
        .filter_map(|field| check_answer(field, answers.get(&field.id)).err())
        .collect();

    if problems.is_empty() {
        Ok(())
    } else {
        Err(TypeConstraintError::InvalidValue(problems.join("; ")))
    }
}

fn check_answer(field: &FormField, value: Option<&Value>) -> Result<(), String> {
    let label = field.label.as_str();
    let value = match value {
        Some(v) if !is_blank(v) => v,
        _ if field.required => return Err(format!("{label} is required")),
        _ => return Ok(()),
    };

    match field.field_type {
        FormFieldType::Text | FormFieldType::Textarea => {
            let text = value
                .as_str()
                .ok_or_else(|| format!("{label} must be text"))?;
            if let Some(pattern) = field.pattern() {
                let re = Regex::new(pattern).map_err(|_| format!("{label} has an invalid pattern"))?;
                if !re.is_match(text) {
                    return Err(format!("{label} has an invalid format"));
                }
            }
            Ok(())
        }
        FormFieldType::Email => match value.as_str() {
            Some(text) if text.trim().validate_email() => Ok(()),
            _ => Err(format!("{label} must be a valid email")),
        },
        FormFieldType::Number => {
            let number = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }
            .ok_or_else(|| format!("{label} must be a number"))?;
            if let Some(validation) = &field.validation {
                if validation.min.is_some_and(|min| number < min) {
                    return Err(format!("{label} is below the minimum"));
                }
                if validation.max.is_some_and(|max| number > max) {
                    return Err(format!("{label} is above the maximum"));
                }
            }
            Ok(())
        }
        FormFieldType::Date => match value.as_str() {
            Some(text) if NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").is_ok() => Ok(()),
            _ => Err(format!("{label} must be a date (YYYY-MM-DD)")),
        },
        FormFieldType::Select | FormFieldType::Radio => match value.as_str() {
            Some(choice) if field.options().iter().any(|o| o == choice) => Ok(()),
            _ => Err(format!("{label} must be one of the offered options")),
        },
        FormFieldType::Checkbox => {
            let choices = value
                .as_array()
                .ok_or_else(|| format!("{label} must be a list of options"))?;
            let all_known = choices.iter().all(|choice| {
                choice
                    .as_str()
                    .is_some_and(|c| field.options().iter().any(|o| o == c))
            });
            if all_known {
                Ok(())
            } else {
                Err(format!("{label} contains an unknown option"))
            }
        }
        FormFieldType::File => Ok(()),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn invalid(message: impl Into<String>) -> TypeConstraintError {
    TypeConstraintError::InvalidValue(message.into())
}
