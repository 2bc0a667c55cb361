use serde::Serialize;

use crate::domain::form::Form;

#[derive(Debug, Serialize)]
pub struct FormListItem {
    #[serde(flatten)]
    pub form: Form,
    pub job_title: Option<String>,
    pub response_count: i64,
}
