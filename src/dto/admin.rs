use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct Totals {
    pub users: i64,
    pub candidates: i64,
    pub jobs: i64,
    pub applications: i64,
    pub interviews: i64,
}

/// Dashboard numbers of a hub.
#[derive(Debug, Serialize)]
pub struct SystemStats {
    pub totals: Totals,
    pub users_by_role: BTreeMap<&'static str, i64>,
    pub jobs_by_status: BTreeMap<&'static str, i64>,
    pub applications_by_status: BTreeMap<&'static str, i64>,
}
