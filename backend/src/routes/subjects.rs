use serde::{Deserialize, Serialize};

use crate::models::SubjectCode;

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectCodeInfo {
    pub code: SubjectCode,
    pub title: String,
}

impl From<SubjectCode> for SubjectCodeInfo {
    fn from(code: SubjectCode) -> Self {
        Self {
            code,
            title: code.title().to_string(),
        }
    }
}

/// The full subject catalog, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectCodeList {
    pub subject_codes: Vec<SubjectCodeInfo>,
}

impl SubjectCodeList {
    pub fn catalog() -> Self {
        Self {
            subject_codes: SubjectCode::ALL.iter().copied().map(Into::into).collect(),
        }
    }
}

pub const FETCH_ALL_SUBJECT_CODES: &str = "fetch_all_subject_codes";
