use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    /// Rows after filtering.
    pub total: Option<i64>,
    /// Rows before filtering.
    pub unfiltered: Option<i64>,
    /// Ticket of the backend response the view was rendered from.
    pub revision: Option<u64>,
}

impl Meta {
    pub fn new(total: usize, unfiltered: usize, revision: u64) -> Self {
        Self {
            total: Some(total as i64),
            unfiltered: Some(unfiltered as i64),
            revision: Some(revision),
        }
    }

    pub fn revision(revision: u64) -> Self {
        Self {
            total: None,
            unfiltered: None,
            revision: Some(revision),
        }
    }

    pub fn empty() -> Self {
        Self {
            total: None,
            unfiltered: None,
            revision: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
