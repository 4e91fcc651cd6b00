use serde::Serialize;

/// Fetch parameters sent with every list request. The store caps pages at
/// 100 records and nothing here walks further pages; collections beyond
/// the limit are silently truncated, matching the backend's observed use.
#[derive(Debug, Clone, Serialize)]
pub struct FetchQuery {
    pub fields: Vec<String>,
    #[serde(rename = "orderBy")]
    pub order_by: Vec<OrderBy>,
    #[serde(rename = "pagingInfo")]
    pub paging: PagingInfo,
}

impl FetchQuery {
    /// The standard list query: the entity's field projection, newest
    /// records first (store order is descending by `Id`).
    pub fn for_fields(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            order_by: vec![OrderBy::descending("Id")],
            paging: PagingInfo::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    #[serde(rename = "sorttype")]
    pub sort_type: String,
}

impl OrderBy {
    pub fn descending(field: &str) -> Self {
        Self {
            field_name: field.to_string(),
            sort_type: "DESC".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PagingInfo {
    pub limit: usize,
    pub offset: usize,
}

impl Default for PagingInfo {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
        }
    }
}
