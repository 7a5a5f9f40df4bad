use crate::models::OpData;
use serde::Serialize;

/// JSON view of a stored record, with the id rendered as a hex string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpDataResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<OpData> for OpDataResponse {
    fn from(record: OpData) -> Self {
        Self {
            id: record.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
        }
    }
}

/// Payload carried by a [`MessageResponse`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnvelopeData {
    Id(String),
    Count(u64),
    Record(OpDataResponse),
    Records(Vec<OpDataResponse>),
}

/// Envelope returned by the mutation endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<EnvelopeData>,
}

impl MessageResponse {
    pub fn with_data(message: impl Into<String>, data: EnvelopeData) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}
