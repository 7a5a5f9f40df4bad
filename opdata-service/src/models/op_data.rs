use mongodb::bson::{self, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

/// A stored record. `id` is `None` until the store assigns one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpData {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Client-supplied fields for create and update. Any `_id` in the body is
/// dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpDataPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl OpDataPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }

    /// Fields to `$set`; absent fields are left out so they stay untouched.
    pub fn to_set_document(&self) -> Result<Document, bson::ser::Error> {
        bson::to_document(self)
    }

    /// Merge the present fields over `record`.
    pub fn apply_to(&self, record: &mut OpData) {
        if let Some(first_name) = &self.first_name {
            record.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &self.last_name {
            record.last_name = Some(last_name.clone());
        }
        if let Some(email) = &self.email {
            record.email = Some(email.clone());
        }
    }
}

impl From<OpDataPatch> for OpData {
    fn from(patch: OpDataPatch) -> Self {
        Self {
            id: None,
            first_name: patch.first_name,
            last_name: patch.last_name,
            email: patch.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_new_record_omits_id_and_absent_fields() {
        let record = OpData::from(OpDataPatch {
            first_name: Some("Ann".to_string()),
            last_name: None,
            email: Some("a@x.com".to_string()),
        });

        let document = bson::to_document(&record).unwrap();
        assert_eq!(document, doc! { "first_name": "Ann", "email": "a@x.com" });
    }

    #[test]
    fn test_patch_ignores_supplied_id() {
        let patch: OpDataPatch =
            serde_json::from_str(r#"{"_id":"65a1b2c3d4e5f60718293a4b","last_name":"Lee"}"#)
                .unwrap();

        assert_eq!(patch.last_name.as_deref(), Some("Lee"));
        assert_eq!(
            patch.to_set_document().unwrap(),
            doc! { "last_name": "Lee" }
        );
    }

    #[test]
    fn test_apply_keeps_unspecified_fields() {
        let mut record = OpData {
            id: Some(ObjectId::new()),
            first_name: Some("Ann".to_string()),
            last_name: None,
            email: Some("a@x.com".to_string()),
        };
        let before = record.clone();

        OpDataPatch {
            last_name: Some("Lee".to_string()),
            ..Default::default()
        }
        .apply_to(&mut record);

        assert_eq!(record.id, before.id);
        assert_eq!(record.first_name, before.first_name);
        assert_eq!(record.email, before.email);
        assert_eq!(record.last_name.as_deref(), Some("Lee"));
    }

    #[test]
    fn test_empty_patch() {
        assert!(OpDataPatch::default().is_empty());
        assert!(!OpDataPatch {
            email: Some(String::new()),
            ..Default::default()
        }
        .is_empty());
    }
}
