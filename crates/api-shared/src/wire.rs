//! JSON wire models for the surgery REST API.
//!
//! Field names are camelCase on the wire. Responses always carry a complete record; request
//! bodies are lenient (every field optional) so that the server, not the deserialiser, decides
//! which missing fields are errors and can say so by name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use surgery_types::SurgeryStatus;
use utoipa::ToSchema;

/// A persisted surgery as returned by the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Surgery {
    pub id: String,
    pub date_time: DateTime<Utc>,
    pub surgery_type: String,
    pub surgeon: String,
    pub patient: PatientDetails,
    pub status: SurgeryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Patient embedded in a surgery response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetails {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

/// Body of `POST /surgeries` and `PUT /surgeries/{id}`.
///
/// Top-level fields distinguish "absent" (`None`) from "explicitly null" (`Some(None)`): a partial
/// update leaves absent fields untouched, while `null` on a required field is rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurgeryReq {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub date_time: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub surgery_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub surgeon: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<PatientReq>)]
    pub patient: Option<Option<PatientReq>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<SurgeryStatus>)]
    pub status: Option<Option<SurgeryStatus>>,
}

/// Patient sub-record in a request body. Supplying it replaces the stored patient as a whole.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientReq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

impl From<&Surgery> for SurgeryReq {
    /// A full-document request that would rewrite every editable field of `surgery`.
    fn from(surgery: &Surgery) -> Self {
        Self {
            date_time: Some(Some(surgery.date_time)),
            surgery_type: Some(Some(surgery.surgery_type.clone())),
            surgeon: Some(Some(surgery.surgeon.clone())),
            patient: Some(Some(PatientReq {
                name: Some(surgery.patient.name.clone()),
                birthdate: surgery.patient.birthdate,
                age: surgery.patient.age,
            })),
            status: Some(Some(surgery.status)),
        }
    }
}

/// Response of create, update and cancel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SurgeryMessageRes {
    pub message: String,
    pub surgery: Surgery,
}

/// Error body for every non-2xx response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

// Marks a field as present even when its JSON value is `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
