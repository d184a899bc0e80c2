//! The surgery record and the rules for creating and changing one.
//!
//! Request bodies arrive as lenient [`api_shared::SurgeryReq`] values. They are validated here
//! into either a [`NewSurgery`] (everything required is present) or a [`SurgeryChanges`] (only the
//! supplied fields, each of which must be valid). All violations in one request are reported
//! together.

use crate::{SurgeryError, SurgeryResult};
use api_shared::{wire, PatientReq, SurgeryReq};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surgery_types::{NonEmptyText, SurgeryStatus};
use surgery_uuid::ShardableUuid;

/// A persisted surgery document.
///
/// This is also the on-disk JSON shape, so a stored document and an API response read the same.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surgery {
    pub id: ShardableUuid,
    pub date_time: DateTime<Utc>,
    pub surgery_type: NonEmptyText,
    pub surgeon: NonEmptyText,
    pub patient: Patient,
    pub status: SurgeryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Patient embedded in a surgery. Has no identity of its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub name: NonEmptyText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

/// A validated surgery that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSurgery {
    pub date_time: DateTime<Utc>,
    pub surgery_type: NonEmptyText,
    pub surgeon: NonEmptyText,
    pub patient: Patient,
    pub status: SurgeryStatus,
}

/// A validated partial update. `None` fields are left as they are.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SurgeryChanges {
    pub date_time: Option<DateTime<Utc>>,
    pub surgery_type: Option<NonEmptyText>,
    pub surgeon: Option<NonEmptyText>,
    pub patient: Option<Patient>,
    pub status: Option<SurgeryStatus>,
}

impl NewSurgery {
    /// Validates a creation request. A missing or null `status` defaults to `scheduled`.
    ///
    /// # Errors
    ///
    /// Returns [`SurgeryError::Validation`] naming every missing or blank required field.
    pub fn from_request(req: SurgeryReq) -> SurgeryResult<Self> {
        let mut violations = Violations::default();

        let date_time = violations.required("dateTime", req.date_time.flatten());
        let surgery_type = violations.required_text("surgeryType", req.surgery_type.flatten());
        let surgeon = violations.required_text("surgeon", req.surgeon.flatten());
        let patient = violations.patient(req.patient.flatten());
        let status = req.status.flatten().unwrap_or_default();

        violations.into_result()?;

        match (date_time, surgery_type, surgeon, patient) {
            (Some(date_time), Some(surgery_type), Some(surgeon), Some(patient)) => Ok(Self {
                date_time,
                surgery_type,
                surgeon,
                patient,
                status,
            }),
            _ => Err(SurgeryError::Validation("incomplete surgery".into())),
        }
    }
}

impl SurgeryChanges {
    /// Validates an update request. Absent fields stay untouched; `null` on any field is an error.
    ///
    /// # Errors
    ///
    /// Returns [`SurgeryError::Validation`] naming every field that was nulled or blanked.
    pub fn from_request(req: SurgeryReq) -> SurgeryResult<Self> {
        let mut violations = Violations::default();

        let changes = Self {
            date_time: req
                .date_time
                .and_then(|v| violations.required("dateTime", v)),
            surgery_type: req
                .surgery_type
                .and_then(|v| violations.required_text("surgeryType", v)),
            surgeon: req
                .surgeon
                .and_then(|v| violations.required_text("surgeon", v)),
            patient: req.patient.and_then(|v| violations.patient(v)),
            status: req.status.and_then(|v| violations.status(v)),
        };

        violations.into_result()?;
        Ok(changes)
    }

    /// The change applied by the cancel operation, whatever the current status.
    pub fn cancel() -> Self {
        Self {
            status: Some(SurgeryStatus::Cancelled),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Surgery {
    pub(crate) fn create(id: ShardableUuid, new: NewSurgery, now: DateTime<Utc>) -> Self {
        Self {
            id,
            date_time: new.date_time,
            surgery_type: new.surgery_type,
            surgeon: new.surgeon,
            patient: new.patient,
            status: new.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites every field present in `changes` and stamps `updated_at`.
    pub fn apply(&mut self, changes: SurgeryChanges, now: DateTime<Utc>) {
        if let Some(date_time) = changes.date_time {
            self.date_time = date_time;
        }
        if let Some(surgery_type) = changes.surgery_type {
            self.surgery_type = surgery_type;
        }
        if let Some(surgeon) = changes.surgeon {
            self.surgeon = surgeon;
        }
        if let Some(patient) = changes.patient {
            self.patient = patient;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = now;
    }
}

impl From<Surgery> for wire::Surgery {
    fn from(surgery: Surgery) -> Self {
        Self {
            id: surgery.id.to_string(),
            date_time: surgery.date_time,
            surgery_type: surgery.surgery_type.into_string(),
            surgeon: surgery.surgeon.into_string(),
            patient: surgery.patient.into(),
            status: surgery.status,
            created_at: surgery.created_at,
            updated_at: surgery.updated_at,
        }
    }
}

impl From<Patient> for wire::PatientDetails {
    fn from(patient: Patient) -> Self {
        Self {
            name: patient.name.into_string(),
            birthdate: patient.birthdate,
            age: patient.age,
        }
    }
}

#[derive(Default)]
struct Violations(Vec<String>);

impl Violations {
    fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.0.push(format!("{field} is required"));
        }
        value
    }

    fn required_text(&mut self, field: &str, value: Option<String>) -> Option<NonEmptyText> {
        let text = value.and_then(|v| NonEmptyText::new(v).ok());
        self.required(field, text)
    }

    fn patient(&mut self, value: Option<PatientReq>) -> Option<Patient> {
        let Some(req) = value else {
            self.0.push("patient.name is required".into());
            return None;
        };
        let name = self.required_text("patient.name", req.name)?;
        Some(Patient {
            name,
            birthdate: req.birthdate,
            age: req.age,
        })
    }

    fn status(&mut self, value: Option<SurgeryStatus>) -> Option<SurgeryStatus> {
        if value.is_none() {
            self.0
                .push("status must be one of scheduled, completed, cancelled".into());
        }
        value
    }

    fn into_result(self) -> SurgeryResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(SurgeryError::Validation(self.0.join(", ")))
        }
    }
}
