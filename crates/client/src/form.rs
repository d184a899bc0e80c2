//! Editable form state and the conversions between form inputs and wire values.
//!
//! The schedule time is edited as a local `YYYY-MM-DDTHH:MM` string in the viewer's timezone and
//! travels as a UTC instant. The birthdate is edited as `YYYY-MM-DD` and travels as UTC midnight
//! of that date.

use crate::{ClientError, ClientResult};
use api_shared::{PatientReq, Surgery, SurgeryReq, SurgeryStatus};
use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATETIME_INPUT_FORMAT_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Render a UTC instant as a local datetime input value.
pub fn to_datetime_input<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> String {
    at.with_timezone(tz)
        .naive_local()
        .format(DATETIME_INPUT_FORMAT)
        .to_string()
}

/// Parse a local datetime input value back into a UTC instant.
///
/// Seconds are accepted but not required. A local time that falls in a DST gap is rejected; an
/// ambiguous one resolves to the earlier instant.
pub fn parse_datetime_input<Tz: TimeZone>(input: &str, tz: &Tz) -> ClientResult<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(input, DATETIME_INPUT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(input, DATETIME_INPUT_FORMAT_SECONDS))
        .map_err(|_| {
            ClientError::InvalidInput(format!("dateTime '{input}' is not YYYY-MM-DDTHH:MM"))
        })?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(at) | LocalResult::Ambiguous(at, _) => Ok(at.with_timezone(&Utc)),
        LocalResult::None => Err(ClientError::InvalidInput(format!(
            "dateTime '{input}' does not exist in the local timezone"
        ))),
    }
}

pub fn to_date_input(at: &DateTime<Utc>) -> String {
    at.date_naive().format(DATE_INPUT_FORMAT).to_string()
}

/// Parse a date input value into UTC midnight of that date.
pub fn parse_date_input(input: &str) -> ClientResult<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(input, DATE_INPUT_FORMAT).map_err(|_| {
        ClientError::InvalidInput(format!("patient.birthdate '{input}' is not YYYY-MM-DD"))
    })?;
    date.and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| ClientError::InvalidInput(format!("patient.birthdate '{input}'")))
}

/// One editable field of the surgery form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    DateTime,
    SurgeryType,
    Surgeon,
    PatientName,
    PatientBirthdate,
    PatientAge,
    Status,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::DateTime,
        Field::SurgeryType,
        Field::Surgeon,
        Field::PatientName,
        Field::PatientBirthdate,
        Field::PatientAge,
        Field::Status,
    ];

    /// Wire name of the field, as used in server validation messages.
    pub fn name(self) -> &'static str {
        match self {
            Field::DateTime => "dateTime",
            Field::SurgeryType => "surgeryType",
            Field::Surgeon => "surgeon",
            Field::PatientName => "patient.name",
            Field::PatientBirthdate => "patient.birthdate",
            Field::PatientAge => "patient.age",
            Field::Status => "status",
        }
    }
}

/// Snapshot of the detail form, with every input held as the text the user sees.
///
/// Text fields are not validated here; the server decides what is required.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SurgeryForm {
    pub date_time: String,
    pub surgery_type: String,
    pub surgeon: String,
    pub patient_name: String,
    pub patient_birthdate: String,
    pub patient_age: String,
    pub status: SurgeryStatus,
}

impl SurgeryForm {
    pub fn from_surgery<Tz: TimeZone>(surgery: &Surgery, tz: &Tz) -> Self {
        Self {
            date_time: to_datetime_input(&surgery.date_time, tz),
            surgery_type: surgery.surgery_type.clone(),
            surgeon: surgery.surgeon.clone(),
            patient_name: surgery.patient.name.clone(),
            patient_birthdate: surgery
                .patient
                .birthdate
                .as_ref()
                .map(to_date_input)
                .unwrap_or_default(),
            patient_age: surgery
                .patient
                .age
                .map(|age| age.to_string())
                .unwrap_or_default(),
            status: surgery.status,
        }
    }

    /// A copy of this form with `field` set to `value`.
    ///
    /// Only the status is checked eagerly, since it is a closed set.
    pub fn with(&self, field: Field, value: &str) -> ClientResult<Self> {
        let mut next = self.clone();
        match field {
            Field::DateTime => next.date_time = value.to_owned(),
            Field::SurgeryType => next.surgery_type = value.to_owned(),
            Field::Surgeon => next.surgeon = value.to_owned(),
            Field::PatientName => next.patient_name = value.to_owned(),
            Field::PatientBirthdate => next.patient_birthdate = value.to_owned(),
            Field::PatientAge => next.patient_age = value.to_owned(),
            Field::Status => {
                next.status = value
                    .parse()
                    .map_err(|e| ClientError::InvalidInput(format!("{e}")))?;
            }
        }
        Ok(next)
    }

    /// Build a full-document request body from the form.
    ///
    /// An empty schedule is sent as `null` so the server reports it as missing. Empty optional
    /// patient fields are left out.
    pub fn to_request<Tz: TimeZone>(&self, tz: &Tz) -> ClientResult<SurgeryReq> {
        Ok(SurgeryReq {
            date_time: Some(self.parsed_date_time(tz)?),
            surgery_type: Some(Some(self.surgery_type.clone())),
            surgeon: Some(Some(self.surgeon.clone())),
            patient: Some(Some(PatientReq {
                name: Some(self.patient_name.clone()),
                birthdate: self.parsed_birthdate()?,
                age: self.parsed_age()?,
            })),
            status: Some(Some(self.status)),
        })
    }

    /// Build a partial request carrying only the fields edited since `source` was loaded.
    ///
    /// Untouched values are never re-parsed from their inputs, so precision the inputs cannot
    /// show (seconds, a birthdate's time of day) survives the update. The patient travels as a
    /// whole whenever any of its fields changed.
    pub fn to_update_request<Tz: TimeZone>(
        &self,
        source: &Surgery,
        tz: &Tz,
    ) -> ClientResult<SurgeryReq> {
        let loaded = Self::from_surgery(source, tz);
        let mut req = SurgeryReq::default();

        if self.date_time != loaded.date_time {
            req.date_time = Some(self.parsed_date_time(tz)?);
        }
        if self.surgery_type != loaded.surgery_type {
            req.surgery_type = Some(Some(self.surgery_type.clone()));
        }
        if self.surgeon != loaded.surgeon {
            req.surgeon = Some(Some(self.surgeon.clone()));
        }

        let birthdate_changed = self.patient_birthdate != loaded.patient_birthdate;
        let age_changed = self.patient_age != loaded.patient_age;
        if self.patient_name != loaded.patient_name || birthdate_changed || age_changed {
            req.patient = Some(Some(PatientReq {
                name: Some(self.patient_name.clone()),
                birthdate: if birthdate_changed {
                    self.parsed_birthdate()?
                } else {
                    source.patient.birthdate
                },
                age: if age_changed {
                    self.parsed_age()?
                } else {
                    source.patient.age
                },
            }));
        }

        if self.status != loaded.status {
            req.status = Some(Some(self.status));
        }
        Ok(req)
    }

    fn parsed_date_time<Tz: TimeZone>(&self, tz: &Tz) -> ClientResult<Option<DateTime<Utc>>> {
        if self.date_time.is_empty() {
            return Ok(None);
        }
        parse_datetime_input(&self.date_time, tz).map(Some)
    }

    fn parsed_birthdate(&self) -> ClientResult<Option<DateTime<Utc>>> {
        if self.patient_birthdate.is_empty() {
            return Ok(None);
        }
        parse_date_input(&self.patient_birthdate).map(Some)
    }

    fn parsed_age(&self) -> ClientResult<Option<u32>> {
        if self.patient_age.is_empty() {
            return Ok(None);
        }
        self.patient_age.parse::<u32>().map(Some).map_err(|_| {
            ClientError::InvalidInput(format!(
                "patient.age '{}' is not a non-negative integer",
                self.patient_age
            ))
        })
    }
}
