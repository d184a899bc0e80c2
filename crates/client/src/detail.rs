//! Detail view: shows one surgery and buffers edits until they are saved or discarded.
//!
//! The view keeps two copies of the form. `pristine` mirrors the last server response and
//! `working` holds the user's edits; the view is dirty whenever they differ. Saving an existing
//! record sends only the fields that differ from the record it was loaded from.

use crate::form::{Field, SurgeryForm};
use crate::route::DetailTarget;
use crate::{ClientResult, SurgeryClient};
use api_shared::{Surgery, SurgeryReq};
use chrono::{Local, TimeZone};

#[derive(Clone, Debug, PartialEq, Eq)]
enum State {
    Loading,
    Ready {
        source: Option<Surgery>,
        pristine: SurgeryForm,
        working: SurgeryForm,
    },
}

/// Request the view would send on save.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveRequest {
    Create(SurgeryReq),
    Update { id: String, req: SurgeryReq },
}

/// Outcome of discarding edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discard {
    /// Nothing was ever saved; the caller should return to the list.
    NavigateBack,
    /// The working copy was reset to the last loaded record.
    Reverted,
}

pub struct DetailView<Tz: TimeZone = Local> {
    target: DetailTarget,
    tz: Tz,
    state: State,
}

impl DetailView<Local> {
    /// A view rendering times in the system timezone.
    pub fn new(target: DetailTarget) -> Self {
        Self::with_timezone(target, Local)
    }
}

impl<Tz: TimeZone> DetailView<Tz> {
    /// A view for `target` rendering times in `tz`. Creation mode starts ready with a blank form.
    pub fn with_timezone(target: DetailTarget, tz: Tz) -> Self {
        let state = match target {
            DetailTarget::New => State::Ready {
                source: None,
                pristine: SurgeryForm::default(),
                working: SurgeryForm::default(),
            },
            DetailTarget::Existing(_) => State::Loading,
        };
        Self { target, tz, state }
    }

    pub fn target(&self) -> &DetailTarget {
        &self.target
    }

    pub fn is_loading(&self) -> bool {
        self.state == State::Loading
    }

    /// Fetch the record being viewed. Creation mode has nothing to fetch.
    ///
    /// On failure the error is logged and the view stays in its loading state.
    pub async fn load(&mut self, client: &SurgeryClient) -> ClientResult<()> {
        let DetailTarget::Existing(id) = &self.target else {
            return Ok(());
        };
        let id = id.clone();
        match client.get(&id).await {
            Ok(surgery) => {
                self.show(&surgery);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, %id, "failed to load surgery");
                Err(e)
            }
        }
    }

    /// Show `surgery`, replacing both the pristine and the working copy.
    pub fn show(&mut self, surgery: &Surgery) {
        let form = SurgeryForm::from_surgery(surgery, &self.tz);
        self.state = State::Ready {
            source: Some(surgery.clone()),
            pristine: form.clone(),
            working: form,
        };
    }

    /// The form as the user currently sees it.
    pub fn form(&self) -> Option<&SurgeryForm> {
        match &self.state {
            State::Loading => None,
            State::Ready { working, .. } => Some(working),
        }
    }

    /// Apply one edit to the working copy. Ignored while loading.
    pub fn edit(&mut self, field: Field, value: &str) -> ClientResult<()> {
        if let State::Ready { working, .. } = &mut self.state {
            *working = working.with(field, value)?;
        }
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        match &self.state {
            State::Loading => false,
            State::Ready {
                pristine, working, ..
            } => pristine != working,
        }
    }

    /// Save and discard controls are offered only while there are unsaved edits.
    pub fn controls_visible(&self) -> bool {
        self.is_dirty()
    }

    /// Build the request a save would send, without sending it.
    pub fn save_request(&self) -> ClientResult<Option<SaveRequest>> {
        let State::Ready {
            source, working, ..
        } = &self.state
        else {
            return Ok(None);
        };
        Ok(Some(match (&self.target, source) {
            (DetailTarget::New, _) => SaveRequest::Create(working.to_request(&self.tz)?),
            (DetailTarget::Existing(id), Some(source)) => SaveRequest::Update {
                id: id.clone(),
                req: working.to_update_request(source, &self.tz)?,
            },
            (DetailTarget::Existing(id), None) => SaveRequest::Update {
                id: id.clone(),
                req: working.to_request(&self.tz)?,
            },
        }))
    }

    /// Send the working copy to the server.
    ///
    /// On success both copies are resynced from the response and a newly created record becomes
    /// the view's target. On failure the working copy is kept so the user can correct it.
    pub async fn save(&mut self, client: &SurgeryClient) -> ClientResult<Option<Surgery>> {
        let Some(request) = self.save_request()? else {
            return Ok(None);
        };
        let result = match &request {
            SaveRequest::Create(req) => client.create(req).await,
            SaveRequest::Update { id, req } => client.update(id, req).await,
        };
        match result {
            Ok(surgery) => {
                tracing::info!(id = %surgery.id, "surgery saved");
                self.target = DetailTarget::Existing(surgery.id.clone());
                self.show(&surgery);
                Ok(Some(surgery))
            }
            Err(e) => {
                tracing::error!(error = %e, detail = %self.target, "failed to save surgery");
                Err(e)
            }
        }
    }

    /// Drop unsaved edits.
    pub fn discard(&mut self) -> Discard {
        if self.target.is_new() {
            return Discard::NavigateBack;
        }
        if let State::Ready {
            pristine, working, ..
        } = &mut self.state
        {
            *working = pristine.clone();
        }
        Discard::Reverted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_shared::{PatientDetails, SurgeryStatus};
    use chrono::Utc;

    fn stored() -> Surgery {
        let at = Utc.with_ymd_and_hms(2099, 6, 1, 9, 0, 0).unwrap();
        Surgery {
            id: "550e8400e29b41d4a716446655440000".into(),
            date_time: at,
            surgery_type: "Hip replacement".into(),
            surgeon: "Dr. Shepherd".into(),
            patient: PatientDetails {
                name: "John Doe".into(),
                birthdate: None,
                age: Some(71),
            },
            status: SurgeryStatus::Scheduled,
            created_at: at,
            updated_at: at,
        }
    }

    fn existing() -> DetailView<Utc> {
        DetailView::with_timezone(DetailTarget::Existing(stored().id), Utc)
    }

    #[test]
    fn existing_view_waits_for_load() {
        let mut view = existing();
        assert!(view.is_loading());
        assert!(view.form().is_none());
        assert!(!view.controls_visible());
        view.edit(Field::Surgeon, "ignored").unwrap();
        assert_eq!(view.save_request().unwrap(), None);
    }

    #[test]
    fn edits_mark_the_view_dirty_until_discarded() {
        let mut view = existing();
        view.show(&stored());
        assert!(!view.is_dirty());
        assert!(!view.controls_visible());

        view.edit(Field::Surgeon, "Dr. Bailey").unwrap();
        assert!(view.is_dirty());
        assert!(view.controls_visible());

        assert_eq!(view.discard(), Discard::Reverted);
        assert!(!view.is_dirty());
        assert_eq!(view.form().unwrap().surgeon, "Dr. Shepherd");
    }

    #[test]
    fn editing_back_to_the_original_value_is_clean() {
        let mut view = existing();
        view.show(&stored());
        view.edit(Field::PatientAge, "72").unwrap();
        view.edit(Field::PatientAge, "71").unwrap();
        assert!(!view.is_dirty());
    }

    #[test]
    fn update_request_targets_the_stored_id() {
        let mut view = existing();
        view.show(&stored());
        view.edit(Field::Status, "completed").unwrap();

        match view.save_request().unwrap() {
            Some(SaveRequest::Update { id, req }) => {
                assert_eq!(id, stored().id);
                assert_eq!(
                    req,
                    SurgeryReq {
                        status: Some(Some(SurgeryStatus::Completed)),
                        ..Default::default()
                    }
                );
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn new_view_shows_controls_only_after_an_edit() {
        let mut view = DetailView::with_timezone(DetailTarget::New, Utc);
        assert!(!view.is_loading());
        assert!(!view.is_dirty());
        assert!(!view.controls_visible());

        view.edit(Field::Surgeon, "Dr. Grey").unwrap();
        assert!(view.controls_visible());
        assert!(matches!(
            view.save_request().unwrap(),
            Some(SaveRequest::Create(_))
        ));
        assert_eq!(view.discard(), Discard::NavigateBack);
    }

    #[test]
    fn invalid_status_edit_leaves_working_copy_unchanged() {
        let mut view = existing();
        view.show(&stored());
        assert!(view.edit(Field::Status, "postponed").is_err());
        assert!(!view.is_dirty());
    }
}
