//! Generic remote-backed form controller
//!
//! One `FormController` drives any form in the catalogue:
//! load existing record -> edit -> validate -> save (create or update).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use futures::future::join_all;
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, warn};

use crate::forms::errors::FormError;
use crate::forms::payload::{build_payload, extract_record_id, populate};
use crate::forms::schema::{FormKind, FormSchema};
use crate::forms::values::{FieldValue, FormValues};
use crate::gateway::{Gateway, GatewayError};
use crate::models::{iso_date, ParticipantId, StudyId};
use crate::navigation::{NavAction, RouteParams};
use crate::notify::{Notifications, Toast};

/// Who the form is about and who is filling it in
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormContext {
    pub participant_id: ParticipantId,
    pub study_id: StudyId,
    pub age: Option<u32>,
    /// Staff user stamped as `CreatedBy`/`UpdatedBy`
    pub user_id: Option<String>,
    /// Existing record picked on the previous screen
    pub record_id: Option<i64>,
    /// Initial selection for dated forms
    pub date: Option<NaiveDate>,
}

impl FormContext {
    pub fn new(participant_id: ParticipantId, study_id: StudyId) -> Self {
        Self {
            participant_id,
            study_id,
            ..Self::default()
        }
    }

    pub fn from_params(params: &RouteParams, user_id: Option<String>) -> Self {
        Self {
            participant_id: params.patient_id.clone(),
            study_id: params.study_id.clone(),
            age: params.age,
            user_id,
            record_id: params.observation_id.as_deref().and_then(|id| id.trim().parse().ok()),
            date: params.created_date,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_record(mut self, record_id: i64) -> Self {
        self.record_id = Some(record_id);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Uninitialized,
    LoadedEmpty,
    LoadedExisting,
    Editing,
    Saving,
    Saved,
    SaveFailed,
}

impl FormPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormPhase::Uninitialized => "not loaded",
            FormPhase::LoadedEmpty => "new record",
            FormPhase::LoadedExisting => "existing record",
            FormPhase::Editing => "editing",
            FormPhase::Saving => "saving",
            FormPhase::Saved => "saved",
            FormPhase::SaveFailed => "save failed",
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, FormPhase::Saving)
    }
}

pub struct FormController<G: Gateway + ?Sized> {
    gateway: Arc<G>,
    schema: &'static FormSchema,
    context: FormContext,
    values: FormValues,
    record_id: Option<i64>,
    selected_date: NaiveDate,
    today: NaiveDate,
    phase: FormPhase,
    errors: HashMap<&'static str, String>,
    notifications: Notifications,
}

impl<G: Gateway + ?Sized> FormController<G> {
    pub fn new(gateway: Arc<G>, kind: FormKind, context: FormContext) -> Self {
        Self::with_today(gateway, kind, context, Local::now().date_naive())
    }

    /// Controller with a fixed notion of "today"
    pub fn with_today(gateway: Arc<G>, kind: FormKind, context: FormContext, today: NaiveDate) -> Self {
        let schema = kind.schema();
        let selected_date = context.date.unwrap_or(today);
        Self {
            gateway,
            schema,
            values: FormValues::defaults(schema, today),
            record_id: context.record_id,
            context,
            selected_date,
            today,
            phase: FormPhase::Uninitialized,
            errors: HashMap::new(),
            notifications: Notifications::new(),
        }
    }

    pub fn schema(&self) -> &'static FormSchema {
        self.schema
    }

    pub fn context(&self) -> &FormContext {
        &self.context
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn record_id(&self) -> Option<i64> {
        self.record_id
    }

    /// Whether the next save updates an existing row
    pub fn is_update(&self) -> bool {
        self.record_id.is_some()
    }

    /// Selected date of a dated form, `None` for undated forms
    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.schema.date_column.map(|_| self.selected_date)
    }

    pub fn error_for(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn take_toasts(&mut self) -> Vec<Toast> {
        self.notifications.drain()
    }

    fn load_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("ParticipantId".to_string(), json!(self.context.participant_id.as_str()));
        body.insert("StudyId".to_string(), json!(self.context.study_id.as_str()));
        if let Some(id) = self.record_id {
            body.insert(self.schema.id_column.to_string(), json!(id));
        }
        if let Some(column) = self.schema.date_column {
            body.insert(column.to_string(), json!(iso_date(self.selected_date)));
        }
        Value::Object(body)
    }

    /// Fetch the existing record, if any, and replace the current values.
    ///
    /// Every load endpoint is called concurrently. First rows are merged in
    /// endpoint order, later endpoints overriding earlier ones. On failure
    /// the current values are left untouched.
    pub async fn load(&mut self) -> Result<FormPhase, FormError> {
        let body = self.load_body();
        debug!("Loading {} with {}", self.schema.title, body);

        let gateway = Arc::clone(&self.gateway);
        let calls = self.schema.load_endpoints.iter().map(|path| gateway.post(path, &body));
        let responses = join_all(calls).await;

        let mut merged = Map::new();
        let mut failure: Option<GatewayError> = None;
        for (path, response) in self.schema.load_endpoints.iter().zip(responses) {
            match response {
                Ok(response) => {
                    if let Some(row) = response.first_row() {
                        merged.extend(row.iter().map(|(k, v)| (k.clone(), v.clone())));
                    }
                }
                Err(e) => {
                    error!("Failed to load {} from {}: {}", self.schema.title, path, e);
                    failure.get_or_insert(e);
                }
            }
        }

        if let Some(e) = failure {
            self.notifications.push(
                Toast::error(format!("Could not load {}", self.schema.title)).with_detail(e.to_string()),
            );
            return Err(e.into());
        }

        let mut values = FormValues::defaults(self.schema, self.today);
        populate(&mut values, &merged);
        self.values = values;
        self.errors.clear();

        // A dated form with no row for this date is a new record, even if one
        // was pinned for another date.
        let loaded_id = extract_record_id(&merged, self.schema.id_column);
        if loaded_id.is_some() || self.schema.is_dated() {
            self.record_id = loaded_id;
        }

        self.phase = if loaded_id.is_some() {
            FormPhase::LoadedExisting
        } else {
            FormPhase::LoadedEmpty
        };
        info!(
            "Loaded {} for participant {}: {}",
            self.schema.title,
            self.context.participant_id,
            self.phase.as_str()
        );
        Ok(self.phase)
    }

    /// Pick another date on a dated form and reload it. If the reload fails
    /// the previous date stays selected, matching the values and record id
    /// that are still loaded.
    pub async fn select_date(&mut self, date: NaiveDate) -> Result<FormPhase, FormError> {
        if !self.schema.is_dated() {
            return Err(FormError::Rule(format!("{} has no date selection", self.schema.title)));
        }
        let previous = std::mem::replace(&mut self.selected_date, date);
        let loaded = self.load().await;
        if loaded.is_err() {
            warn!(
                "Keeping {} on {} after failed reload for {}",
                self.schema.title,
                iso_date(previous),
                iso_date(date)
            );
            self.selected_date = previous;
        }
        loaded
    }

    /// Move the selected date by whole days and reload
    pub async fn shift_date(&mut self, days: i64) -> Result<FormPhase, FormError> {
        let date = self.selected_date + Duration::days(days);
        self.select_date(date).await
    }

    fn mark_edited(&mut self, key: &'static str) {
        self.errors.remove(key);
        if !self.phase.is_busy() {
            self.phase = FormPhase::Editing;
        }
    }

    fn field_key(&self, key: &str) -> Result<&'static str, FormError> {
        self.schema.field(key).map(|f| f.key).ok_or_else(|| FormError::UnknownField {
            form: self.schema.title.to_string(),
            field: key.to_string(),
        })
    }

    /// Set a field from user input
    pub fn set_field(&mut self, key: &str, input: &str) -> Result<(), FormError> {
        let key = self.field_key(key)?;
        self.values.set_input(key, input)?;
        self.mark_edited(key);
        Ok(())
    }

    pub fn set_value(&mut self, key: &str, value: FieldValue) -> Result<(), FormError> {
        let key = self.field_key(key)?;
        self.values.set(key, value)?;
        self.mark_edited(key);
        Ok(())
    }

    /// Chip tap on a multi-select, or option pick on a choice
    pub fn toggle_option(&mut self, key: &str, option: &str) -> Result<(), FormError> {
        let key = self.field_key(key)?;
        self.values.toggle_option(key, option)?;
        self.mark_edited(key);
        Ok(())
    }

    fn check(&mut self) -> Result<(), FormError> {
        self.errors.clear();

        let missing = self.values.missing_required();
        if !missing.is_empty() {
            for spec in &missing {
                self.errors.insert(spec.key, "Required".to_string());
            }
            return Err(FormError::MissingFields(
                missing.iter().map(|spec| spec.label.to_string()).collect(),
            ));
        }

        if let Some(rule) = self.schema.check {
            rule(&self.values).map_err(FormError::Rule)?;
        }
        Ok(())
    }

    fn check_and_report(&mut self) -> Result<(), FormError> {
        self.check().map_err(|e| {
            let toast = match &e {
                FormError::MissingFields(labels) => {
                    Toast::error("Please fill all required fields").with_detail(labels.join(", "))
                }
                other => Toast::error("Please check the form").with_detail(other.to_string()),
            };
            self.notifications.push(toast);
            e
        })
    }

    /// Check required fields and the form rule. Failures queue an error toast.
    pub fn validate(&mut self) -> bool {
        self.check_and_report().is_ok()
    }

    /// Outgoing payload for the current values
    pub fn payload(&self) -> Value {
        build_payload(&self.values, &self.context, self.record_id, self.selected_date())
    }

    /// Values computed from the answers and sent with the payload
    pub fn derived(&self) -> Vec<(&'static str, Value)> {
        self.schema.derive.map(|derive| derive(&self.values)).unwrap_or_default()
    }

    /// Validate and submit. Returns the record id after a successful save.
    pub async fn save(&mut self) -> Result<Option<i64>, FormError> {
        self.check_and_report()?;

        if self.context.user_id.is_none() {
            self.notifications.push(Toast::error("No user signed in").with_detail("Set TRIAL_USER_ID"));
            return Err(FormError::Rule("No user signed in".to_string()));
        }

        self.phase = FormPhase::Saving;
        let payload = self.payload();
        debug!("Saving {} with {}", self.schema.title, payload);

        match self.gateway.post(self.schema.save_endpoint, &payload).await {
            Ok(response) => {
                if let Some(id) = response
                    .first_row()
                    .and_then(|row| extract_record_id(row, self.schema.id_column))
                {
                    self.record_id = Some(id);
                } else if self.record_id.is_none() {
                    warn!("{} saved but no {} came back", self.schema.title, self.schema.id_column);
                }

                self.phase = FormPhase::Saved;
                info!(
                    "Saved {} for participant {} (id {:?})",
                    self.schema.title, self.context.participant_id, self.record_id
                );
                self.notifications.push(
                    Toast::success(format!("{} saved", self.schema.title))
                        .with_detail("Record stored successfully")
                        .on_hide(NavAction::Back),
                );
                Ok(self.record_id)
            }
            Err(e) => {
                error!("Failed to save {}: {}", self.schema.title, e);
                self.phase = FormPhase::SaveFailed;
                self.notifications.push(
                    Toast::error(format!("Could not save {}", self.schema.title)).with_detail(e.to_string()),
                );
                Err(e.into())
            }
        }
    }

    /// Reset every field to its default. The record id is kept so a later
    /// save still updates the same row.
    pub fn clear(&mut self) {
        self.values = FormValues::defaults(self.schema, self.today);
        self.errors.clear();
        if self.phase != FormPhase::Uninitialized {
            self.phase = FormPhase::Editing;
        }
        debug!("Cleared {}", self.schema.title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use crate::notify::ToastKind;

    const LOAD_AE: &str = "/GetParticipantAdverseEvent";
    const SAVE_AE: &str = "/AddUpdateParticipantAdverseEvent";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn context() -> FormContext {
        FormContext::new(ParticipantId::new("42"), StudyId::new("CS-0042")).with_user("nurse.kim")
    }

    fn controller(gateway: &Arc<MemoryGateway>, kind: FormKind) -> FormController<MemoryGateway> {
        FormController::with_today(Arc::clone(gateway), kind, context(), today())
    }

    fn fill_adverse_event(form: &mut FormController<MemoryGateway>) {
        form.set_field("description", "Nausea during session").unwrap();
        form.set_field("severity", "Mild").unwrap();
        form.set_field("related", "Uncertain").unwrap();
        form.set_field("serious", "No").unwrap();
    }

    #[tokio::test]
    async fn test_missing_required_aborts_save_without_call() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.respond_rows(LOAD_AE, vec![]);
        let mut form = controller(&gateway, FormKind::AdverseEvent);
        form.load().await.unwrap();
        form.take_toasts();

        let result = form.save().await;
        assert!(matches!(result, Err(FormError::MissingFields(_))));
        assert!(gateway.calls_to(SAVE_AE).is_empty());

        let toast = form.notifications().last().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(form.error_for("description").is_some());

        form.set_field("description", "Headache").unwrap();
        assert!(form.error_for("description").is_none());
        assert!(form.error_for("severity").is_some());
    }

    #[tokio::test]
    async fn test_existing_record_saves_with_its_key() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.respond_rows(
            LOAD_AE,
            vec![json!({
                "AEId": 31,
                "EventDate": "2024-05-30",
                "AEDescription": "Nausea during session",
                "Severity": "Mild",
                "IsRelatedToVR": "Yes",
                "IsSerious": "No"
            })],
        );
        gateway.respond_rows(SAVE_AE, vec![json!({"AEId": 31})]);

        let mut form = controller(&gateway, FormKind::AdverseEvent);
        assert_eq!(form.load().await.unwrap(), FormPhase::LoadedExisting);
        assert!(form.is_update());

        form.set_field("severity", "Moderate").unwrap();
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.save().await.unwrap(), Some(31));

        let calls = gateway.calls_to(SAVE_AE);
        assert_eq!(calls.len(), 1);
        let body = calls[0].body.as_ref().unwrap();
        assert_eq!(body["AEId"], json!(31));
        assert_eq!(body["Severity"], json!("Moderate"));
        assert_eq!(form.phase(), FormPhase::Saved);

        let toast = form.notifications().last().unwrap();
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.on_hide, Some(NavAction::Back));
    }

    #[tokio::test]
    async fn test_new_record_sends_null_key_and_captures_returned_id() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.respond_rows(LOAD_AE, vec![]);
        gateway.respond_rows(SAVE_AE, vec![json!({"AEId": "58"})]);

        let mut form = controller(&gateway, FormKind::AdverseEvent);
        assert_eq!(form.load().await.unwrap(), FormPhase::LoadedEmpty);
        fill_adverse_event(&mut form);

        assert_eq!(form.save().await.unwrap(), Some(58));
        let body = gateway.calls_to(SAVE_AE)[0].body.clone().unwrap();
        assert_eq!(body["AEId"], Value::Null);
        assert_eq!(body["EventDate"], json!("2024-06-03"));

        form.save().await.unwrap();
        let second = gateway.calls_to(SAVE_AE)[1].body.clone().unwrap();
        assert_eq!(second["AEId"], json!(58));
    }

    #[tokio::test]
    async fn test_toggle_away_nulls_explanation() {
        let gateway = Arc::new(MemoryGateway::lenient());
        let mut form = controller(&gateway, FormKind::AdverseEvent);
        form.load().await.unwrap();
        fill_adverse_event(&mut form);

        form.set_field("serious", "Yes").unwrap();
        form.set_field("serious_details", "Hospitalised overnight").unwrap();
        assert_eq!(form.payload()["SeriousDetails"], json!("Hospitalised overnight"));

        form.set_field("serious", "No").unwrap();
        assert_eq!(form.payload()["SeriousDetails"], Value::Null);
        form.save().await.unwrap();
        let body = gateway.calls_to(SAVE_AE)[0].body.clone().unwrap();
        assert_eq!(body["SeriousDetails"], Value::Null);
    }

    #[tokio::test]
    async fn test_failed_save_stays_on_form() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.respond_rows(LOAD_AE, vec![]);
        gateway.fail(SAVE_AE, 500, "database unavailable");

        let mut form = controller(&gateway, FormKind::AdverseEvent);
        form.load().await.unwrap();
        fill_adverse_event(&mut form);

        assert!(matches!(form.save().await, Err(FormError::Gateway(_))));
        assert_eq!(form.phase(), FormPhase::SaveFailed);
        assert_eq!(form.values().text("description"), "Nausea during session");
        assert!(form.record_id().is_none());

        let toast = form.notifications().last().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(toast.on_hide.is_none());

        form.set_field("severity", "Severe").unwrap();
        assert_eq!(form.phase(), FormPhase::Editing);
    }

    #[tokio::test]
    async fn test_clear_resets_without_calls() {
        let gateway = Arc::new(MemoryGateway::lenient());
        let mut form = controller(&gateway, FormKind::AdverseEvent);
        form.load().await.unwrap();
        fill_adverse_event(&mut form);
        form.set_field("event_date", "01-06-2024").unwrap();
        let calls_before = gateway.call_count();

        form.clear();
        assert_eq!(gateway.call_count(), calls_before);
        assert_eq!(form.values(), &FormValues::defaults(form.schema(), today()));
        assert_eq!(form.values().date("event_date"), Some(today()));
    }

    #[tokio::test]
    async fn test_load_merges_endpoints_concurrently() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.respond_rows(
            "/GetExitInterviewQuestions",
            vec![json!({"OverallExperience": 2, "Suggestions": "from questions"})],
        );
        gateway.respond_rows(
            "/GetParticipantExitInterview",
            vec![json!({"ExitInterviewId": 4, "Suggestions": "More sessions", "CompletedStudy": "Yes"})],
        );

        let mut form = controller(&gateway, FormKind::ExitInterview);
        assert_eq!(form.load().await.unwrap(), FormPhase::LoadedExisting);
        assert_eq!(gateway.call_count(), 2);
        assert_eq!(form.record_id(), Some(4));
        assert_eq!(form.values().text("suggestions"), "More sessions");
        assert_eq!(form.values().rating("overall_experience"), Some(2));
        assert_eq!(form.values().text("completed"), "Yes");
    }

    #[tokio::test]
    async fn test_failed_load_keeps_values_and_toasts() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.fail(LOAD_AE, 503, "maintenance");
        let mut form = controller(&gateway, FormKind::AdverseEvent);
        form.set_field("description", "typed before load").unwrap();

        assert!(form.load().await.is_err());
        assert_eq!(form.values().text("description"), "typed before load");
        assert_eq!(form.notifications().last().unwrap().kind, ToastKind::Error);
    }

    #[tokio::test]
    async fn test_dated_form_reloads_on_date_change() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.respond_rows(
            "/GetParticipantDistressWeeklyScore",
            vec![json!({"PDWSID": 12, "DistressScore": 6})],
        );

        let mut form = controller(&gateway, FormKind::DistressThermometer);
        form.load().await.unwrap();
        assert_eq!(form.record_id(), Some(12));

        gateway.respond_rows("/GetParticipantDistressWeeklyScore", vec![]);
        assert_eq!(form.shift_date(-7).await.unwrap(), FormPhase::LoadedEmpty);
        assert_eq!(form.record_id(), None);

        let calls = gateway.calls();
        let column = form.schema().date_column.unwrap();
        assert_eq!(calls[0].body.as_ref().unwrap()[column], json!("2024-06-03"));
        assert_eq!(calls[1].body.as_ref().unwrap()[column], json!("2024-05-27"));
    }

    #[tokio::test]
    async fn test_failed_date_change_keeps_previous_week() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.respond_rows(
            "/GetParticipantDistressWeeklyScore",
            vec![json!({"PDWSID": 12, "DistressScore": 6})],
        );
        gateway.respond_rows("/AddUpdateParticipantDistressWeeklyScore", vec![json!({"PDWSID": 12})]);

        let mut form = controller(&gateway, FormKind::DistressThermometer);
        form.load().await.unwrap();

        gateway.fail("/GetParticipantDistressWeeklyScore", 503, "maintenance");
        assert!(form.shift_date(-7).await.is_err());
        assert_eq!(form.selected_date(), Some(today()));
        assert_eq!(form.record_id(), Some(12));
        assert_eq!(form.values().rating("rating"), Some(6));

        let column = form.schema().date_column.unwrap();
        let payload = form.payload();
        assert_eq!(payload["PDWSID"], json!(12));
        assert_eq!(payload[column], json!("2024-06-03"));
    }

    #[tokio::test]
    async fn test_rule_failure_aborts_save_without_call() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.respond_rows(LOAD_AE, vec![]);
        let mut form = controller(&gateway, FormKind::AdverseEvent);
        form.load().await.unwrap();
        form.take_toasts();
        fill_adverse_event(&mut form);
        form.set_field("reported", "Yes").unwrap();
        form.set_field("report_date", "2024-06-01").unwrap();

        assert!(matches!(form.save().await, Err(FormError::Rule(_))));
        assert!(gateway.calls_to(SAVE_AE).is_empty());
        assert_ne!(form.phase(), FormPhase::Saving);

        let toasts = form.take_toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Error);
        assert_eq!(toasts[0].text1, "Please check the form");
    }

    #[tokio::test]
    async fn test_undated_form_rejects_date_selection() {
        let gateway = Arc::new(MemoryGateway::lenient());
        let mut form = controller(&gateway, FormKind::Screening);
        assert!(form.select_date(today()).await.is_err());
        assert_eq!(gateway.call_count(), 0);
        assert!(form.selected_date().is_none());
    }

    #[tokio::test]
    async fn test_save_without_user_is_refused() {
        let gateway = Arc::new(MemoryGateway::lenient());
        let context = FormContext::new(ParticipantId::new("42"), StudyId::new("CS-0042"));
        let mut form = FormController::with_today(Arc::clone(&gateway), FormKind::AdverseEvent, context, today());
        fill_adverse_event(&mut form);

        assert!(form.save().await.is_err());
        assert!(gateway.calls_to(SAVE_AE).is_empty());
    }

    #[test]
    fn test_context_from_route_params() {
        let params = RouteParams::new(ParticipantId::new("7"), StudyId::new("CS-0007"), Some(61))
            .with_observation("19")
            .with_created_date(today());
        let context = FormContext::from_params(&params, Some("dr.lee".to_string()));
        assert_eq!(context.record_id, Some(19));
        assert_eq!(context.age, Some(61));
        assert_eq!(context.date, Some(today()));
    }
}
