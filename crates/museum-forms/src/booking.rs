// File: src/booking.rs
// Purpose: Visit booking form - layout, dependent time slots, advisories and submission

use crate::config::{BookingConfig, FormsConfig};
use crate::draft::DraftStore;
use crate::form::{Field, FieldKind, FieldValue, Form, FormKind, FormSnapshot};
use crate::pipeline::{FormPipeline, PipelineDeps, PipelineParts};
use crate::submission::{
    Confirmation, SimulatedSubmitter, SubmitButton, SubmitOutcome, SubmitPhase, Submitter,
};
use crate::surface::{AnalyticsEvent, NoticeId};
use chrono::NaiveDate;
use museum_forms_validation::{
    format_date_br, is_closed_day, parse_iso_date, visit_date_bounds, DATE_CLOSED_DAY,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const BOOKING_MODAL: &str = "confirmationModal";
pub const SUBMIT_LABEL: &str = "Confirmar Agendamento";

pub const REQUIRED_FIELDS: &[&str] = &["name", "email", "visitors", "date", "time"];
pub const CONSENT_FIELD: &str = "terms";

pub const VISITOR_COUNTS: &[&str] = &["1", "2-5", "6-10", "11-20", "21-30", "30+"];

/// Counts that suggest picking a group type
const GROUP_COUNTS: &[&str] = &["6-10", "11-20", "21-30"];

pub const LARGE_GROUP_NOTICE: &str =
    "Para grupos acima de 30 pessoas, entre em contato diretamente conosco pelo telefone (14) 3622-1235.";
pub const GROUP_TYPE_NOTICE: &str =
    "Para grupos, recomendamos selecionar o tipo de grupo para melhor atendimento.";

/// Group type codes and their display labels
pub const GROUP_TYPES: &[(&str, &str)] = &[
    ("familia", "Família"),
    ("escola", "Escola"),
    ("universidade", "Universidade"),
    ("empresa", "Empresa"),
    ("terceira-idade", "Terceira Idade"),
    ("turismo", "Turismo"),
    ("outro", "Outro"),
];

/// Display label for a group code; unknown codes are shown as-is
pub fn group_type_label(code: &str) -> &str {
    GROUP_TYPES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
        .unwrap_or(code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitType {
    Guiada,
    #[default]
    Livre,
}

impl VisitType {
    const GUIDED_SLOTS: &'static [&'static str] = &["09:00", "11:00", "14:00", "16:00"];
    const FREE_SLOTS: &'static [&'static str] =
        &["09:00", "10:00", "11:00", "14:00", "15:00", "16:00"];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisitType::Guiada => "guiada",
            VisitType::Livre => "livre",
        }
    }

    /// Anything other than `guiada` is a free visit
    pub fn parse(value: &str) -> Self {
        if value == "guiada" {
            VisitType::Guiada
        } else {
            VisitType::Livre
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VisitType::Guiada => "Visita Guiada",
            VisitType::Livre => "Visita Livre",
        }
    }

    /// Bookable start times for this kind of visit
    pub fn time_slots(&self) -> &'static [&'static str] {
        match self {
            VisitType::Guiada => Self::GUIDED_SLOTS,
            VisitType::Livre => Self::FREE_SLOTS,
        }
    }
}

/// The booking form's fields, with time slots for a free visit
pub fn booking_form() -> Form {
    Form::new(
        FormKind::Booking,
        vec![
            Field::new("name", FieldKind::Text).required(),
            Field::new("email", FieldKind::Email).required(),
            Field::new("phone", FieldKind::Tel),
            Field::new("visitors", FieldKind::Select)
                .required()
                .with_options(VISITOR_COUNTS.iter().copied()),
            Field::new("date", FieldKind::Date).required(),
            Field::new("time", FieldKind::Select)
                .required()
                .with_options(VisitType::Livre.time_slots().iter().copied()),
            Field::new("visit-type", FieldKind::Radio)
                .with_options([VisitType::Guiada.as_str(), VisitType::Livre.as_str()])
                .with_default(VisitType::Livre.as_str()),
            Field::new("group-type", FieldKind::Select)
                .with_options(GROUP_TYPES.iter().map(|(code, _)| *code)),
            Field::new("terms", FieldKind::Checkbox),
        ],
    )
}

/// Leading integer of a visitor count (`"2-5"` → 2), else 1
pub fn visitor_count(visitors: &str) -> i64 {
    let digits: String = visitors
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(1)
}

/// Details shown to the visitor once a booking is confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSummary {
    pub name: String,
    pub email: String,
    /// DD/MM/YYYY
    pub date: String,
    pub time: String,
    pub visitors: String,
    pub visit_type: VisitType,
    pub group: Option<String>,
}

impl BookingSummary {
    pub fn from_snapshot(snapshot: &FormSnapshot) -> Self {
        let group = snapshot.text("group-type");
        Self {
            name: snapshot.text("name").to_string(),
            email: snapshot.text("email").to_string(),
            date: format_date_br(snapshot.text("date")),
            time: snapshot.text("time").to_string(),
            visitors: snapshot.text("visitors").to_string(),
            visit_type: VisitType::parse(snapshot.text("visit-type")),
            group: (!group.is_empty()).then(|| group_type_label(group).to_string()),
        }
    }
}

impl fmt::Display for BookingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nome: {}", self.name)?;
        writeln!(f, "E-mail: {}", self.email)?;
        writeln!(f, "Data: {}", self.date)?;
        writeln!(f, "Horário: {}", self.time)?;
        writeln!(f, "Visitantes: {}", self.visitors)?;
        write!(f, "Tipo: {}", self.visit_type.label())?;
        if let Some(group) = &self.group {
            write!(f, "\nGrupo: {}", group)?;
        }
        Ok(())
    }
}

/// The visit booking form
#[derive(Clone)]
pub struct BookingPipeline {
    core: FormPipeline,
    settings: BookingConfig,
}

impl BookingPipeline {
    /// Build the form, offer free-visit slots and restore any saved draft
    pub async fn init(config: &FormsConfig, deps: PipelineDeps) -> Self {
        let submitter: Arc<dyn Submitter> = match &deps.submitter {
            Some(submitter) => submitter.clone(),
            None => Arc::new(SimulatedSubmitter::new(config.booking.submit_delay())),
        };
        let drafts = DraftStore::new(
            deps.storage.clone(),
            config.drafts.booking_key.clone(),
            config.drafts.debounce(),
        );

        let core = FormPipeline::new(
            PipelineParts {
                form: booking_form(),
                required: REQUIRED_FIELDS,
                consent: CONSENT_FIELD,
                submit_label: SUBMIT_LABEL,
                drafts,
                submitter,
            },
            &deps,
        );

        let pipeline = Self {
            core,
            settings: config.booking.clone(),
        };
        pipeline.restore_draft().await;
        info!(key = pipeline.core.drafts().key(), "booking form ready");
        pipeline
    }

    async fn restore_draft(&self) {
        let Some(snapshot) = self.core.restore_draft().await else {
            return;
        };

        // Time slots follow the restored visit type
        self.core
            .update(|form| {
                let visit_type = VisitType::parse(form.text("visit-type"));
                form.set_options("time", visit_type.time_slots().iter().copied());
                form.set_value("time", snapshot.text("time"));
            })
            .await;
    }

    pub async fn form(&self) -> Form {
        self.core.form().await
    }

    pub async fn phase(&self) -> SubmitPhase {
        self.core.phase().await
    }

    pub async fn button(&self) -> SubmitButton {
        self.core.button().await
    }

    pub fn drafts(&self) -> &DraftStore {
        self.core.drafts()
    }

    /// Earliest and latest bookable dates for the picker
    pub fn date_bounds(&self) -> (NaiveDate, NaiveDate) {
        visit_date_bounds(self.core.today(), self.settings.booking_window_months)
    }

    /// Available start times for the current visit type
    pub async fn time_slots(&self) -> Vec<String> {
        self.core
            .read(|form| {
                form.field("time")
                    .map(|f| f.options().to_vec())
                    .unwrap_or_default()
            })
            .await
    }

    pub async fn on_input(&self, key: &str, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.core.input(key, value.into()).await
    }

    pub async fn on_blur(&self, key: &str) -> bool {
        self.core.blur(key).await
    }

    /// Date picked. Mondays are refused outright: the value is cleared and the
    /// closed-day message shown.
    pub async fn on_date_change(&self, value: &str) -> bool {
        if parse_iso_date(value).is_some_and(is_closed_day) {
            debug!(date = value, "closed day refused");
            self.core.reject("date", DATE_CLOSED_DAY).await;
            return false;
        }

        self.core.input("date", value.into()).await;
        self.core.blur("date").await
    }

    /// Visit type switched: offer its time slots and clear the chosen time
    pub async fn on_visit_type_change(&self, visit_type: VisitType) {
        self.core
            .edit(|form| {
                form.set_value("visit-type", visit_type.as_str());
                form.set_options("time", visit_type.time_slots().iter().copied());
                form.set_value("time", "");
            })
            .await;
    }

    /// Visitor count picked. Shows advisory notices; none of them affect
    /// validation.
    pub async fn on_visitors_change(&self, visitors: &str) -> Vec<NoticeId> {
        self.core.input("visitors", visitors.into()).await;

        let group_empty = self
            .core
            .read(|form| form.text("group-type").is_empty())
            .await;

        let mut shown = Vec::new();
        if visitors == "30+" {
            shown.push(self.notify(LARGE_GROUP_NOTICE));
        }
        if group_empty && GROUP_COUNTS.contains(&visitors) {
            shown.push(self.notify(GROUP_TYPE_NOTICE));
        }
        shown
    }

    fn notify(&self, message: &str) -> NoticeId {
        let notices = self.core.surfaces().notices.clone();
        let id = notices.show_notice(message);
        let dismiss_after = self.settings.notice_dismiss();

        tokio::spawn(async move {
            tokio::time::sleep(dismiss_after).await;
            notices.dismiss_notice(id);
        });

        id
    }

    /// Validate, deliver, then confirm with a booking summary
    pub async fn submit(&self) -> SubmitOutcome {
        let snapshot = match self.core.begin_submit().await {
            Ok(snapshot) => snapshot,
            Err(outcome) => return outcome,
        };

        if let Err(err) = self.core.deliver(&snapshot).await {
            return SubmitOutcome::Failed(err);
        }

        let summary = BookingSummary::from_snapshot(&snapshot);
        let surfaces = self.core.surfaces();
        surfaces.modals.show(BOOKING_MODAL, Some(&summary.to_string()));

        self.core.complete().await;
        if let Err(err) = self.core.drafts().clear().await {
            warn!(error = %err, "failed to clear booking draft");
        }
        self.core
            .update(|form| {
                form.set_options("time", VisitType::Livre.time_slots().iter().copied());
            })
            .await;

        surfaces.track(AnalyticsEvent {
            action: "booking_submitted".to_string(),
            category: "Booking".to_string(),
            label: summary.visit_type.as_str().to_string(),
            value: visitor_count(&summary.visitors),
        });
        self.core.settle().await;

        info!(
            date = %summary.date,
            time = %summary.time,
            visitors = %summary.visitors,
            "booking confirmed"
        );
        SubmitOutcome::Confirmed(Confirmation::Booking(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("1", 1)]
    #[case("2-5", 2)]
    #[case("11-20", 11)]
    #[case("30+", 30)]
    #[case("", 1)]
    #[case("muitos", 1)]
    fn test_visitor_count(#[case] visitors: &str, #[case] expected: i64) {
        assert_eq!(visitor_count(visitors), expected);
    }

    #[test]
    fn test_group_type_label() {
        assert_eq!(group_type_label("terceira-idade"), "Terceira Idade");
        assert_eq!(group_type_label("clube"), "clube");
    }

    #[test]
    fn test_time_slots() {
        assert_eq!(VisitType::Guiada.time_slots(), &["09:00", "11:00", "14:00", "16:00"]);
        assert_eq!(VisitType::Livre.time_slots().len(), 6);
        assert_eq!(VisitType::parse("noturna"), VisitType::Livre);
    }

    #[test]
    fn test_summary_from_snapshot() {
        let snapshot = FormSnapshot::from_pairs([
            ("name", FieldValue::from("Maria Silva")),
            ("email", FieldValue::from("maria@example.com")),
            ("visitors", FieldValue::from("2-5")),
            ("date", FieldValue::from("2025-03-04")),
            ("time", FieldValue::from("09:00")),
            ("visit-type", FieldValue::from("guiada")),
            ("group-type", FieldValue::from("escola")),
            ("terms", FieldValue::from(true)),
        ]);

        let summary = BookingSummary::from_snapshot(&snapshot);
        assert_eq!(summary.date, "04/03/2025");
        assert_eq!(summary.group.as_deref(), Some("Escola"));
        assert_eq!(
            summary.to_string(),
            "Nome: Maria Silva\nE-mail: maria@example.com\nData: 04/03/2025\nHorário: 09:00\nVisitantes: 2-5\nTipo: Visita Guiada\nGrupo: Escola"
        );
    }

    #[test]
    fn test_summary_without_group() {
        let snapshot = FormSnapshot::from_pairs([("visit-type", "livre"), ("group-type", "")]);
        let summary = BookingSummary::from_snapshot(&snapshot);
        assert_eq!(summary.group, None);
        assert!(summary.to_string().ends_with("Tipo: Visita Livre"));
    }

    #[test]
    fn test_layout_defaults() {
        let form = booking_form();
        assert_eq!(form.text("visit-type"), "livre");
        assert_eq!(form.field("time").unwrap().options().len(), 6);
        assert!(!form.is_checked("terms"));
        assert!(REQUIRED_FIELDS.iter().all(|k| form.field(k).is_some()));
    }
}
