// File: src/contact.rs
// Purpose: Contact form - character counter, subject helpers, spam screening and submission

use crate::config::{ContactConfig, FormsConfig};
use crate::draft::DraftStore;
use crate::form::{Field, FieldKind, FieldValue, Form, FormKind, FormSnapshot};
use crate::pipeline::{FormPipeline, PipelineDeps, PipelineParts};
use crate::submission::{
    Confirmation, SimulatedSubmitter, SubmitButton, SubmitOutcome, SubmitPhase, Submitter,
};
use crate::surface::AnalyticsEvent;
use museum_forms_validation::{char_len, FieldRule};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

pub const CONTACT_MODAL: &str = "contactConfirmationModal";
pub const SUBMIT_LABEL: &str = "Enviar Mensagem";

pub const REQUIRED_FIELDS: &[&str] = &["name", "email", "subject", "message"];
pub const CONSENT_FIELD: &str = "privacy";

/// Hidden field real visitors never fill in
pub const HONEYPOT_FIELD: &str = "website";

pub const SUBJECTS: &[&str] = &[
    "informacoes",
    "agendamento",
    "pesquisa",
    "educativo",
    "doacao",
    "parcerias",
    "imprensa",
    "sugestoes",
    "outro",
];

pub const SPAM_KEYWORDS: &[&str] = &[
    "viagra",
    "casino",
    "lottery",
    "winner",
    "urgent",
    "click here",
];

/// Remaining characters at which the counter is flagged
pub const COUNTER_LOW_THRESHOLD: usize = 100;

/// Starter text offered for a subject
pub fn subject_template(subject: &str) -> Option<&'static str> {
    let template = match subject {
        "informacoes" => "Olá! Gostaria de obter mais informações sobre...",
        "agendamento" => "Olá! Gostaria de agendar uma visita para...",
        "pesquisa" => "Olá! Estou realizando uma pesquisa sobre... e gostaria de saber se vocês têm informações sobre...",
        "educativo" => "Olá! Tenho interesse no programa educativo do museu. Gostaria de saber mais sobre...",
        "doacao" => "Olá! Tenho interesse em fazer uma doação de... para o acervo do museu.",
        "parcerias" => "Olá! Represento a... e gostaria de propor uma parceria...",
        "imprensa" => "Olá! Sou jornalista da... e gostaria de solicitar informações para...",
        "sugestoes" => "Olá! Gostaria de fazer uma sugestão para...",
        _ => return None,
    };
    Some(template)
}

/// Help panel shown next to the subject select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Faq {
    pub title: &'static str,
    pub items: &'static [&'static str],
}

const FAQS: &[(&str, Faq)] = &[
    (
        "agendamento",
        Faq {
            title: "Dicas para Agendamento:",
            items: &[
                "Agendamentos devem ser feitos com pelo menos 24h de antecedência",
                "Grupos acima de 30 pessoas precisam de agendamento especial",
                "Visitas guiadas têm horários específicos",
            ],
        },
    ),
    (
        "pesquisa",
        Faq {
            title: "Para Pesquisadores:",
            items: &[
                "Nosso acervo documental está disponível mediante agendamento",
                "Consultas podem ser realizadas de terça a sexta, das 9h às 16h",
                "É necessário apresentar projeto de pesquisa",
            ],
        },
    ),
    (
        "educativo",
        Faq {
            title: "Programa Educativo:",
            items: &[
                "Oferecemos visitas educativas para escolas",
                "Material didático disponível para professores",
                "Atividades adaptadas para diferentes faixas etárias",
            ],
        },
    ),
];

pub fn subject_faq(subject: &str) -> Option<&'static Faq> {
    FAQS.iter().find(|(s, _)| *s == subject).map(|(_, faq)| faq)
}

/// Whether a message trips the keyword screen (case-insensitive)
pub fn is_spam(message: &str) -> bool {
    let message = message.to_lowercase();
    SPAM_KEYWORDS.iter().any(|keyword| message.contains(keyword))
}

/// Characters left in the message box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCounter {
    /// Negative once the message runs past the limit
    pub remaining: i64,
    pub low: bool,
}

impl CharCounter {
    pub fn new(message: &str, max_chars: usize) -> Self {
        let remaining = max_chars as i64 - char_len(message) as i64;
        Self {
            remaining,
            low: remaining < COUNTER_LOW_THRESHOLD as i64,
        }
    }

    pub fn text(&self) -> String {
        format!("{} caracteres restantes", self.remaining)
    }
}

/// What a subject change did to the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectChange {
    pub template_inserted: bool,
    pub faq: Option<&'static Faq>,
}

/// The contact form's fields
pub fn contact_form(settings: &ContactConfig) -> Form {
    Form::new(
        FormKind::Contact,
        vec![
            Field::new("name", FieldKind::Text).required(),
            Field::new("email", FieldKind::Email).required(),
            Field::new("phone", FieldKind::Tel),
            Field::new("subject", FieldKind::Select)
                .required()
                .with_options(SUBJECTS.iter().copied()),
            Field::new("message", FieldKind::Textarea)
                .required()
                .with_rule(FieldRule::Message {
                    min: settings.message_min_chars,
                    max: settings.message_max_chars,
                }),
            Field::new("privacy", FieldKind::Checkbox),
            Field::new(HONEYPOT_FIELD, FieldKind::Hidden),
        ],
    )
}

/// The visitor contact form
#[derive(Clone)]
pub struct ContactPipeline {
    core: FormPipeline,
    settings: ContactConfig,
    clear_delay: Duration,
    faq: Arc<Mutex<Option<&'static Faq>>>,
}

impl ContactPipeline {
    /// Build the form and restore any saved draft
    pub async fn init(config: &FormsConfig, deps: PipelineDeps) -> Self {
        let submitter: Arc<dyn Submitter> = match &deps.submitter {
            Some(submitter) => submitter.clone(),
            None => Arc::new(SimulatedSubmitter::new(config.contact.submit_delay())),
        };
        let drafts = DraftStore::new(
            deps.storage.clone(),
            config.drafts.contact_key.clone(),
            config.drafts.debounce(),
        );

        let core = FormPipeline::new(
            PipelineParts {
                form: contact_form(&config.contact),
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
            settings: config.contact.clone(),
            clear_delay: config.drafts.contact_clear_delay(),
            faq: Arc::new(Mutex::new(None)),
        };
        if pipeline.core.restore_draft().await.is_some() {
            let counter = pipeline.char_counter().await;
            info!(remaining = counter.remaining, "contact draft restored");
        }
        info!(key = pipeline.core.drafts().key(), "contact form ready");
        pipeline
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

    pub async fn char_counter(&self) -> CharCounter {
        let max = self.settings.message_max_chars;
        self.core
            .read(|form| CharCounter::new(form.text("message"), max))
            .await
    }

    /// FAQ panel currently shown, if any
    pub fn faq(&self) -> Option<&'static Faq> {
        *self.faq.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_faq(&self, faq: Option<&'static Faq>) {
        *self.faq.lock().unwrap_or_else(PoisonError::into_inner) = faq;
    }

    pub async fn on_input(&self, key: &str, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.core.input(key, value.into()).await
    }

    pub async fn on_blur(&self, key: &str) -> bool {
        self.core.blur(key).await
    }

    /// Subject picked: fill a blank message with the subject's template and
    /// show its FAQ panel, or hide the panel when it has none.
    pub async fn on_subject_change(&self, subject: &str) -> SubjectChange {
        self.core.input("subject", subject.into()).await;

        let template_inserted = match subject_template(subject) {
            Some(template) => {
                self.core
                    .edit(|form| {
                        form.text("message").trim().is_empty()
                            && form.set_value("message", template)
                    })
                    .await
            }
            None => false,
        };

        let faq = subject_faq(subject);
        self.set_faq(faq);

        SubjectChange {
            template_inserted,
            faq,
        }
    }

    /// Validate, screen for spam, deliver, then confirm
    pub async fn submit(&self) -> SubmitOutcome {
        let started = Instant::now();
        let snapshot = match self.core.begin_submit().await {
            Ok(snapshot) => snapshot,
            Err(outcome) => return outcome,
        };

        let clear_task = self.core.drafts().clear_at(started + self.clear_delay);

        if let Some(reason) = screen(&snapshot) {
            warn!(reason, "contact submission dropped as spam");
            tokio::time::sleep(self.settings.submit_delay()).await;
        } else if let Err(err) = self.core.deliver(&snapshot).await {
            clear_task.abort();
            return SubmitOutcome::Failed(err);
        }

        let subject = snapshot.text("subject").to_string();
        let surfaces = self.core.surfaces();
        surfaces.modals.show(CONTACT_MODAL, None);
        surfaces.track(AnalyticsEvent {
            action: "contact_submitted".to_string(),
            category: "Contact".to_string(),
            label: subject.clone(),
            value: 1,
        });

        self.core.complete().await;
        // A save queued during delivery holds the values that were just sent
        self.core.drafts().cancel_pending();
        self.set_faq(None);
        self.core.settle().await;

        info!(subject = %subject, "contact message sent");
        SubmitOutcome::Confirmed(Confirmation::Contact { subject })
    }
}

/// Why a submission looks automated, if it does
fn screen(snapshot: &FormSnapshot) -> Option<&'static str> {
    if !snapshot.text(HONEYPOT_FIELD).is_empty() {
        Some("honeypot")
    } else if is_spam(snapshot.text("message")) {
        Some("keyword")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1000, false)]
    #[case(900, 100, false)]
    #[case(901, 99, true)]
    #[case(1001, -1, true)]
    fn test_char_counter(#[case] length: usize, #[case] remaining: i64, #[case] low: bool) {
        let counter = CharCounter::new(&"á".repeat(length), 1000);
        assert_eq!(counter, CharCounter { remaining, low });
    }

    #[test]
    fn test_counter_text() {
        assert_eq!(CharCounter::new("", 1000).text(), "1000 caracteres restantes");
    }

    #[rstest]
    #[case("Ganhe no CASINO hoje", true)]
    #[case("Please Click Here now", true)]
    #[case("Gostaria de agendar uma visita", false)]
    fn test_is_spam(#[case] message: &str, #[case] expected: bool) {
        assert_eq!(is_spam(message), expected);
    }

    #[test]
    fn test_templates_and_faqs() {
        assert!(subject_template("doacao").unwrap().contains("doação"));
        assert_eq!(subject_template("outro"), None);

        assert_eq!(subject_faq("pesquisa").unwrap().title, "Para Pesquisadores:");
        assert_eq!(subject_faq("educativo").unwrap().items.len(), 3);
        assert_eq!(subject_faq("imprensa"), None);
    }

    #[test]
    fn test_screen() {
        let clean = FormSnapshot::from_pairs([("message", "Bom dia"), ("website", "")]);
        assert_eq!(screen(&clean), None);

        let bot = FormSnapshot::from_pairs([("message", "Bom dia"), ("website", "http://x")]);
        assert_eq!(screen(&bot), Some("honeypot"));

        let spam = FormSnapshot::from_pairs([("message", "You are a WINNER"), ("website", "")]);
        assert_eq!(screen(&spam), Some("keyword"));
    }

    #[test]
    fn test_layout_uses_configured_limits() {
        let settings = ContactConfig {
            message_min_chars: 20,
            ..FormsConfig::default().contact
        };
        let form = contact_form(&settings);
        assert_eq!(
            form.field("message").unwrap().rule(),
            Some(FieldRule::Message { min: 20, max: 1000 })
        );
        assert_eq!(form.field(HONEYPOT_FIELD).unwrap().kind(), FieldKind::Hidden);
    }
}
