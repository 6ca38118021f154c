use log::{error, info, warn};

use crate::config::AppConfig;
use crate::models::contact::ContactForm;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactStatus {
    Required,
    NotConfigured,
    Failed,
    Submitted,
}

impl ContactStatus {
    pub fn message(&self) -> &'static str {
        match self {
            ContactStatus::Required => "All fields are required",
            ContactStatus::NotConfigured => "The contact service is not configured.",
            ContactStatus::Failed => "Failed to submit the form. Please try again.",
            ContactStatus::Submitted => "Form submitted successfully!",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ContactStatus::Submitted)
    }
}

/// What the form shows after a submit: a status line and the field values
/// to put back (blank after a successful insert).
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub status: ContactStatus,
    pub form: ContactForm,
}

/// Validate and store one contact message. Nothing reaches the store
/// unless all three fields are filled and the data service is configured.
pub fn submit(store: &dyn Store, config: &AppConfig, form: ContactForm) -> SubmitOutcome {
    if !form.is_complete() {
        return SubmitOutcome {
            status: ContactStatus::Required,
            form,
        };
    }

    if !config.is_configured() {
        warn!("Contact submission skipped: data service settings are missing");
        return SubmitOutcome {
            status: ContactStatus::NotConfigured,
            form,
        };
    }

    let row = ContactForm {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        message: form.message.trim().to_string(),
    };
    match store.contact_create(&row) {
        Ok(id) => {
            info!("Contact message {} stored", id);
            SubmitOutcome {
                status: ContactStatus::Submitted,
                form: ContactForm::default(),
            }
        }
        Err(e) => {
            error!("Error inserting contact message: {}", e);
            SubmitOutcome {
                status: ContactStatus::Failed,
                form,
            }
        }
    }
}
