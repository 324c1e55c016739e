//! Hand-written follow-up copy used when generated text is missing or the
//! generator fails.

use crate::models::{AIMessages, Lead};

/// Chat message used when the reply had no WHATSAPP section.
pub fn whatsapp_placeholder(lead: &Lead) -> String {
    format!(
        "Hi {}! We saw your interest in {}. Let's discuss how we can help you grow!",
        lead.name, lead.service_interest
    )
}

/// Email used when the reply had no EMAIL section.
pub fn email_placeholder(lead: &Lead) -> String {
    format!(
        "Subject: Your {service} Inquiry\n\nHi {name},\n\nThank you for your interest. We'd love to discuss your {service} needs.",
        service = lead.service_interest,
        name = lead.name
    )
}

/// Call opener used when the reply had no CALL section.
pub fn call_placeholder(lead: &Lead) -> String {
    format!(
        "Hi {}, I'm calling about your interest in {}. Is this a good time to chat?",
        lead.name, lead.service_interest
    )
}

/// Complete message set used when the generator could not be reached.
pub fn failure_messages(lead: &Lead) -> AIMessages {
    AIMessages {
        whatsapp: format!(
            "Hi {}! We saw your interest in {}. Can we schedule a quick call to discuss your needs?",
            lead.name, lead.service_interest
        ),
        email: format!(
            "Subject: Your {service} Inquiry\n\nHi {name},\n\nThank you for reaching out regarding {service}. We'd love to help you achieve your marketing goals in {location}.\n\nBest regards,\nMarketing Team",
            service = lead.service_interest,
            name = lead.name,
            location = lead.location
        ),
        call_script: format!(
            "Hi {}, this is [Your Name] from [Agency]. I'm calling about your interest in {}. Do you have a few minutes to discuss how we can help?",
            lead.name, lead.service_interest
        ),
    }
}
