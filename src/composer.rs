//! Follow-up message composition
//!
//! Flow for one lead:
//! 1. Build a prompt from name, service interest, location and category
//! 2. Ask the text generator for a reply (bounded by the configured timeout)
//! 3. Extract the WHATSAPP / EMAIL / CALL sections from the reply
//! 4. Fill any missing section from templates
//!
//! If step 2 fails in any way the reply is not parsed at all and the full
//! failure template set is returned instead.
use crate::generator::{GenerationError, TextGenerator};
use crate::models::{AIMessages, Lead};
use crate::reply_parser::parse_reply;
use crate::templates;
use std::sync::Arc;
use std::time::Duration;

/// Where the returned messages came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSource {
    /// All three sections were generated.
    Generated,
    /// The reply arrived but at least one section came from a template.
    Partial,
    /// The generator failed; every section is a template.
    Fallback,
}

/// Composed messages together with their provenance.
#[derive(Debug, Clone)]
pub struct ComposedMessages {
    pub messages: AIMessages,
    pub source: MessageSource,
}

/// Build the generation prompt for a lead.
pub fn build_prompt(lead: &Lead) -> String {
    format!(
        "Generate follow-up messages for this lead:
Name: {name}
Service Interest: {service}
Location: {location}
Category: {category}

Generate 3 messages:
1. WhatsApp message (short, friendly, max 2-3 lines)
2. Email message (professional subject + body, max 5 lines)
3. Call opening script (warm, conversational, max 3 lines)

Format:
WHATSAPP:
[message]

EMAIL:
[message]

CALL:
[message]",
        name = lead.name,
        service = lead.service_interest,
        location = lead.location,
        category = lead.category,
    )
}

/// Drafts follow-up messages for leads through a [`TextGenerator`].
#[derive(Clone)]
pub struct MessageComposer {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl MessageComposer {
    /// Creates a composer.
    ///
    /// # Arguments
    ///
    /// * `generator` - The text-generation backend.
    /// * `timeout` - Upper bound for one generation call.
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Compose the three messages for a lead. Always returns non-empty text.
    pub async fn compose(&self, lead: &Lead) -> AIMessages {
        self.compose_detailed(lead).await.messages
    }

    /// Same as [`compose`](Self::compose), also reporting whether the
    /// generator or the templates produced the text.
    pub async fn compose_detailed(&self, lead: &Lead) -> ComposedMessages {
        let prompt = build_prompt(lead);

        let reply = match self.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("AI generation failed for lead {}: {}", lead.id, e);
                return ComposedMessages {
                    messages: templates::failure_messages(lead),
                    source: MessageSource::Fallback,
                };
            }
        };

        let sections = parse_reply(&reply);
        let source = if sections.is_complete() {
            MessageSource::Generated
        } else {
            tracing::info!(
                "Generated reply for lead {} missing sections (whatsapp: {}, email: {}, call: {}), using templates",
                lead.id,
                !sections.whatsapp.is_empty(),
                !sections.email.is_empty(),
                !sections.call.is_empty()
            );
            MessageSource::Partial
        };

        let messages = AIMessages {
            whatsapp: non_empty_or(sections.whatsapp, || templates::whatsapp_placeholder(lead)),
            email: non_empty_or(sections.email, || templates::email_placeholder(lead)),
            call_script: non_empty_or(sections.call, || templates::call_placeholder(lead)),
        };

        ComposedMessages { messages, source }
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        tokio::time::timeout(self.timeout, self.generator.generate(prompt))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))?
    }
}

fn non_empty_or(text: String, fallback: impl FnOnce() -> String) -> String {
    if text.trim().is_empty() {
        fallback()
    } else {
        text
    }
}
