//! Extraction of the three message sections from a free-form generator reply.
//!
//! The prompt asks for this layout:
//!
//! ```text
//! WHATSAPP:
//! <message>
//!
//! EMAIL:
//! <message>
//!
//! CALL:
//! <message>
//! ```
//!
//! Models follow it loosely, so parsing runs in two tiers. Tier 1 splits on
//! blank lines and reads blocks that begin with a label. If any section is
//! still missing, Tier 2 walks the reply line by line with a small state
//! machine that switches section whenever a label shows up anywhere in a
//! line. Tier 2 also runs when a Tier 1 block swallowed another label, which
//! happens when the model leaves out the blank lines. Tier 2 replaces only
//! sections Tier 1 left empty or that carry an embedded label.

use regex::Regex;
use std::sync::LazyLock;

pub const WHATSAPP_LABEL: &str = "WHATSAPP:";
pub const EMAIL_LABEL: &str = "EMAIL:";
pub const CALL_LABEL: &str = "CALL:";

static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("blank line pattern is valid"));

static LABEL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"WHATSAPP:|EMAIL:|CALL:").expect("label pattern is valid"));

/// One of the three requested message sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Whatsapp,
    Email,
    Call,
}

const LABELS: [(&str, Section); 3] = [
    (WHATSAPP_LABEL, Section::Whatsapp),
    (EMAIL_LABEL, Section::Email),
    (CALL_LABEL, Section::Call),
];

impl Section {
    fn from_label(label: &str) -> Option<Self> {
        LABELS
            .iter()
            .find(|(candidate, _)| *candidate == label)
            .map(|(_, section)| *section)
    }
}

/// Sections recovered from a reply. An empty string means "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSections {
    pub whatsapp: String,
    pub email: String,
    pub call: String,
}

impl ParsedSections {
    pub fn is_complete(&self) -> bool {
        !self.whatsapp.is_empty() && !self.email.is_empty() && !self.call.is_empty()
    }

    /// True when some section is missing or has another label glued into it.
    fn needs_line_scan(&self) -> bool {
        [&self.whatsapp, &self.email, &self.call]
            .into_iter()
            .any(|text| text.is_empty() || LABEL_MARKER.is_match(text))
    }

    fn slot(&mut self, section: Section) -> &mut String {
        match section {
            Section::Whatsapp => &mut self.whatsapp,
            Section::Email => &mut self.email,
            Section::Call => &mut self.call,
        }
    }

    /// Take the line-scan value for every section that is empty or carries
    /// an embedded label. Clean sections are kept.
    fn replace_unreliable_from(&mut self, other: ParsedSections) {
        for (mine, theirs) in [
            (&mut self.whatsapp, other.whatsapp),
            (&mut self.email, other.email),
            (&mut self.call, other.call),
        ] {
            if mine.is_empty() || LABEL_MARKER.is_match(mine) {
                *mine = theirs;
            }
        }
    }
}

/// Parse a reply with Tier 1, falling back to Tier 2 for missing or
/// label-polluted sections.
pub fn parse_reply(reply: &str) -> ParsedSections {
    let reply = reply.replace("\r\n", "\n");

    let mut sections = parse_blocks(&reply);
    if !sections.needs_line_scan() {
        return sections;
    }

    tracing::debug!("Reply layout incomplete after block parsing, scanning line by line");
    sections.replace_unreliable_from(parse_lines(&reply));
    sections
}

/// Tier 1: blank-line separated blocks, each starting with a label.
///
/// A label repeated in a later block replaces the earlier value.
pub fn parse_blocks(reply: &str) -> ParsedSections {
    let mut sections = ParsedSections::default();

    for block in BLANK_LINE.split(reply) {
        let block = block.trim_start();
        for (label, section) in LABELS {
            if let Some(rest) = block.strip_prefix(label) {
                *sections.slot(section) = rest.trim().to_string();
                break;
            }
        }
    }

    sections
}

/// Tier 2 parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    NoSection,
    InWhatsapp,
    InEmail,
    InCall,
}

impl ParserState {
    fn section(self) -> Option<Section> {
        match self {
            ParserState::NoSection => None,
            ParserState::InWhatsapp => Some(Section::Whatsapp),
            ParserState::InEmail => Some(Section::Email),
            ParserState::InCall => Some(Section::Call),
        }
    }

    fn entering(section: Section) -> Self {
        match section {
            Section::Whatsapp => ParserState::InWhatsapp,
            Section::Email => ParserState::InEmail,
            Section::Call => ParserState::InCall,
        }
    }
}

/// Line-oriented state machine behind Tier 2.
struct LineScanner {
    state: ParserState,
    buffer: Vec<String>,
    sections: ParsedSections,
}

impl LineScanner {
    fn new() -> Self {
        Self {
            state: ParserState::NoSection,
            buffer: Vec::new(),
            sections: ParsedSections::default(),
        }
    }

    /// Append text to the active section; text outside any section is dropped.
    fn push(&mut self, text: &str) {
        if self.state != ParserState::NoSection {
            self.buffer.push(text.to_string());
        }
    }

    fn switch_to(&mut self, section: Section) {
        self.flush();
        self.state = ParserState::entering(section);
    }

    fn flush(&mut self) {
        let text = self.buffer.join("\n");
        self.buffer.clear();

        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if let Some(section) = self.state.section() {
            *self.sections.slot(section) = text.to_string();
        }
    }

    fn feed_line(&mut self, line: &str) {
        let mut cursor = 0;
        let mut saw_marker = false;

        for marker in LABEL_MARKER.find_iter(line) {
            let before = &line[cursor..marker.start()];
            if !before.trim().is_empty() {
                self.push(before);
            }
            if let Some(section) = Section::from_label(marker.as_str()) {
                self.switch_to(section);
            }
            cursor = marker.end();
            saw_marker = true;
        }

        let rest = &line[cursor..];
        if saw_marker {
            // Text right after a label on the same line opens the section
            if !rest.trim().is_empty() {
                self.push(rest.trim_start());
            }
        } else {
            self.push(rest);
        }
    }

    fn finish(mut self) -> ParsedSections {
        self.flush();
        self.sections
    }
}

/// Tier 2: scan every line for labels, wherever they appear.
pub fn parse_lines(reply: &str) -> ParsedSections {
    let mut scanner = LineScanner::new();
    for line in reply.lines() {
        scanner.feed_line(line);
    }
    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_reply_uses_blocks() {
        let reply = "WHATSAPP:\nHi Asha! Quick chat about SEO?\n\nEMAIL:\nSubject: SEO for you\nHi Asha, let's talk.\n\nCALL:\nHi Asha, calling about SEO.";
        let parsed = parse_blocks(reply);

        assert_eq!(parsed.whatsapp, "Hi Asha! Quick chat about SEO?");
        assert_eq!(parsed.email, "Subject: SEO for you\nHi Asha, let's talk.");
        assert_eq!(parsed.call, "Hi Asha, calling about SEO.");
        assert_eq!(parse_reply(reply), parsed);
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        let parsed = parse_reply("whatsapp:\nhello\n\nEmail:\nbody\n\ncall:\nscript");
        assert_eq!(parsed, ParsedSections::default());
    }

    #[test]
    fn test_block_must_start_with_label() {
        let parsed = parse_blocks("Sure! WHATSAPP: hello\n\nEMAIL: body\n\nCALL: script");
        assert!(parsed.whatsapp.is_empty());
        assert_eq!(parsed.email, "body");
        assert_eq!(parsed.call, "script");
    }

    #[test]
    fn test_repeated_label_in_blocks_keeps_last() {
        let parsed = parse_blocks("CALL: first\n\nCALL: second");
        assert_eq!(parsed.call, "second");
    }

    #[test]
    fn test_crlf_and_whitespace_only_separators() {
        let reply = "WHATSAPP: hi\r\n  \r\nEMAIL: mail\r\n\t\r\nCALL: call";
        let parsed = parse_reply(reply);
        assert_eq!(parsed.whatsapp, "hi");
        assert_eq!(parsed.email, "mail");
        assert_eq!(parsed.call, "call");
    }

    #[test]
    fn test_lines_recover_labels_without_blank_lines() {
        let reply = "Here are your messages. WHATSAPP: Hi Ravi!\nSee you soon.\nEMAIL: Subject: PPC\nDear Ravi,\nCALL: Hello Ravi,\ngot a minute?";
        let parsed = parse_lines(reply);

        assert_eq!(parsed.whatsapp, "Hi Ravi!\nSee you soon.");
        assert_eq!(parsed.email, "Subject: PPC\nDear Ravi,");
        assert_eq!(parsed.call, "Hello Ravi,\ngot a minute?");
    }

    #[test]
    fn test_two_labels_on_one_line() {
        let parsed = parse_lines("WHATSAPP: hey there EMAIL: formal note CALL: ring ring");
        assert_eq!(parsed.whatsapp, "hey there");
        assert_eq!(parsed.email, "formal note");
        assert_eq!(parsed.call, "ring ring");
    }

    #[test]
    fn test_text_before_first_label_is_ignored() {
        let parsed = parse_lines("Sure, happy to help!\nCALL:\nHi there");
        assert!(parsed.whatsapp.is_empty());
        assert_eq!(parsed.call, "Hi there");
    }

    #[test]
    fn test_glued_label_is_split_by_line_scan() {
        // CALL is glued to the email block
        let reply = "WHATSAPP: chat text\n\nEMAIL: mail text\nCALL: call text";
        let parsed = parse_reply(reply);

        assert_eq!(parsed.whatsapp, "chat text");
        assert_eq!(parsed.email, "mail text");
        assert_eq!(parsed.call, "call text");
    }

    #[test]
    fn test_reply_without_blank_lines() {
        let parsed = parse_reply("WHATSAPP:\nHi Ravi\nEMAIL:\nSubject: PPC\nCALL:\nHello Ravi");
        assert_eq!(parsed.whatsapp, "Hi Ravi");
        assert_eq!(parsed.email, "Subject: PPC");
        assert_eq!(parsed.call, "Hello Ravi");
    }

    #[test]
    fn test_single_line_reply() {
        let parsed = parse_reply("WHATSAPP: hey EMAIL: note CALL: ring");
        assert_eq!(parsed.whatsapp, "hey");
        assert_eq!(parsed.email, "note");
        assert_eq!(parsed.call, "ring");
    }

    #[test]
    fn test_clean_block_value_survives_line_scan() {
        // Line scan would also pull the stray line into EMAIL; the clean block wins
        let reply = "EMAIL: mail body\n\nstray line\nWHATSAPP: hi CALL: ring";
        let parsed = parse_reply(reply);

        assert_eq!(parsed.whatsapp, "hi");
        assert_eq!(parsed.email, "mail body");
        assert_eq!(parsed.call, "ring");
    }

    #[test]
    fn test_label_glued_into_complete_layout() {
        // Every section is filled by blocks, but WHATSAPP swallowed an EMAIL label
        let reply = "WHATSAPP: hi EMAIL: stray\n\nEMAIL: real mail\n\nCALL: ring";
        let parsed = parse_reply(reply);

        assert_eq!(parsed.whatsapp, "hi");
        assert_eq!(parsed.email, "real mail");
        assert_eq!(parsed.call, "ring");
    }

    #[test]
    fn test_empty_and_garbled_replies() {
        assert_eq!(parse_reply(""), ParsedSections::default());
        assert_eq!(parse_reply("\n\n\n"), ParsedSections::default());
        assert_eq!(parse_reply("lorem ipsum\n\ndolor"), ParsedSections::default());
    }

    #[test]
    fn test_label_without_body_stays_empty() {
        let parsed = parse_reply("WHATSAPP:\n\nEMAIL:   \n\nCALL:");
        assert_eq!(parsed, ParsedSections::default());
    }
}
