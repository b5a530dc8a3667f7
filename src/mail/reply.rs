use regex::Regex;
use std::sync::LazyLock;

use super::search::strip_tags;
use super::types::{Message, Participant, Thread};

static BR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("br pattern is valid"));
static PARA_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p>\s*<p>").expect("paragraph pattern is valid"));
static PARA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?p>").expect("p pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Reply,
    ReplyAll,
    Forward,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Turn an HTML-ish body into plain text keeping line structure
pub fn body_to_text(body: &str) -> String {
    let text = BR_RE.replace_all(body, "\n");
    let text = PARA_BREAK_RE.replace_all(&text, "\n\n");
    let text = PARA_RE.replace_all(&text, "");
    strip_tags(&text).trim().to_string()
}

fn prefixed(subject: &str, prefix: &str) -> String {
    if subject.starts_with(prefix) {
        subject.to_string()
    } else {
        format!("{} {}", prefix, subject)
    }
}

fn quote(message: &Message) -> String {
    let quoted: Vec<String> = body_to_text(&message.body)
        .lines()
        .map(|line| format!("> {}", line))
        .collect();
    format!(
        "\n\n\n--- On {}, {} wrote: ---\n{}",
        message.timestamp.format("%b %-d, %Y, %H:%M"),
        message.sender.name,
        quoted.join("\n")
    )
}

/// Prefill a reply, reply-all or forward.
///
/// `quoting` defaults to the last message of the thread. `me` is excluded
/// from reply-all recipients.
pub fn draft_for(
    thread: &Thread,
    kind: ReplyKind,
    me: &Participant,
    quoting: Option<&Message>,
) -> Draft {
    let Some(message) = quoting.or(thread.last_message()) else {
        return Draft {
            subject: thread.subject.clone(),
            ..Default::default()
        };
    };

    let (to, subject) = match kind {
        ReplyKind::Reply => (
            message.sender.email.clone(),
            prefixed(&thread.subject, "Re:"),
        ),
        ReplyKind::ReplyAll => {
            let to: Vec<&str> = thread
                .participants
                .iter()
                .filter(|p| p.email != me.email)
                .map(|p| p.email.as_str())
                .collect();
            (to.join(", "), prefixed(&thread.subject, "Re:"))
        }
        ReplyKind::Forward => (String::new(), prefixed(&thread.subject, "Fwd:")),
    };

    Draft {
        to,
        subject,
        body: quote(message),
    }
}
