//! Thread summaries.
//!
//! A [`Summarizer`] turns a prompt into text. [`SummaryRequests`] runs it off
//! the UI thread and hands results back tagged with the thread they were
//! asked for, so the app can drop answers that arrive after the user moved on.

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::mail::search::strip_tags;
use crate::mail::types::{Thread, ThreadId};

pub const SUMMARY_PROMPT: &str = "Provide a concise, bulleted summary of the key points and any action items from the following email thread.\n\n";

/// Shown in place of a summary when the summarizer fails
pub const SUMMARY_FAILED: &str = "Could not generate summary. Please try again.";

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("summary command io: {0}")]
    Io(#[from] std::io::Error),
    #[error("summary command exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("summarizer returned nothing")]
    Empty,
}

pub trait Summarizer: Send + Sync {
    fn summarize(&self, text: &str) -> Result<String, SummaryError>;
}

/// Pipes the prompt to `sh -c <command>` and reads the summary from stdout
#[derive(Debug, Clone)]
pub struct CommandSummarizer {
    command: String,
}

impl CommandSummarizer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Summarizer for CommandSummarizer {
    fn summarize(&self, text: &str) -> Result<String, SummaryError> {
        let mut child = Command::new("sh")
            .args(["-c", &self.command])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(SummaryError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let summary = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if summary.is_empty() {
            return Err(SummaryError::Empty);
        }
        Ok(summary)
    }
}

/// Offline fallback: one bullet per message with its opening sentence
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestSummarizer;

impl Summarizer for DigestSummarizer {
    fn summarize(&self, text: &str) -> Result<String, SummaryError> {
        let thread_text = text.split_once("\n\n").map_or(text, |(_, rest)| rest);
        let bullets: Vec<String> = thread_text
            .lines()
            .filter_map(|line| {
                let (name, body) = line.split_once(": ")?;
                let sentence = first_sentence(body);
                (!sentence.is_empty()).then(|| format!("• {}: {}", name.trim(), sentence))
            })
            .collect();

        if bullets.is_empty() {
            return Err(SummaryError::Empty);
        }
        Ok(bullets.join("\n"))
    }
}

fn first_sentence(text: &str) -> &str {
    let text = text.trim();
    match text.find(['.', '!', '?']) {
        Some(end) => &text[..=end],
        None => text,
    }
}

/// Prompt sent to the summarizer for `thread`
pub fn prompt_for(thread: &Thread) -> String {
    let lines: Vec<String> = thread
        .messages
        .iter()
        .map(|m| {
            let body = strip_tags(&m.body);
            format!("{}: {}", m.sender.name, body.split_whitespace().collect::<Vec<_>>().join(" "))
        })
        .collect();
    format!("{}{}", SUMMARY_PROMPT, lines.join("\n"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryStatus {
    Loading,
    Ready(String),
    Failed(String),
}

/// Summary shown for the open thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryState {
    pub thread_id: ThreadId,
    pub status: SummaryStatus,
}

impl SummaryState {
    pub fn loading(thread_id: ThreadId) -> Self {
        Self {
            thread_id,
            status: SummaryStatus::Loading,
        }
    }

    /// Commit `result` if it answers this request. Returns false for stale results.
    pub fn accept(&mut self, result: SummaryResult) -> bool {
        if result.thread_id != self.thread_id || self.status != SummaryStatus::Loading {
            debug!(thread = %result.thread_id, "dropping stale summary");
            return false;
        }
        self.status = match result.outcome {
            Ok(text) => SummaryStatus::Ready(text),
            Err(e) => {
                warn!(thread = %result.thread_id, error = %e, "summary failed");
                SummaryStatus::Failed(SUMMARY_FAILED.to_string())
            }
        };
        true
    }
}

#[derive(Debug)]
pub struct SummaryResult {
    pub thread_id: ThreadId,
    pub outcome: Result<String, SummaryError>,
}

/// Worker-thread dispatcher for summaries
pub struct SummaryRequests {
    summarizer: Arc<dyn Summarizer>,
    tx: Sender<SummaryResult>,
    rx: Receiver<SummaryResult>,
}

impl SummaryRequests {
    pub fn new(summarizer: Arc<dyn Summarizer>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { summarizer, tx, rx }
    }

    /// Start summarizing `thread` in the background
    pub fn request(&self, thread: &Thread) -> SummaryState {
        let thread_id = thread.id.clone();
        let prompt = prompt_for(thread);
        let summarizer = Arc::clone(&self.summarizer);
        let tx = self.tx.clone();
        let id = thread_id.clone();

        debug!(thread = %thread_id, "summary requested");
        std::thread::spawn(move || {
            let outcome = summarizer.summarize(&prompt);
            // Receiver gone means the app is shutting down
            let _ = tx.send(SummaryResult {
                thread_id: id,
                outcome,
            });
        });

        SummaryState::loading(thread_id)
    }

    /// Results that arrived since the last call
    pub fn drain(&self) -> Vec<SummaryResult> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::fixtures::{hermione, ThreadBuilder};
    use crate::mail::types::Participant;
    use std::time::Duration;

    struct Echo;

    impl Summarizer for Echo {
        fn summarize(&self, text: &str) -> Result<String, SummaryError> {
            Ok(format!("summary of {} chars", text.len()))
        }
    }

    struct Broken;

    impl Summarizer for Broken {
        fn summarize(&self, _text: &str) -> Result<String, SummaryError> {
            Err(SummaryError::Empty)
        }
    }

    fn wait_for(requests: &SummaryRequests) -> SummaryResult {
        requests
            .rx
            .recv_timeout(Duration::from_secs(5))
            .expect("summary worker answered")
    }

    #[test]
    fn test_prompt_strips_tags() {
        let thread = ThreadBuilder::new("t")
            .only_message(hermione(), "<p>Library at <b>eight</b>.</p>")
            .reply(Participant::new("Ron Weasley", "ron@hogwarts.edu"), "<p>Fine</p>")
            .build();
        let prompt = prompt_for(&thread);
        assert!(prompt.starts_with(SUMMARY_PROMPT));
        assert!(prompt.ends_with("Hermione Granger: Library at eight.\nRon Weasley: Fine"));
    }

    #[test]
    fn test_digest_one_bullet_per_message() {
        let thread = ThreadBuilder::new("t")
            .only_message(hermione(), "<p>Library at eight. Bring notes.</p>")
            .reply(Participant::new("Ron Weasley", "ron@hogwarts.edu"), "<p>Can't, practice</p>")
            .build();
        let digest = DigestSummarizer.summarize(&prompt_for(&thread)).unwrap();
        assert_eq!(
            digest,
            "• Hermione Granger: Library at eight.\n• Ron Weasley: Can't, practice"
        );
    }

    #[test]
    fn test_digest_of_empty_thread_fails() {
        let thread = ThreadBuilder::new("t").no_messages().build();
        assert!(matches!(
            DigestSummarizer.summarize(&prompt_for(&thread)),
            Err(SummaryError::Empty)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_summarizer_pipes_stdin() {
        let summarizer = CommandSummarizer::new("tr a-z A-Z");
        assert_eq!(summarizer.summarize("owl post").unwrap(), "OWL POST");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_summarizer_nonzero_exit() {
        let summarizer = CommandSummarizer::new("cat >/dev/null; exit 3");
        assert!(matches!(
            summarizer.summarize("text"),
            Err(SummaryError::Failed { .. })
        ));
    }

    #[test]
    fn test_result_applied_for_matching_thread() {
        let requests = SummaryRequests::new(Arc::new(Echo));
        let thread = ThreadBuilder::new("a").build();
        let mut state = requests.request(&thread);
        assert_eq!(state.status, SummaryStatus::Loading);

        assert!(state.accept(wait_for(&requests)));
        assert!(matches!(state.status, SummaryStatus::Ready(ref s) if s.starts_with("summary of")));
    }

    #[test]
    fn test_stale_result_dropped() {
        let requests = SummaryRequests::new(Arc::new(Echo));
        requests.request(&ThreadBuilder::new("a").build());
        let mut state = SummaryState::loading(ThreadId::new("b"));

        assert!(!state.accept(wait_for(&requests)));
        assert_eq!(state.status, SummaryStatus::Loading);
    }

    #[test]
    fn test_failure_becomes_message() {
        let requests = SummaryRequests::new(Arc::new(Broken));
        let mut state = requests.request(&ThreadBuilder::new("a").build());
        assert!(state.accept(wait_for(&requests)));
        assert_eq!(state.status, SummaryStatus::Failed(SUMMARY_FAILED.to_string()));
    }

    #[test]
    fn test_finished_state_ignores_late_duplicate() {
        let mut state = SummaryState {
            thread_id: ThreadId::new("a"),
            status: SummaryStatus::Ready("done".to_string()),
        };
        let late = SummaryResult {
            thread_id: ThreadId::new("a"),
            outcome: Ok("again".to_string()),
        };
        assert!(!state.accept(late));
        assert_eq!(state.status, SummaryStatus::Ready("done".to_string()));
    }
}
