//! Thread builders shared by the unit tests.

use chrono::{DateTime, TimeZone, Utc};

use super::types::{Category, Domain, Message, Participant, Thread, ThreadId};

pub(crate) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
}

pub(crate) fn hermione() -> Participant {
    Participant::new("Hermione Granger", "hermione@hogwarts.edu")
}

pub(crate) struct ThreadBuilder(Thread);

impl ThreadBuilder {
    pub(crate) fn new(id: &str) -> Self {
        let sender = hermione();
        Self(Thread {
            id: ThreadId::new(id),
            subject: format!("Thread {}", id),
            timestamp: base_time(),
            account: Domain::Hogwarts,
            category: Category::Primary,
            participants: vec![sender.clone()],
            messages: vec![Message {
                sender,
                body: "<p>Hello there</p>".to_string(),
                timestamp: base_time(),
            }],
            is_read: false,
            is_starred: false,
            is_archived: false,
            snoozed_until: None,
        })
    }

    pub(crate) fn account(mut self, domain: Domain) -> Self {
        self.0.account = domain;
        self
    }

    pub(crate) fn category(mut self, category: Category) -> Self {
        self.0.category = category;
        self
    }

    pub(crate) fn subject(mut self, subject: &str) -> Self {
        self.0.subject = subject.to_string();
        self
    }

    pub(crate) fn timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.0.timestamp = at;
        self
    }

    pub(crate) fn read(mut self) -> Self {
        self.0.is_read = true;
        self
    }

    pub(crate) fn starred(mut self) -> Self {
        self.0.is_starred = true;
        self
    }

    pub(crate) fn archived(mut self) -> Self {
        self.0.is_archived = true;
        self
    }

    pub(crate) fn snoozed_until(mut self, until: DateTime<Utc>) -> Self {
        self.0.snoozed_until = Some(until);
        self
    }

    pub(crate) fn participant(mut self, participant: Participant) -> Self {
        self.0.participants.push(participant);
        self
    }

    /// Replace the message list with a single message
    pub(crate) fn only_message(mut self, sender: Participant, body: &str) -> Self {
        self.0.messages = vec![Message {
            sender,
            body: body.to_string(),
            timestamp: self.0.timestamp,
        }];
        self
    }

    pub(crate) fn reply(mut self, sender: Participant, body: &str) -> Self {
        self.0.messages.push(Message {
            sender,
            body: body.to_string(),
            timestamp: self.0.timestamp,
        });
        self
    }

    pub(crate) fn no_messages(mut self) -> Self {
        self.0.messages.clear();
        self
    }

    pub(crate) fn build(self) -> Thread {
        self.0
    }
}

pub(crate) fn ids(threads: &[&Thread]) -> Vec<String> {
    threads.iter().map(|t| t.id.to_string()).collect()
}
