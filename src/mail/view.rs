use chrono::{DateTime, Utc};

use super::types::{Category, Domain, Identities, Thread, View};

/// Not archived, in a base-folder category and not snoozed. Domain is not checked.
pub fn is_inbox_eligible(thread: &Thread, now: DateTime<Utc>) -> bool {
    !thread.is_archived && thread.category.is_base_folder() && !thread.is_snoozed(now)
}

/// Whether `thread` belongs to the base (pre-search) set of `view`.
///
/// Unrecognized views use the inbox predicate.
pub fn matches_view(
    thread: &Thread,
    view: &View,
    domain: Domain,
    now: DateTime<Utc>,
    identities: &Identities,
) -> bool {
    match view {
        View::Inbox | View::Other(_) => thread.account == domain && is_inbox_eligible(thread, now),
        View::Todos => in_category(thread, Category::Todos, now),
        View::Finance => in_category(thread, Category::Finance, now),
        View::Feedback => in_category(thread, Category::Feedback, now),
        View::Travel => in_category(thread, Category::Travel, now),
        View::Starred => thread.is_starred && !thread.is_snoozed(now),
        View::Snoozed => thread.is_snoozed(now),
        View::AllSent => {
            !thread.is_draft()
                && thread
                    .last_sender_email()
                    .is_some_and(|email| identities.is_local(email))
        }
        View::Sent => {
            let me = &identities.for_domain(domain).email;
            thread.account == domain
                && !thread.is_draft()
                && thread.last_sender_email() == Some(me.as_str())
        }
        View::Drafts => thread.account == domain && thread.is_draft(),
        View::Archive => thread.account == domain && thread.is_archived,
        View::Folders => false,
    }
}

fn in_category(thread: &Thread, category: Category, now: DateTime<Utc>) -> bool {
    thread.category == category && !thread.is_snoozed(now)
}

/// Base candidate set for a folder view, in store order
pub fn select_base<'a>(
    threads: &'a [Thread],
    view: &View,
    domain: Domain,
    now: DateTime<Utc>,
    identities: &Identities,
) -> Vec<&'a Thread> {
    threads
        .iter()
        .filter(|t| matches_view(t, view, domain, now, identities))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::fixtures::{base_time, ids, ThreadBuilder};
    use crate::mail::types::Participant;
    use chrono::Duration;

    fn me() -> Identities {
        Identities::default()
    }

    #[test]
    fn test_inbox_scoped_by_domain_category_archive_snooze() {
        let now = base_time();
        let threads = vec![
            ThreadBuilder::new("hog").build(),
            ThreadBuilder::new("liv").account(Domain::Liverpool).build(),
            ThreadBuilder::new("archived").archived().build(),
            ThreadBuilder::new("todo").category(Category::Todos).build(),
            ThreadBuilder::new("snoozed")
                .snoozed_until(now + Duration::hours(1))
                .build(),
            ThreadBuilder::new("woke")
                .snoozed_until(now - Duration::hours(1))
                .build(),
            ThreadBuilder::new("social").category(Category::Social).read().build(),
        ];

        let inbox = select_base(&threads, &View::Inbox, Domain::Hogwarts, now, &me());
        assert_eq!(ids(&inbox), vec!["hog", "woke", "social"]);

        let inbox = select_base(&threads, &View::Inbox, Domain::Liverpool, now, &me());
        assert_eq!(ids(&inbox), vec!["liv"]);
    }

    #[test]
    fn test_unknown_view_falls_back_to_inbox() {
        let now = base_time();
        let threads = vec![
            ThreadBuilder::new("a").build(),
            ThreadBuilder::new("b").archived().build(),
        ];
        let view = View::from_name("no-such-folder");
        let got = select_base(&threads, &view, Domain::Hogwarts, now, &me());
        let inbox = select_base(&threads, &View::Inbox, Domain::Hogwarts, now, &me());
        assert_eq!(ids(&got), ids(&inbox));
    }

    #[test]
    fn test_category_views_ignore_domain() {
        let now = base_time();
        let threads = vec![
            ThreadBuilder::new("t1").category(Category::Travel).build(),
            ThreadBuilder::new("t2")
                .category(Category::Travel)
                .account(Domain::Liverpool)
                .archived()
                .build(),
            ThreadBuilder::new("t3")
                .category(Category::Travel)
                .snoozed_until(now + Duration::days(1))
                .build(),
            ThreadBuilder::new("f1").category(Category::Finance).build(),
        ];
        let travel = select_base(&threads, &View::Travel, Domain::Hogwarts, now, &me());
        assert_eq!(ids(&travel), vec!["t1", "t2"]);
        let finance = select_base(&threads, &View::Finance, Domain::Liverpool, now, &me());
        assert_eq!(ids(&finance), vec!["f1"]);
    }

    #[test]
    fn test_starred_and_snoozed_are_global() {
        let now = base_time();
        let threads = vec![
            ThreadBuilder::new("s1").starred().build(),
            ThreadBuilder::new("s2")
                .starred()
                .snoozed_until(now + Duration::minutes(1))
                .build(),
            ThreadBuilder::new("z1")
                .account(Domain::Liverpool)
                .archived()
                .snoozed_until(now + Duration::minutes(1))
                .build(),
        ];
        let starred = select_base(&threads, &View::Starred, Domain::Liverpool, now, &me());
        assert_eq!(ids(&starred), vec!["s1"]);
        let snoozed = select_base(&threads, &View::Snoozed, Domain::Hogwarts, now, &me());
        assert_eq!(ids(&snoozed), vec!["s2", "z1"]);
    }

    #[test]
    fn test_sent_views_use_last_message_sender() {
        let now = base_time();
        let identities = me();
        let hog_me = identities.hogwarts.clone();
        let liv_me = identities.liverpool.clone();
        let ron = Participant::new("Ron Weasley", "ron@hogwarts.edu");

        let threads = vec![
            ThreadBuilder::new("hog-sent")
                .reply(hog_me.clone(), "on my way")
                .build(),
            ThreadBuilder::new("liv-sent")
                .account(Domain::Liverpool)
                .only_message(liv_me.clone(), "match tickets")
                .build(),
            ThreadBuilder::new("answered")
                .reply(hog_me.clone(), "thanks")
                .reply(ron, "no worries")
                .build(),
            ThreadBuilder::new("draft")
                .subject("(Draft) Quidditch schedule")
                .only_message(hog_me.clone(), "tbd")
                .build(),
            ThreadBuilder::new("empty").no_messages().build(),
        ];

        let all_sent = select_base(&threads, &View::AllSent, Domain::Hogwarts, now, &identities);
        assert_eq!(ids(&all_sent), vec!["hog-sent", "liv-sent"]);

        let sent = select_base(&threads, &View::Sent, Domain::Hogwarts, now, &identities);
        assert_eq!(ids(&sent), vec!["hog-sent"]);

        let sent = select_base(&threads, &View::Sent, Domain::Liverpool, now, &identities);
        assert_eq!(ids(&sent), vec!["liv-sent"]);

        let drafts = select_base(&threads, &View::Drafts, Domain::Hogwarts, now, &identities);
        assert_eq!(ids(&drafts), vec!["draft"]);
    }

    #[test]
    fn test_archive_and_folders() {
        let now = base_time();
        let threads = vec![
            ThreadBuilder::new("a1").archived().build(),
            ThreadBuilder::new("a2")
                .archived()
                .account(Domain::Liverpool)
                .build(),
            ThreadBuilder::new("live").build(),
        ];
        let archive = select_base(&threads, &View::Archive, Domain::Hogwarts, now, &me());
        assert_eq!(ids(&archive), vec!["a1"]);
        assert!(select_base(&threads, &View::Folders, Domain::Hogwarts, now, &me()).is_empty());
    }

    #[test]
    fn test_snooze_expiry_returns_thread_without_writes() {
        let now = base_time();
        let until = now + Duration::minutes(10);
        let threads = vec![ThreadBuilder::new("nap").snoozed_until(until).build()];

        let before = select_base(&threads, &View::Inbox, Domain::Hogwarts, now, &me());
        assert!(before.is_empty());

        let just_before = until - Duration::milliseconds(1);
        assert!(select_base(&threads, &View::Inbox, Domain::Hogwarts, just_before, &me()).is_empty());

        let at = select_base(&threads, &View::Inbox, Domain::Hogwarts, until, &me());
        assert_eq!(ids(&at), vec!["nap"]);
        assert!(select_base(&threads, &View::Snoozed, Domain::Hogwarts, until, &me()).is_empty());
    }
}
