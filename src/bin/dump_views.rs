//! Print what every folder holds for the configured mailbox, plus the counters.
//!
//! Usage: dump_views [search query]

use chrono::Utc;
use owlpost::app::sidebar_entries;
use owlpost::config::Config;
use owlpost::mail::seed::{default_threads, load_seed};
use owlpost::mail::{derive, snoozed_count, unread_counts, ViewState};

fn main() -> anyhow::Result<()> {
    let config = Config::load();
    let identities = config.identities();
    let now = Utc::now();

    let threads = match config.seed_path() {
        Some(path) => load_seed(&std::fs::read_to_string(&path)?, &identities, now)?,
        None => default_threads(&identities, now)?,
    };
    println!("Total threads: {}", threads.len());

    let counts = unread_counts(&threads, now);
    println!(
        "Unread: hogwarts {}, liverpool {}  Snoozed: {}",
        counts.hogwarts,
        counts.liverpool,
        snoozed_count(&threads, now)
    );

    let query: Vec<String> = std::env::args().skip(1).collect();
    let mut state = ViewState::default();
    state.filters.query = query.join(" ");

    if state.filters.query_active() {
        let outcome = derive(&threads, &state, now, &identities);
        println!("\nSearch {:?}: {} result(s)", state.filters.query, outcome.threads.len());
        for t in &outcome.threads {
            println!("  [{}] {}", t.id, t.subject);
        }
        return Ok(());
    }

    for entry in sidebar_entries() {
        state.view = entry.view.clone();
        if let Some(domain) = entry.domain {
            state.domain = domain;
        }
        let outcome = derive(&threads, &state, now, &identities);
        println!("\n{} ({})", entry.label(), outcome.threads.len());
        for t in &outcome.threads {
            let read = if t.is_read { " " } else { "*" };
            println!("  {}[{}] {}", read, t.id, t.subject);
        }
    }

    Ok(())
}
