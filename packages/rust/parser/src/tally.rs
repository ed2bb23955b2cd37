//! "Update Sources" section: how many items each upstream source contributed.

use briefbuilder_shared::SourceTally;

use crate::relevance::first_integer;

/// Read the per-source counts. Lines that mention no known source are ignored;
/// the first mention of each source wins.
pub fn parse_source_tally(body: &str) -> SourceTally {
    let mut tally = SourceTally::default();

    for line in body.lines() {
        let lower = line.to_lowercase();
        let slot = if lower.contains("newsletter") {
            &mut tally.newsletters
        } else if lower.contains("hacker news") || lower.contains("hn post") {
            &mut tally.hacker_news
        } else if lower.contains("github") {
            &mut tally.github_repos
        } else {
            continue;
        };

        if slot.is_none() {
            *slot = first_integer(line);
        }
    }

    tally
}
