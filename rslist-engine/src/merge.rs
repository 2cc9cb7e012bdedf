//! Display ordering: purchased slots pinned into the vote ordering.

use rslist_domain::Event;

/// Merge ranked events into a vote-ordered list.
///
/// `by_votes` must already be sorted by `vote_num` descending with a stable
/// tie-break. Ranked events are pulled out and reinserted at `rank - 1`,
/// lowest rank first, so each later insert lands around the earlier ones.
/// A rank past the end of the list appends.
///
/// The output is a permutation of the input.
pub fn merge_ranked(by_votes: Vec<Event>) -> Vec<Event> {
    let (mut ranked, mut merged): (Vec<Event>, Vec<Event>) =
        by_votes.into_iter().partition(Event::is_ranked);

    // stable: duplicate ranks keep vote order
    ranked.sort_by_key(|e| e.rank);

    for event in ranked {
        let index = event.rank.map_or(merged.len(), |r| r.index()).min(merged.len());
        merged.insert(index, event);
    }

    merged
}
