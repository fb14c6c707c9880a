use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

/// An artwork eligible for ranking, with the display fields the results page
/// needs alongside the score.
#[derive(Clone, Debug)]
pub struct ArtworkRow {
    pub badge_artwork_id: i32,
    pub artist_name: String,
    pub badge_name: String,
    pub artwork_file: String,
}

/// One persisted vote joined with the judge's name.
#[derive(Clone, Debug)]
pub struct VoteRow {
    pub badge_artwork_id: i32,
    pub judge_id: i32,
    pub judge_name: String,
    pub rank: i32,
}

#[derive(Clone, Debug)]
pub struct JudgeRow {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct LeaderboardRow {
    pub badge_artwork_id: i32,
    pub artist_name: String,
    pub badge_name: String,
    pub artwork_file: String,
    pub total_score: i64,
    pub vote_count: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct JudgeVoteDetail {
    pub judge_name: String,
    pub rank: i32,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct JudgeStatus {
    pub voted: Vec<String>,
    pub not_voted: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct CategoryResults {
    pub leaderboard: Vec<LeaderboardRow>,
    pub votes_by_artwork: BTreeMap<i32, Vec<JudgeVoteDetail>>,
}

/// Tally one category's leaderboard.
///
/// An artwork's score is the sum of every rank assigned to it; lower is
/// better. Artworks nobody has ranked score 0 and therefore sort to the front
/// of the ascending board, carrying `vote_count: 0` so callers can tell them
/// apart from genuinely top-ranked entries. Ties break by ascending
/// badge-artwork id so the order never depends on store iteration order.
pub fn aggregate(artworks: &[ArtworkRow], votes: &[VoteRow]) -> CategoryResults {
    let mut votes_by_artwork: BTreeMap<i32, Vec<JudgeVoteDetail>> = BTreeMap::new();
    let mut scores: BTreeMap<i32, i64> = BTreeMap::new();
    for vote in votes {
        *scores.entry(vote.badge_artwork_id).or_insert(0) += vote.rank as i64;
        votes_by_artwork
            .entry(vote.badge_artwork_id)
            .or_default()
            .push(JudgeVoteDetail {
                judge_name: vote.judge_name.clone(),
                rank: vote.rank,
            });
    }

    let mut leaderboard: Vec<LeaderboardRow> = artworks
        .iter()
        .map(|artwork| {
            let id = artwork.badge_artwork_id;
            LeaderboardRow {
                badge_artwork_id: id,
                artist_name: artwork.artist_name.clone(),
                badge_name: artwork.badge_name.clone(),
                artwork_file: artwork.artwork_file.clone(),
                total_score: scores.get(&id).copied().unwrap_or(0),
                vote_count: votes_by_artwork.get(&id).map_or(0, Vec::len),
            }
        })
        .collect();
    leaderboard.sort_by_key(|row| (row.total_score, row.badge_artwork_id));

    // keep only votes for artworks still in the store
    let known: HashSet<i32> = artworks.iter().map(|a| a.badge_artwork_id).collect();
    votes_by_artwork.retain(|id, _| known.contains(id));

    CategoryResults {
        leaderboard,
        votes_by_artwork,
    }
}

/// Partition the full judge roster into voted / not-voted. A judge counts as
/// voted if they have any vote row at all, in either category.
pub fn judge_status(roster: &[JudgeRow], votes: &[VoteRow]) -> JudgeStatus {
    let voted_ids: HashSet<i32> = votes.iter().map(|v| v.judge_id).collect();
    let mut status = JudgeStatus::default();
    for judge in roster {
        if voted_ids.contains(&judge.id) {
            status.voted.push(judge.name.clone());
        } else {
            status.not_voted.push(judge.name.clone());
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artwork(id: i32) -> ArtworkRow {
        ArtworkRow {
            badge_artwork_id: id,
            artist_name: format!("artist {id}"),
            badge_name: format!("badge {id}"),
            artwork_file: format!("{id}.png"),
        }
    }

    fn vote(artwork_id: i32, judge_id: i32, rank: i32) -> VoteRow {
        VoteRow {
            badge_artwork_id: artwork_id,
            judge_id,
            judge_name: format!("judge {judge_id}"),
            rank,
        }
    }

    #[test]
    fn score_is_sum_of_ranks() {
        let artworks = vec![artwork(1)];
        let votes = vec![vote(1, 1, 2), vote(1, 2, 1), vote(1, 3, 3)];
        let results = aggregate(&artworks, &votes);
        assert_eq!(results.leaderboard[0].total_score, 6);
        assert_eq!(results.leaderboard[0].vote_count, 3);
    }

    #[test]
    fn zero_vote_artwork_scores_zero_and_sorts_first() {
        let artworks = vec![artwork(1), artwork(2)];
        let votes = vec![vote(1, 1, 1)];
        let results = aggregate(&artworks, &votes);
        assert_eq!(results.leaderboard[0].badge_artwork_id, 2);
        assert_eq!(results.leaderboard[0].total_score, 0);
        assert_eq!(results.leaderboard[0].vote_count, 0);
        assert_eq!(results.leaderboard[1].badge_artwork_id, 1);
    }

    #[test]
    fn ties_break_by_ascending_artwork_id() {
        let artworks = vec![artwork(9), artwork(3), artwork(6)];
        let votes = vec![vote(9, 1, 2), vote(3, 1, 2), vote(6, 1, 2)];
        let results = aggregate(&artworks, &votes);
        let ids: Vec<i32> = results.leaderboard.iter().map(|r| r.badge_artwork_id).collect();
        assert_eq!(ids, vec![3, 6, 9]);
    }

    #[test]
    fn per_judge_breakdown_lists_every_vote() {
        let artworks = vec![artwork(1)];
        let votes = vec![vote(1, 1, 2), vote(1, 2, 1)];
        let results = aggregate(&artworks, &votes);
        let detail = &results.votes_by_artwork[&1];
        assert_eq!(detail.len(), 2);
        assert!(detail.iter().any(|d| d.judge_name == "judge 1" && d.rank == 2));
        assert!(detail.iter().any(|d| d.judge_name == "judge 2" && d.rank == 1));
    }

    #[test]
    fn votes_for_deleted_artworks_are_dropped() {
        let artworks = vec![artwork(1)];
        let votes = vec![vote(1, 1, 1), vote(99, 1, 2)];
        let results = aggregate(&artworks, &votes);
        assert!(!results.votes_by_artwork.contains_key(&99));
        assert_eq!(results.leaderboard.len(), 1);
    }

    #[test]
    fn judge_partition_is_exhaustive_and_disjoint() {
        let roster = vec![
            JudgeRow { id: 1, name: "a".into() },
            JudgeRow { id: 2, name: "b".into() },
            JudgeRow { id: 3, name: "c".into() },
        ];
        let votes = vec![vote(1, 2, 1)];
        let status = judge_status(&roster, &votes);
        assert_eq!(status.voted, vec!["b"]);
        assert_eq!(status.not_voted, vec!["a", "c"]);
        assert_eq!(status.voted.len() + status.not_voted.len(), roster.len());
    }
}
