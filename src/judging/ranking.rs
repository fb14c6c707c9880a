use std::collections::HashSet;

use crate::error::{validation, Error};

/// One row of a judge's submitted ballot: a submission id with its 1-based
/// rank. Lower rank is better.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RankedVote {
    pub submission_id: i32,
    pub rank: i32,
}

/// Turn a submitted total ordering into rank-labeled votes.
///
/// Ranks are dense, start at 1, and follow the input order exactly. A
/// duplicate id is rejected before anything touches the database.
pub fn assign_ranks(ordered_ids: &[i32]) -> Result<Vec<RankedVote>, Error> {
    if ordered_ids.is_empty() {
        return Err(validation("No rankings submitted."));
    }

    let mut seen = HashSet::with_capacity(ordered_ids.len());
    let mut votes = Vec::with_capacity(ordered_ids.len());
    for (index, &submission_id) in ordered_ids.iter().enumerate() {
        if !seen.insert(submission_id) {
            return Err(Error::InvalidCandidate(submission_id));
        }
        votes.push(RankedVote {
            submission_id,
            rank: index as i32 + 1,
        });
    }
    Ok(votes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_dense_from_one_in_input_order() {
        let votes = assign_ranks(&[30, 10, 20]).unwrap();
        assert_eq!(
            votes,
            vec![
                RankedVote { submission_id: 30, rank: 1 },
                RankedVote { submission_id: 10, rank: 2 },
                RankedVote { submission_id: 20, rank: 3 },
            ]
        );
    }

    #[test]
    fn same_input_twice_yields_same_votes() {
        let first = assign_ranks(&[5, 6, 7]).unwrap();
        let second = assign_ranks(&[5, 6, 7]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_id_is_rejected_and_named() {
        let err = assign_ranks(&[1, 2, 1]).unwrap_err();
        match err {
            Error::InvalidCandidate(id) => assert_eq!(id, 1),
            other => panic!("expected InvalidCandidate, got {other:?}"),
        }
    }

    #[test]
    fn empty_ballot_is_rejected() {
        assert!(assign_ranks(&[]).is_err());
    }

    mod replace_scope {
        use super::*;
        use crate::judging::Category;

        /// A persisted vote's linkage columns, as the store holds them.
        #[derive(Clone, Debug, Eq, PartialEq)]
        struct StoredVote {
            judge_id: i32,
            submission_id: Option<i32>,
            youth_submission_id: Option<i32>,
            rank: i32,
        }

        fn stored(judge_id: i32, category: Category, submission_id: i32, rank: i32) -> StoredVote {
            let (submission_id, youth_submission_id) = category.submission_columns(submission_id);
            StoredVote {
                judge_id,
                submission_id,
                youth_submission_id,
                rank,
            }
        }

        /// Mirror of the resubmission transaction: drop the judge's rows in
        /// the submitted category only, then append the new ranking.
        fn replace(
            rows: &[StoredVote],
            judge_id: i32,
            category: Category,
            ordered_ids: &[i32],
        ) -> Vec<StoredVote> {
            let mut kept: Vec<StoredVote> = rows
                .iter()
                .filter(|row| {
                    row.judge_id != judge_id
                        || category
                            .submission_ref(row.submission_id, row.youth_submission_id)
                            .is_none()
                })
                .cloned()
                .collect();
            for vote in assign_ranks(ordered_ids).unwrap() {
                kept.push(stored(judge_id, category, vote.submission_id, vote.rank));
            }
            kept
        }

        #[test]
        fn adult_resubmission_leaves_youth_votes_untouched() {
            let rows = vec![
                stored(1, Category::Adult, 10, 1),
                stored(1, Category::Adult, 11, 2),
                stored(1, Category::Youth, 20, 1),
            ];
            let after = replace(&rows, 1, Category::Adult, &[11, 10]);
            assert!(after.contains(&stored(1, Category::Youth, 20, 1)));
            assert_eq!(after.len(), 3);
            assert!(after.contains(&stored(1, Category::Adult, 11, 1)));
            assert!(after.contains(&stored(1, Category::Adult, 10, 2)));
        }

        #[test]
        fn youth_resubmission_leaves_adult_votes_untouched() {
            let rows = vec![
                stored(1, Category::Adult, 10, 1),
                stored(1, Category::Youth, 20, 1),
                stored(1, Category::Youth, 21, 2),
            ];
            let after = replace(&rows, 1, Category::Youth, &[21]);
            assert!(after.contains(&stored(1, Category::Adult, 10, 1)));
            assert_eq!(after.len(), 2);
            assert!(after.contains(&stored(1, Category::Youth, 21, 1)));
        }

        #[test]
        fn resubmission_replaces_never_appends() {
            let rows = vec![
                stored(1, Category::Adult, 10, 1),
                stored(1, Category::Adult, 11, 2),
            ];
            let after = replace(&rows, 1, Category::Adult, &[11, 10]);
            let again = replace(&after, 1, Category::Adult, &[11, 10]);
            assert_eq!(after.len(), 2);
            assert_eq!(after, again);
        }

        #[test]
        fn other_judges_votes_survive_a_replace() {
            let rows = vec![
                stored(1, Category::Adult, 10, 1),
                stored(2, Category::Adult, 10, 1),
            ];
            let after = replace(&rows, 1, Category::Adult, &[10]);
            assert!(after.contains(&stored(2, Category::Adult, 10, 1)));
        }

        #[test]
        fn cascade_selection_matches_only_the_submission_in_its_category() {
            // deleting adult submission 10 must take vote rows referencing
            // it, and only those
            let rows = vec![
                stored(1, Category::Adult, 10, 1),
                stored(2, Category::Adult, 10, 2),
                stored(1, Category::Adult, 11, 2),
                stored(1, Category::Youth, 10, 1),
            ];
            let survivors: Vec<StoredVote> = rows
                .into_iter()
                .filter(|row| {
                    Category::Adult.submission_ref(row.submission_id, row.youth_submission_id)
                        != Some(10)
                })
                .collect();
            assert_eq!(
                survivors,
                vec![
                    stored(1, Category::Adult, 11, 2),
                    stored(1, Category::Youth, 10, 1),
                ]
            );
        }
    }
}
