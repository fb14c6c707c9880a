mod ballot;
mod category;
mod period;
mod ranking;
mod results;

pub use ballot::{build_order, ShuffleCache};
pub use category::Category;
pub use period::SubmissionWindow;
pub use ranking::{assign_ranks, RankedVote};
pub use results::{
    aggregate, judge_status, ArtworkRow, CategoryResults, JudgeRow, JudgeStatus, JudgeVoteDetail,
    LeaderboardRow, VoteRow,
};
