use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{validation, Error};

/// The two judging pools. Adult submissions and youth submissions are ranked
/// on separate ballots and tallied into separate leaderboards.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Adult,
    Youth,
}

impl Category {
    /// Which submission column a vote or artwork row carries for this
    /// category: `(submission_id, youth_submission_id)`, exactly one set.
    pub fn submission_columns(&self, id: i32) -> (Option<i32>, Option<i32>) {
        match self {
            Category::Adult => (Some(id), None),
            Category::Youth => (None, Some(id)),
        }
    }

    /// The submission id a row references in this category, if any. Rows
    /// belonging to the other category yield `None`.
    pub fn submission_ref(
        &self,
        submission_id: Option<i32>,
        youth_submission_id: Option<i32>,
    ) -> Option<i32> {
        match self {
            Category::Adult => submission_id,
            Category::Youth => youth_submission_id,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Category::Adult => write!(f, "adult"),
            Category::Youth => write!(f, "youth"),
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Category, Error> {
        match s {
            "adult" => Ok(Category::Adult),
            "youth" => Ok(Category::Youth),
            other => Err(validation(format!("unknown category '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_categories() {
        assert_eq!("adult".parse::<Category>().unwrap(), Category::Adult);
        assert_eq!("youth".parse::<Category>().unwrap(), Category::Youth);
        assert!("senior".parse::<Category>().is_err());
    }

    #[test]
    fn submission_columns_set_exactly_one_side() {
        assert_eq!(Category::Adult.submission_columns(7), (Some(7), None));
        assert_eq!(Category::Youth.submission_columns(7), (None, Some(7)));
    }

    #[test]
    fn submission_ref_ignores_the_other_category() {
        assert_eq!(Category::Adult.submission_ref(Some(3), None), Some(3));
        assert_eq!(Category::Adult.submission_ref(None, Some(3)), None);
        assert_eq!(Category::Youth.submission_ref(None, Some(3)), Some(3));
        assert_eq!(Category::Youth.submission_ref(Some(3), None), None);
    }
}
