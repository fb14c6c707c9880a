use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::judging::SubmissionWindow;
use super::schema;

#[derive(Identifiable, Queryable, Selectable, Serialize)]
#[diesel(table_name = schema::badges)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Badge {
    pub id: i32,
    pub name: String,
    pub description: String,
}

#[derive(Insertable)]
#[diesel(table_name = schema::badges)]
pub struct NewBadge {
    pub name: String,
    pub description: String,
}

#[derive(Identifiable, Queryable, Selectable, Serialize)]
#[diesel(table_name = schema::artist_submissions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ArtistSubmission {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub artist_bio: String,
    pub portfolio_link: Option<String>,
    pub statement: String,
    pub demographic_identity: Option<String>,
    pub lane_county_connection: Option<String>,
    pub accessibility_needs: Option<String>,
    pub future_engagement: Option<String>,
    pub consent_to_data: bool,
    pub opt_in_featured_artwork: bool,
}

#[derive(Insertable)]
#[diesel(table_name = schema::artist_submissions)]
pub struct NewArtistSubmission {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub artist_bio: String,
    pub portfolio_link: Option<String>,
    pub statement: String,
    pub demographic_identity: Option<String>,
    pub lane_county_connection: Option<String>,
    pub accessibility_needs: Option<String>,
    pub future_engagement: Option<String>,
    pub consent_to_data: bool,
    pub opt_in_featured_artwork: bool,
}

#[derive(Identifiable, Queryable, Selectable, Serialize)]
#[diesel(table_name = schema::youth_artist_submissions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct YouthArtistSubmission {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub parent_contact_info: String,
    pub email: String,
    pub about_why_design: String,
    pub about_yourself: String,
}

#[derive(Insertable)]
#[diesel(table_name = schema::youth_artist_submissions)]
pub struct NewYouthArtistSubmission {
    pub name: String,
    pub age: i32,
    pub parent_contact_info: String,
    pub email: String,
    pub about_why_design: String,
    pub about_yourself: String,
}

#[derive(Associations, Identifiable, Queryable, Selectable, Serialize)]
#[diesel(table_name = schema::badge_artworks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(belongs_to(Badge))]
pub struct BadgeArtwork {
    pub id: i32,
    pub submission_id: Option<i32>,
    pub youth_submission_id: Option<i32>,
    pub badge_id: i32,
    pub artwork_file: String,
    pub instance: i32,
}

#[derive(Insertable)]
#[diesel(table_name = schema::badge_artworks)]
pub struct NewBadgeArtwork {
    pub submission_id: Option<i32>,
    pub youth_submission_id: Option<i32>,
    pub badge_id: i32,
    pub artwork_file: String,
    pub instance: i32,
}

#[derive(Identifiable, Queryable, Selectable)]
#[diesel(table_name = schema::judges)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Judge {
    pub id: i32,
    pub name: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Insertable)]
#[diesel(table_name = schema::judges)]
pub struct NewJudge {
    pub name: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Associations, Identifiable, Queryable, Selectable, Serialize)]
#[diesel(table_name = schema::judge_votes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(belongs_to(Judge))]
#[diesel(belongs_to(BadgeArtwork))]
pub struct JudgeVote {
    pub id: i32,
    pub judge_id: i32,
    pub submission_id: Option<i32>,
    pub youth_submission_id: Option<i32>,
    pub badge_artwork_id: i32,
    pub rank: i32,
}

#[derive(Insertable)]
#[diesel(table_name = schema::judge_votes)]
pub struct NewJudgeVote {
    pub judge_id: i32,
    pub submission_id: Option<i32>,
    pub youth_submission_id: Option<i32>,
    pub badge_artwork_id: i32,
    pub rank: i32,
}

#[derive(Identifiable, Queryable, Selectable, Serialize)]
#[diesel(table_name = schema::submission_periods)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SubmissionPeriod {
    pub id: i32,
    pub submission_start: NaiveDateTime,
    pub submission_end: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = schema::submission_periods)]
pub struct NewSubmissionPeriod {
    pub submission_start: NaiveDateTime,
    pub submission_end: NaiveDateTime,
}

impl From<SubmissionPeriod> for SubmissionWindow {
    fn from(period: SubmissionPeriod) -> SubmissionWindow {
        SubmissionWindow {
            start: period.submission_start.and_utc(),
            end: period.submission_end.and_utc(),
        }
    }
}
