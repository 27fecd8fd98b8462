//! # Session Data Transfer Objects
//!
//! Inputs and views for classes, events and notices.

use chrono::{DateTime, NaiveTime, Utc};
use entity::{classes, events, notices, sea_orm_active_enums::Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::console::ConsoleView;

/// Fields of a class, used for create and update
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct ClassInput {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title:       String,
    pub day:         Weekday,
    pub start_time:  NaiveTime,
    pub end_time:    NaiveTime,
    #[validate(length(max = 200, message = "Location must not exceed 200 characters"))]
    pub location:    Option<String>,
    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,
}

/// Fields of an event, used for create and update
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct EventInput {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title:       String,
    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,
    pub start:       DateTime<Utc>,
    pub end:         DateTime<Utc>,
}

/// Fields of a notice, used for create and update
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct NoticeInput {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title:       String,
    #[validate(length(min = 1, message = "Notice text is required"))]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassView {
    pub id:          Uuid,
    pub team_id:     Uuid,
    pub title:       String,
    pub day:         Weekday,
    pub start_time:  NaiveTime,
    pub end_time:    NaiveTime,
    pub location:    Option<String>,
    pub description: Option<String>,
}

impl From<classes::Model> for ClassView {
    fn from(class: classes::Model) -> Self {
        Self {
            id:          class.id,
            team_id:     class.team_id,
            title:       class.title,
            day:         class.day,
            start_time:  class.start_time,
            end_time:    class.end_time,
            location:    class.location,
            description: class.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventView {
    pub id:          Uuid,
    pub team_id:     Uuid,
    pub title:       String,
    pub description: Option<String>,
    pub start:       DateTime<Utc>,
    pub end:         DateTime<Utc>,
}

impl From<events::Model> for EventView {
    fn from(event: events::Model) -> Self {
        Self {
            id:          event.id,
            team_id:     event.team_id,
            title:       event.title,
            description: event.description,
            start:       event.start,
            end:         event.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeView {
    pub id:          Uuid,
    pub team_id:     Uuid,
    /// Member who last wrote the notice
    pub author_id:   Uuid,
    pub title:       String,
    pub description: String,
    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
}

impl From<notices::Model> for NoticeView {
    fn from(notice: notices::Model) -> Self {
        Self {
            id:          notice.id,
            team_id:     notice.team_id,
            author_id:   notice.user_id,
            title:       notice.title,
            description: notice.description,
            created_at:  notice.created_at,
            updated_at:  notice.updated_at,
        }
    }
}

/// Weekly timetable, ordered by day then start time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetableView {
    pub console: ConsoleView,
    /// Every weekday, Monday first, for column headers
    pub days:    Vec<Weekday>,
    pub classes: Vec<ClassView>,
}

/// Calendar, ordered by start
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarView {
    pub console: ConsoleView,
    pub events:  Vec<EventView>,
}

/// Notice board, newest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeBoardView {
    pub console: ConsoleView,
    pub notices: Vec<NoticeView>,
}

/// Single resource page with the team console
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView<T> {
    pub console: ConsoleView,
    pub item:    T,
}
