//! Entity records handled by the table engine.
//!
//! Every dashboard module lists rows of one entity: a unique string id plus a
//! fixed set of text columns. The [`Record`] trait exposes that shape so the
//! filter, sort, and paging stages stay entity-agnostic; the concrete structs
//! mirror the backend tables field for field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column-addressable view over one entity type.
///
/// Implementations are plain data structs. `Field` is the per-entity column
/// enum; a column whose value is absent reads as `None` and sorts as the
/// empty string.
pub trait Record: Clone + Send + Sync + 'static {
    /// Column identifier for this entity.
    type Field: Copy
        + Eq
        + Ord
        + std::hash::Hash
        + std::fmt::Debug
        + Default
        + Send
        + Sync
        + 'static;

    /// Backend table this entity is stored in.
    const TABLE: &'static str;
    /// Columns shown for this entity, in display order.
    const COLUMNS: &'static [Self::Field];
    /// Columns the free-text search matches against.
    const SEARCH_FIELDS: &'static [Self::Field];
    /// Categorical columns that can carry an exact-match facet constraint.
    const FACET_FIELDS: &'static [Self::Field];

    /// Unique identifier of this record.
    fn id(&self) -> &str;
    /// Text value of `field`, or `None` when the record does not carry one.
    fn field_text(&self, field: Self::Field) -> Option<&str>;
    /// Creation timestamp, when the backend reported one.
    fn created_at(&self) -> Option<DateTime<Utc>>;
    /// Stable key naming `field` in config files and on the command line.
    fn field_key(field: Self::Field) -> &'static str;
    /// Parse a column from its key; `None` for unknown keys.
    fn field_from_key(key: &str) -> Option<Self::Field>;
}

/// Columns of the team member roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TeamField {
    /// Short unique member id.
    #[default]
    Id,
    /// Contact email address.
    Email,
    /// Display name.
    Name,
    /// Role label, also the roster's facet column.
    Role,
    /// Phone number.
    Phone,
}

/// One row of the `team_members` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Short unique member id (e.g. `BBU592`).
    pub id: String,
    /// Contact email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role label (e.g. `Super Admin`, `Sales Agent`).
    pub role: String,
    /// Phone number in international notation.
    pub phone: String,
    /// Set by the backend on insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Set by the backend on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TeamMember {
    /// Placeholder roster served when no backend is configured.
    ///
    /// Keeps the engine browsable offline; ids follow the same short shape
    /// the live table uses.
    #[must_use]
    pub fn sample_roster() -> Vec<Self> {
        vec![
            TeamMember {
                id: "BBU592".into(),
                email: "lena.fischer@example.com".into(),
                name: "Lena Fischer".into(),
                role: "Super Admin".into(),
                phone: "+4915200000001".into(),
                created_at: None,
                updated_at: None,
            },
            TeamMember {
                id: "KA1821".into(),
                email: "jonas.weber@example.com".into(),
                name: "Jonas Weber".into(),
                role: "Sales Agent".into(),
                phone: "+4915200000002".into(),
                created_at: None,
                updated_at: None,
            },
        ]
    }
}

impl Record for TeamMember {
    type Field = TeamField;

    const TABLE: &'static str = "team_members";
    const COLUMNS: &'static [TeamField] = &[
        TeamField::Id,
        TeamField::Email,
        TeamField::Name,
        TeamField::Role,
        TeamField::Phone,
    ];
    const SEARCH_FIELDS: &'static [TeamField] = &[
        TeamField::Name,
        TeamField::Email,
        TeamField::Phone,
        TeamField::Id,
    ];
    const FACET_FIELDS: &'static [TeamField] = &[TeamField::Role];

    fn id(&self) -> &str {
        &self.id
    }

    fn field_text(&self, field: TeamField) -> Option<&str> {
        let text = match field {
            TeamField::Id => &self.id,
            TeamField::Email => &self.email,
            TeamField::Name => &self.name,
            TeamField::Role => &self.role,
            TeamField::Phone => &self.phone,
        };
        Some(text.as_str())
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn field_key(field: TeamField) -> &'static str {
        match field {
            TeamField::Id => "id",
            TeamField::Email => "email",
            TeamField::Name => "name",
            TeamField::Role => "role",
            TeamField::Phone => "phone",
        }
    }

    fn field_from_key(key: &str) -> Option<TeamField> {
        match key.trim().to_lowercase().as_str() {
            "id" => Some(TeamField::Id),
            "email" => Some(TeamField::Email),
            "name" => Some(TeamField::Name),
            "role" => Some(TeamField::Role),
            "phone" => Some(TeamField::Phone),
            _ => None,
        }
    }
}

/// Columns of the task board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TaskField {
    /// Unique task id.
    #[default]
    Id,
    /// Short task title.
    Name,
    /// Longer free-form description.
    Description,
    /// Member the task is assigned to.
    Assignee,
    /// Workflow status, a facet column.
    Status,
    /// Urgency label, a facet column.
    Urgency,
}

/// One row of the `tasks` table.
///
/// Field names follow the backend columns so the rows deserialize without a
/// rename map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task id.
    pub id: String,
    /// Short task title.
    pub task_name: String,
    /// Longer free-form description; may be empty.
    #[serde(default)]
    pub description: Option<String>,
    /// Member the task is assigned to.
    #[serde(default)]
    pub assigned_to: Option<String>,
    /// Workflow status (e.g. `Open`, `In Progress`, `Done`).
    pub status: String,
    /// Urgency label (e.g. `Low`, `Medium`, `High`).
    pub urgency: String,
    /// Set by the backend on insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Set by the backend on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Task {
    type Field = TaskField;

    const TABLE: &'static str = "tasks";
    const COLUMNS: &'static [TaskField] = &[
        TaskField::Id,
        TaskField::Name,
        TaskField::Description,
        TaskField::Assignee,
        TaskField::Status,
        TaskField::Urgency,
    ];
    const SEARCH_FIELDS: &'static [TaskField] = &[TaskField::Name, TaskField::Description];
    const FACET_FIELDS: &'static [TaskField] = &[
        TaskField::Status,
        TaskField::Assignee,
        TaskField::Urgency,
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn field_text(&self, field: TaskField) -> Option<&str> {
        match field {
            TaskField::Id => Some(self.id.as_str()),
            TaskField::Name => Some(self.task_name.as_str()),
            TaskField::Description => self.description.as_deref(),
            TaskField::Assignee => self.assigned_to.as_deref(),
            TaskField::Status => Some(self.status.as_str()),
            TaskField::Urgency => Some(self.urgency.as_str()),
        }
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn field_key(field: TaskField) -> &'static str {
        match field {
            TaskField::Id => "id",
            TaskField::Name => "task_name",
            TaskField::Description => "description",
            TaskField::Assignee => "assigned_to",
            TaskField::Status => "status",
            TaskField::Urgency => "urgency",
        }
    }

    fn field_from_key(key: &str) -> Option<TaskField> {
        match key.trim().to_lowercase().as_str() {
            "id" => Some(TaskField::Id),
            "task_name" | "name" | "task" => Some(TaskField::Name),
            "description" => Some(TaskField::Description),
            "assigned_to" | "assignee" => Some(TaskField::Assignee),
            "status" => Some(TaskField::Status),
            "urgency" => Some(TaskField::Urgency),
            _ => None,
        }
    }
}
