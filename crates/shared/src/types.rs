//! Common types used across FleetDesk

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// ID Wrappers
// =============================================================================

/// Tenant ID wrapper
///
/// Every tenant-scoped query takes one of these as a mandatory filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct TenantId(pub Uuid);

impl TenantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TenantId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Record ID wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for RecordId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

// =============================================================================
// Enums
// =============================================================================

/// Kind of tenant-scoped business record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Driver,
    Vehicle,
    Order,
    Invoice,
    Contract,
    TimeEntry,
    Payout,
}

impl RecordKind {
    pub const ALL: [RecordKind; 7] = [
        Self::Driver,
        Self::Vehicle,
        Self::Order,
        Self::Invoice,
        Self::Contract,
        Self::TimeEntry,
        Self::Payout,
    ];

    /// Plural URL segment used by the record routes (e.g. `time-entries`)
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Driver => "drivers",
            Self::Vehicle => "vehicles",
            Self::Order => "orders",
            Self::Invoice => "invoices",
            Self::Contract => "contracts",
            Self::TimeEntry => "time-entries",
            Self::Payout => "payouts",
        }
    }

    /// Parse the plural URL segment form
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.path_segment() == segment)
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Driver => write!(f, "driver"),
            Self::Vehicle => write!(f, "vehicle"),
            Self::Order => write!(f, "order"),
            Self::Invoice => write!(f, "invoice"),
            Self::Contract => write!(f, "contract"),
            Self::TimeEntry => write!(f, "time_entry"),
            Self::Payout => write!(f, "payout"),
        }
    }
}

impl std::str::FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "driver" => Ok(Self::Driver),
            "vehicle" => Ok(Self::Vehicle),
            "order" => Ok(Self::Order),
            "invoice" => Ok(Self::Invoice),
            "contract" => Ok(Self::Contract),
            "time_entry" => Ok(Self::TimeEntry),
            "payout" => Ok(Self::Payout),
            _ => Err(format!("Invalid record kind: {}", s)),
        }
    }
}

// =============================================================================
// Database Models
// =============================================================================

/// Tenant model
///
/// `subdomain` is unique and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: TenantId,
    pub subdomain: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Tenant-scoped business record (driver, vehicle, order, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub tenant_id: TenantId,
    pub kind: RecordKind,
    pub data: serde_json::Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
