use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lifecycle of a course ticket
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[cfg_attr(feature = "database", derive(sea_orm::DeriveActiveEnum))]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TicketStatus {
    /// Reserved but not paid yet
    #[default]
    #[cfg_attr(feature = "database", sea_orm(string_value = "pending"))]
    Pending,
    #[cfg_attr(feature = "database", sea_orm(string_value = "paid"))]
    Paid,
    #[cfg_attr(feature = "database", sea_orm(string_value = "cancelled"))]
    Cancelled,
}

impl TicketStatus {
    /// Whether the ticket grants access to the course
    pub fn is_active(self) -> bool {
        self == Self::Paid
    }
}
