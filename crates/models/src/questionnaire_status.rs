use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Review state of a teacher questionnaire
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
pub enum QuestionnaireStatus {
    #[default]
    #[cfg_attr(feature = "database", sea_orm(string_value = "pending"))]
    Pending,
    #[cfg_attr(feature = "database", sea_orm(string_value = "accepted"))]
    Accepted,
    #[cfg_attr(feature = "database", sea_orm(string_value = "rejected"))]
    Rejected,
}
