use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// How demanding a course is for its students
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[cfg_attr(feature = "database", derive(sea_orm::DeriveActiveEnum))]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Complexity {
    #[cfg_attr(feature = "database", sea_orm(string_value = "easy"))]
    Easy,
    #[cfg_attr(feature = "database", sea_orm(string_value = "medium"))]
    Medium,
    #[cfg_attr(feature = "database", sea_orm(string_value = "hard"))]
    Hard,
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_complexity_from_str() {
        assert_eq!(Complexity::from_str("easy").unwrap(), Complexity::Easy);
        assert_eq!(Complexity::from_str("hard").unwrap(), Complexity::Hard);
        assert!(Complexity::from_str("extreme").is_err());
    }

    #[test]
    fn test_complexity_serde_matches_display() {
        for complexity in Complexity::iter() {
            let json = serde_json::to_string(&complexity).unwrap();
            assert_eq!(json, format!("\"{complexity}\""));
        }
    }
}
