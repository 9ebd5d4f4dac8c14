//! Closed vocabularies for digital resources.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use libhub_core::AppError;

/// Kind of material a resource holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_category")]
pub enum ResourceCategory {
    #[serde(rename = "Notes")]
    #[sqlx(rename = "Notes")]
    Notes,
    #[serde(rename = "Previous Papers")]
    #[sqlx(rename = "Previous Papers")]
    PreviousPapers,
    #[serde(rename = "Tools")]
    #[sqlx(rename = "Tools")]
    Tools,
    #[serde(rename = "Resources")]
    #[sqlx(rename = "Resources")]
    Resources,
    #[serde(rename = "Prep Materials")]
    #[sqlx(rename = "Prep Materials")]
    PrepMaterials,
    #[serde(rename = "Model Papers")]
    #[sqlx(rename = "Model Papers")]
    ModelPapers,
    #[serde(rename = "Assignments")]
    #[sqlx(rename = "Assignments")]
    Assignments,
    #[serde(rename = "E-books")]
    #[sqlx(rename = "E-books")]
    EBooks,
    #[serde(rename = "Video Lectures")]
    #[sqlx(rename = "Video Lectures")]
    VideoLectures,
    #[serde(rename = "Research Papers")]
    #[sqlx(rename = "Research Papers")]
    ResearchPapers,
    #[serde(rename = "Competitive")]
    #[sqlx(rename = "Competitive")]
    Competitive,
    #[serde(rename = "Others")]
    #[sqlx(rename = "Others")]
    Others,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 12] = [
        Self::Notes,
        Self::PreviousPapers,
        Self::Tools,
        Self::Resources,
        Self::PrepMaterials,
        Self::ModelPapers,
        Self::Assignments,
        Self::EBooks,
        Self::VideoLectures,
        Self::ResearchPapers,
        Self::Competitive,
        Self::Others,
    ];

    /// Return the display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notes => "Notes",
            Self::PreviousPapers => "Previous Papers",
            Self::Tools => "Tools",
            Self::Resources => "Resources",
            Self::PrepMaterials => "Prep Materials",
            Self::ModelPapers => "Model Papers",
            Self::Assignments => "Assignments",
            Self::EBooks => "E-books",
            Self::VideoLectures => "Video Lectures",
            Self::ResearchPapers => "Research Papers",
            Self::Competitive => "Competitive",
            Self::Others => "Others",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::validation(format!("Invalid resource category: '{s}'")))
    }
}

/// Academic department a resource is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_department", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceDepartment {
    Cse,
    Ece,
    Mech,
    Civil,
    Mca,
    #[serde(rename = "AI/ML")]
    #[sqlx(rename = "AI/ML")]
    AiMl,
    It,
    Eee,
    Bca,
    Bba,
    Bcom,
    Mba,
    Biotech,
    Chem,
    Competitive,
    General,
}

impl ResourceDepartment {
    pub const ALL: [ResourceDepartment; 16] = [
        Self::Cse,
        Self::Ece,
        Self::Mech,
        Self::Civil,
        Self::Mca,
        Self::AiMl,
        Self::It,
        Self::Eee,
        Self::Bca,
        Self::Bba,
        Self::Bcom,
        Self::Mba,
        Self::Biotech,
        Self::Chem,
        Self::Competitive,
        Self::General,
    ];

    /// Return the department code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cse => "CSE",
            Self::Ece => "ECE",
            Self::Mech => "MECH",
            Self::Civil => "CIVIL",
            Self::Mca => "MCA",
            Self::AiMl => "AI/ML",
            Self::It => "IT",
            Self::Eee => "EEE",
            Self::Bca => "BCA",
            Self::Bba => "BBA",
            Self::Bcom => "BCOM",
            Self::Mba => "MBA",
            Self::Biotech => "BIOTECH",
            Self::Chem => "CHEM",
            Self::Competitive => "COMPETITIVE",
            Self::General => "GENERAL",
        }
    }
}

impl fmt::Display for ResourceDepartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceDepartment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::validation(format!("Invalid department: '{s}'")))
    }
}

/// Whether a resource is visible in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_status", rename_all = "PascalCase")]
pub enum ResourceStatus {
    Active,
    Inactive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_matches_labels() {
        assert_eq!(
            "previous papers".parse::<ResourceCategory>().unwrap(),
            ResourceCategory::PreviousPapers
        );
        assert_eq!("E-Books".parse::<ResourceCategory>().unwrap(), ResourceCategory::EBooks);
        assert!("Posters".parse::<ResourceCategory>().is_err());
    }

    #[test]
    fn test_department_wire_format() {
        assert_eq!(serde_json::to_string(&ResourceDepartment::AiMl).unwrap(), "\"AI/ML\"");
        assert_eq!(serde_json::to_string(&ResourceDepartment::Cse).unwrap(), "\"CSE\"");
        assert_eq!("ai/ml".parse::<ResourceDepartment>().unwrap(), ResourceDepartment::AiMl);
    }
}
