//! Rocket configuration

use crate::{FeasibilityError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RocketCategory {
    Model,
    Industrial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Hobby,
    Solo,
    Team,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SafetyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// What is being launched. Only model rockets carry a sub-type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum RocketConfiguration {
    Model {
        #[serde(rename = "projectType", default, skip_serializing_if = "Option::is_none")]
        project_type: Option<ProjectType>,
        #[serde(rename = "safetyLevel", default, skip_serializing_if = "Option::is_none")]
        safety_level: Option<SafetyLevel>,
    },
    Industrial,
}

impl RocketConfiguration {
    /// Build from loose parts, rejecting sub-types on industrial configurations
    pub fn from_parts(
        category: RocketCategory,
        project_type: Option<ProjectType>,
        safety_level: Option<SafetyLevel>,
    ) -> Result<Self> {
        match category {
            RocketCategory::Model => Ok(Self::Model {
                project_type,
                safety_level,
            }),
            RocketCategory::Industrial if project_type.is_some() || safety_level.is_some() => {
                Err(FeasibilityError::InvalidConfiguration(
                    "industrial configurations carry no project type or safety level".into(),
                ))
            }
            RocketCategory::Industrial => Ok(Self::Industrial),
        }
    }

    pub fn category(&self) -> RocketCategory {
        match self {
            Self::Model { .. } => RocketCategory::Model,
            Self::Industrial => RocketCategory::Industrial,
        }
    }

    pub fn is_model(&self) -> bool {
        matches!(self, Self::Model { .. })
    }

    pub fn safety_level(&self) -> Option<SafetyLevel> {
        match self {
            Self::Model { safety_level, .. } => *safety_level,
            Self::Industrial => None,
        }
    }

    pub fn project_type(&self) -> Option<ProjectType> {
        match self {
            Self::Model { project_type, .. } => *project_type,
            Self::Industrial => None,
        }
    }
}

impl fmt::Display for RocketConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model { project_type, .. } => {
                let kind = match project_type {
                    Some(ProjectType::Hobby) => "hobby ",
                    Some(ProjectType::Solo) => "solo ",
                    Some(ProjectType::Team) => "team ",
                    None => "",
                };
                write!(f, "{}model rocket", kind)
            }
            Self::Industrial => write!(f, "industrial rocket"),
        }
    }
}
