use super::position::Range;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    ResourceNotProvided,
    SysResourceNotFound,
    AppResourceNotFound,
    InvalidResourceScope,
    InvalidResourceType,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::ResourceNotProvided => "RESOURCE_NOT_PROVIDED",
            DiagnosticCode::SysResourceNotFound => "SYS_RESOURCE_NOT_FOUND",
            DiagnosticCode::AppResourceNotFound => "APP_RESOURCE_NOT_FOUND",
            DiagnosticCode::InvalidResourceScope => "INVALID_RESOURCE_SCOPE",
            DiagnosticCode::InvalidResourceType => "INVALID_RESOURCE_TYPE",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResourceDiagnostic {
    pub range: Range,
    pub message: String,
    pub severity: Severity,
    pub code: DiagnosticCode,
}

impl ResourceDiagnostic {
    pub const SOURCE: &'static str = "arkres";
}
