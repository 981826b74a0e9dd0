//! Version 1 of the workspace document.

use std::sync::OnceLock;

use compact_str::CompactString;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::{DocumentError, ValidationIssue};

pub const VERSION: u32 = 1;

pub type DashboardId = CompactString;
pub type WidgetId = CompactString;

/// Widget placement in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetLayout {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl WidgetLayout {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<u32>,
}

impl AxisConstraint {
    pub fn fixed(size: u32) -> Self {
        Self {
            fixed: Some(size),
            ..Self::default()
        }
    }

    pub fn between(min: Option<u32>, max: Option<u32>) -> Self {
        Self {
            min,
            max,
            fixed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetLayoutConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<AxisConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<AxisConstraint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetRecord {
    pub id: WidgetId,
    #[serde(rename = "type")]
    pub kind: CompactString,
    pub layout: WidgetLayout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<WidgetLayoutConstraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookback: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardRecord {
    pub id: DashboardId,
    #[serde(default)]
    pub widgets: Vec<WidgetRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto: Option<DashboardRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teleop: Option<DashboardRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<Vec<DashboardRecord>>,
}

/// Root of the persisted workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDocument {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_id: Option<DashboardId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboards: Option<DashboardsRecord>,
}

impl Default for WorkspaceDocument {
    fn default() -> Self {
        Self {
            version: VERSION,
            dashboard_id: None,
            dashboards: None,
        }
    }
}

pub fn document_schema() -> Value {
    json!({
        "type": "object",
        "required": ["version"],
        "properties": {
            "version": { "const": VERSION },
            "dashboardId": { "type": "string", "minLength": 1 },
            "dashboards": {
                "type": "object",
                "properties": {
                    "auto": {
                        "$ref": "#/$defs/dashboard",
                        "properties": { "id": { "const": "auto" } }
                    },
                    "teleop": {
                        "$ref": "#/$defs/dashboard",
                        "properties": { "id": { "const": "teleop" } }
                    },
                    "custom": {
                        "type": "array",
                        "items": { "$ref": "#/$defs/dashboard" }
                    }
                }
            }
        },
        "$defs": {
            "size": { "type": "integer", "minimum": 1, "maximum": u32::MAX },
            "axis": {
                "type": "object",
                "properties": {
                    "min": { "$ref": "#/$defs/size" },
                    "max": { "$ref": "#/$defs/size" },
                    "fixed": { "$ref": "#/$defs/size" }
                }
            },
            "constraints": {
                "type": "object",
                "properties": {
                    "width": { "$ref": "#/$defs/axis" },
                    "height": { "$ref": "#/$defs/axis" }
                }
            },
            "layout": {
                "type": "object",
                "required": ["left", "top", "width", "height"],
                "properties": {
                    "left": { "type": "integer", "minimum": i32::MIN, "maximum": i32::MAX },
                    "top": { "type": "integer", "minimum": i32::MIN, "maximum": i32::MAX },
                    "width": { "$ref": "#/$defs/size" },
                    "height": { "$ref": "#/$defs/size" }
                }
            },
            "viewport": {
                "type": "object",
                "required": ["x", "y", "scale"],
                "properties": {
                    "x": { "type": "number" },
                    "y": { "type": "number" },
                    "scale": { "type": "number", "exclusiveMinimum": 0 }
                }
            },
            "widget": {
                "type": "object",
                "required": ["id", "type", "layout"],
                "properties": {
                    "id": { "type": "string", "minLength": 1 },
                    "type": { "type": "string", "minLength": 1 },
                    "layout": { "$ref": "#/$defs/layout" },
                    "constraints": { "$ref": "#/$defs/constraints" },
                    "slot": { "type": "string" },
                    "lookback": { "type": "number", "minimum": 0 },
                    "props": {}
                }
            },
            "dashboard": {
                "type": "object",
                "required": ["id"],
                "properties": {
                    "id": { "type": "string", "minLength": 1 },
                    "widgets": { "type": "array", "items": { "$ref": "#/$defs/widget" } },
                    "viewport": { "$ref": "#/$defs/viewport" }
                }
            }
        }
    })
}

fn validator() -> Result<&'static jsonschema::Validator, DocumentError> {
    static VALIDATOR: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();
    VALIDATOR
        .get_or_init(|| jsonschema::validator_for(&document_schema()).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| DocumentError::Schema(e.clone()))
}

pub(super) fn validate(candidate: &Value) -> Result<WorkspaceDocument, DocumentError> {
    let issues: Vec<ValidationIssue> = validator()?
        .iter_errors(candidate)
        .map(|e| ValidationIssue::new(e.instance_path.to_string(), e.to_string()))
        .collect();
    if !issues.is_empty() {
        return Err(DocumentError::Invalid { issues });
    }

    let document: WorkspaceDocument =
        serde_json::from_value(candidate.clone()).map_err(|e| DocumentError::Invalid {
            issues: vec![ValidationIssue::new("", e.to_string())],
        })?;

    let issues = identity_issues(&document);
    if issues.is_empty() {
        Ok(document)
    } else {
        Err(DocumentError::Invalid { issues })
    }
}

/// Widget ids must be unique per dashboard; custom dashboard ids must be unique and must
/// not shadow the fixed dashboards.
fn identity_issues(document: &WorkspaceDocument) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let Some(dashboards) = document.dashboards.as_ref() else {
        return issues;
    };

    if let Some(auto) = dashboards.auto.as_ref() {
        duplicate_widget_issues("/dashboards/auto", auto, &mut issues);
    }
    if let Some(teleop) = dashboards.teleop.as_ref() {
        duplicate_widget_issues("/dashboards/teleop", teleop, &mut issues);
    }

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for (index, dashboard) in dashboards.custom.iter().flatten().enumerate() {
        let base = format!("/dashboards/custom/{index}");
        let id = dashboard.id.as_str();
        if id == "auto" || id == "teleop" {
            issues.push(ValidationIssue::new(
                format!("{base}/id"),
                format!("custom dashboard id \"{id}\" is reserved"),
            ));
        } else if !seen.insert(id) {
            issues.push(ValidationIssue::new(
                format!("{base}/id"),
                format!("duplicate dashboard id \"{id}\""),
            ));
        }
        duplicate_widget_issues(&base, dashboard, &mut issues);
    }

    issues
}

fn duplicate_widget_issues(base: &str, dashboard: &DashboardRecord, issues: &mut Vec<ValidationIssue>) {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for (index, widget) in dashboard.widgets.iter().enumerate() {
        if !seen.insert(widget.id.as_str()) {
            issues.push(ValidationIssue::new(
                format!("{base}/widgets/{index}/id"),
                format!("duplicate widget id \"{}\"", widget.id),
            ));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/v1.rs"]
mod tests;
