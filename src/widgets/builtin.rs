//! Built-in widget kinds.

use serde_json::{json, Value};

use super::{SlotSpec, WidgetDescriptor, WidgetKind};
use crate::channel::{match_time, ChannelRecord, ChannelValue};
use crate::schema::{AxisConstraint, WidgetLayoutConstraints};

pub const MATCH_TIME_CHANNEL: &str = "nt:/FMSInfo/MatchTime";

pub fn descriptors() -> Vec<WidgetDescriptor> {
    WidgetKind::ALL.into_iter().map(descriptor).collect()
}

pub fn descriptor(kind: WidgetKind) -> WidgetDescriptor {
    match kind {
        WidgetKind::Boolean => WidgetDescriptor::new(kind, "Boolean Box", 1, 1)
            .with_slot(SlotSpec::accepting(&["boolean"]).with_transform(passthrough))
            .with_props(
                json!({
                    "type": "object",
                    "required": ["trueColor", "falseColor"],
                    "properties": {
                        "trueColor": { "type": "string", "minLength": 1 },
                        "falseColor": { "type": "string", "minLength": 1 }
                    }
                }),
                json!({ "trueColor": "#22c55e", "falseColor": "#ef4444" }),
            ),
        WidgetKind::Number => WidgetDescriptor::new(kind, "Number", 2, 1)
            .with_slot(SlotSpec::accepting(&["int", "double"]).with_transform(number))
            .with_props(
                json!({
                    "type": "object",
                    "required": ["precision"],
                    "properties": {
                        "precision": { "type": "integer", "minimum": 0, "maximum": 10 },
                        "unit": { "type": "string" }
                    }
                }),
                json!({ "precision": 2 }),
            ),
        WidgetKind::Text => WidgetDescriptor::new(kind, "Text", 2, 1)
            .with_slot(SlotSpec::accepting(&["string"]).with_transform(passthrough)),
        WidgetKind::Gauge => WidgetDescriptor::new(kind, "Gauge", 2, 2)
            .with_constraints(WidgetLayoutConstraints {
                width: Some(AxisConstraint::between(Some(2), None)),
                height: Some(AxisConstraint::between(Some(2), None)),
            })
            .with_slot(
                SlotSpec::accepting(&["int", "double"])
                    .with_lookback(0.0)
                    .with_transform(number),
            )
            .with_props(
                json!({
                    "type": "object",
                    "required": ["min", "max", "precision"],
                    "properties": {
                        "min": { "type": "number" },
                        "max": { "type": "number" },
                        "precision": { "type": "integer", "minimum": 0, "maximum": 10 }
                    }
                }),
                json!({ "min": 0, "max": 100, "precision": 0 }),
            ),
        WidgetKind::Graph => WidgetDescriptor::new(kind, "Graph", 4, 2)
            .with_slot(
                SlotSpec::accepting(&["int", "double"])
                    .with_lookback(10.0)
                    .with_transform(number),
            )
            .with_props(
                json!({
                    "type": "object",
                    "properties": {
                        "yMin": { "type": "number" },
                        "yMax": { "type": "number" }
                    }
                }),
                json!({}),
            ),
        WidgetKind::Slider => WidgetDescriptor::new(kind, "Slider", 3, 1)
            .with_constraints(WidgetLayoutConstraints {
                width: Some(AxisConstraint::between(Some(2), None)),
                height: Some(AxisConstraint::fixed(1)),
            })
            .with_slot(SlotSpec::accepting(&["double"]).with_transform(number))
            .with_props(
                json!({
                    "type": "object",
                    "required": ["min", "max", "step"],
                    "properties": {
                        "min": { "type": "number" },
                        "max": { "type": "number" },
                        "step": { "type": "number", "exclusiveMinimum": 0 }
                    }
                }),
                json!({ "min": 0, "max": 1, "step": 0.1 }),
            ),
        WidgetKind::Chooser => WidgetDescriptor::new(kind, "Chooser", 2, 1)
            .with_slot(SlotSpec::accepting(&["String Chooser"])),
        WidgetKind::Field2d => WidgetDescriptor::new(kind, "Field", 4, 2)
            .with_constraints(WidgetLayoutConstraints {
                width: Some(AxisConstraint::between(Some(2), None)),
                height: None,
            })
            .with_slot(SlotSpec::accepting(&["struct:Pose2d", "double[]"]))
            .with_props(
                json!({
                    "type": "object",
                    "required": ["field"],
                    "properties": { "field": { "type": "string", "minLength": 1 } }
                }),
                json!({ "field": "2026" }),
            ),
        WidgetKind::MatchTime => WidgetDescriptor::new(kind, "Match Time", 2, 1)
            .with_slot(
                SlotSpec::accepting(&[match_time::STRUCT_TYPE, "double"])
                    .with_transform(match_time::transform)
                    .with_default_channel(MATCH_TIME_CHANNEL),
            )
            .with_props(
                json!({
                    "type": "object",
                    "required": ["warnAt"],
                    "properties": { "warnAt": { "type": "number", "minimum": 0 } }
                }),
                json!({ "warnAt": 20 }),
            ),
    }
}

fn passthrough(record: &ChannelRecord) -> Option<Value> {
    match &record.value {
        ChannelValue::Boolean(v) => Some(json!(v)),
        ChannelValue::String(v) => Some(json!(v)),
        _ => None,
    }
}

fn number(record: &ChannelRecord) -> Option<Value> {
    record.value.as_f64().map(|v| json!(v))
}
