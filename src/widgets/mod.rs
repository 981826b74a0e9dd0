//! Widget kinds and their descriptors.
//!
//! A descriptor is the immutable behavior bundle of one widget kind. The registry maps a
//! persisted type tag to its descriptor; runtime widgets hold a shared reference to the
//! descriptor they were resolved against.

pub mod builtin;
pub mod props;

use std::sync::Arc;

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::channel::ChannelRecord;
use crate::schema::{WidgetLayout, WidgetLayoutConstraints};

pub use props::{PropsSchema, PropsSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidgetKind {
    Boolean,
    Number,
    Text,
    Gauge,
    Graph,
    Slider,
    Chooser,
    Field2d,
    MatchTime,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 9] = [
        WidgetKind::Boolean,
        WidgetKind::Number,
        WidgetKind::Text,
        WidgetKind::Gauge,
        WidgetKind::Graph,
        WidgetKind::Slider,
        WidgetKind::Chooser,
        WidgetKind::Field2d,
        WidgetKind::MatchTime,
    ];

    /// Tag stored in the `type` field of persisted widgets.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Text => "text",
            Self::Gauge => "gauge",
            Self::Graph => "graph",
            Self::Slider => "slider",
            Self::Chooser => "chooser",
            Self::Field2d => "field2d",
            Self::MatchTime => "match-time",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// Converts a channel record into the value a widget renders.
pub type Transform = fn(&ChannelRecord) -> Option<Value>;

#[derive(Debug, Clone, Default)]
pub struct SlotSpec {
    /// Seconds of history new widgets of this kind retain.
    pub lookback: Option<f64>,
    pub transform: Option<Transform>,
    /// Channel type names the kind can be bound to.
    pub accepts: Vec<CompactString>,
    pub default_channel: Option<String>,
}

impl SlotSpec {
    pub fn accepting(types: &[&str]) -> Self {
        Self {
            accepts: types.iter().map(|t| CompactString::from(*t)).collect(),
            ..Self::default()
        }
    }

    pub fn with_lookback(mut self, seconds: f64) -> Self {
        self.lookback = Some(seconds);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_default_channel(mut self, path: impl Into<String>) -> Self {
        self.default_channel = Some(path.into());
        self
    }

    pub fn accepts_type(&self, type_name: &str) -> bool {
        self.accepts.iter().any(|t| t == type_name)
    }
}

#[derive(Debug)]
pub struct WidgetDescriptor {
    pub kind: WidgetKind,
    pub display_name: &'static str,
    /// Default size in grid units.
    pub width: u32,
    pub height: u32,
    pub constraints: Option<WidgetLayoutConstraints>,
    pub slot: Option<SlotSpec>,
    pub props: Option<PropsSpec>,
}

impl WidgetDescriptor {
    pub fn new(kind: WidgetKind, display_name: &'static str, width: u32, height: u32) -> Self {
        Self {
            kind,
            display_name,
            width,
            height,
            constraints: None,
            slot: None,
            props: None,
        }
    }

    pub fn with_constraints(mut self, constraints: WidgetLayoutConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn with_slot(mut self, slot: SlotSpec) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn with_props(mut self, schema: Value, default_value: Value) -> Self {
        self.props = Some(PropsSpec::new(schema, default_value));
        self
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    /// Layout at the given position using the kind's default size.
    pub fn default_layout(&self, left: i32, top: i32) -> WidgetLayout {
        WidgetLayout::new(left, top, self.width, self.height)
    }

    pub fn default_lookback(&self) -> Option<f64> {
        self.slot.as_ref().and_then(|slot| slot.lookback)
    }

    pub fn default_channel(&self) -> Option<&str> {
        self.slot.as_ref().and_then(|slot| slot.default_channel.as_deref())
    }

    pub fn default_props(&self) -> Option<Value> {
        self.props.as_ref().map(|props| props.default_value.clone())
    }

    /// Properties for a widget of this kind loaded from storage: the stored value when it
    /// satisfies the schema, the default otherwise. Kinds without a schema keep whatever
    /// was stored.
    pub fn resolve_props(&self, stored: Option<&Value>) -> Option<Value> {
        let Some(spec) = self.props.as_ref() else {
            return stored.cloned();
        };
        match spec.schema.parse(stored) {
            Ok(value) => Some(value),
            Err(issues) => {
                tracing::warn!(
                    kind = self.tag(),
                    issues = issues.len(),
                    first = ?issues.first().map(ToString::to_string),
                    "widget props failed validation, using defaults"
                );
                Some(spec.default_value.clone())
            }
        }
    }
}

/// Lookup table from widget type tag to descriptor.
#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    descriptors: FxHashMap<WidgetKind, Arc<WidgetDescriptor>>,
}

impl WidgetRegistry {
    /// Registry with every built-in widget kind.
    pub fn builtin() -> Self {
        Self::from_descriptors(builtin::descriptors())
    }

    pub fn from_descriptors(descriptors: impl IntoIterator<Item = WidgetDescriptor>) -> Self {
        Self {
            descriptors: descriptors
                .into_iter()
                .map(|d| (d.kind, Arc::new(d)))
                .collect(),
        }
    }

    /// Copy of this registry with `kind` removed.
    pub fn without(&self, kind: WidgetKind) -> Self {
        let mut descriptors = self.descriptors.clone();
        descriptors.remove(&kind);
        Self { descriptors }
    }

    pub fn get(&self, kind: WidgetKind) -> Option<&Arc<WidgetDescriptor>> {
        self.descriptors.get(&kind)
    }

    pub fn lookup(&self, tag: &str) -> Option<&Arc<WidgetDescriptor>> {
        WidgetKind::from_tag(tag).and_then(|kind| self.get(kind))
    }

    /// Descriptors in [`WidgetKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<WidgetDescriptor>> {
        WidgetKind::ALL
            .iter()
            .filter_map(move |kind| self.descriptors.get(kind))
    }

    /// Descriptors that can be bound to channels of `type_name`.
    pub fn accepting<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a Arc<WidgetDescriptor>> + 'a {
        self.iter().filter(move |d| {
            d.slot
                .as_ref()
                .is_some_and(|slot| slot.accepts_type(type_name))
        })
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widgets/registry.rs"]
mod tests;
