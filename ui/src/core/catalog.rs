//! Static metric and card catalog. These are the standard data points every
//! user shares; only the active card order is per-user.

/// How a metric's value is entered and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Numeric,
    /// Integer slider from 0 (good) to 10 (awful).
    Scale0To10,
    Boolean,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricDefinition {
    pub name: &'static str,
    pub title: &'static str,
    pub kind: ValueKind,
    pub unit: &'static str,
    pub prompt: &'static str,
}

/// Icon glyph shown on a card. Rendered as inline SVG by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardIcon {
    Activity,
    Heart,
    Droplet,
    Moon,
    Brain,
    Bone,
    Pill,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardDefinition {
    pub name: &'static str,
    pub title: &'static str,
    pub icon: CardIcon,
    pub color: Option<&'static str>,
    pub metrics: &'static [&'static str],
}

pub const SCALE_COLOR: &str = "#4f46e5";
pub const VALUE_COLOR: &str = "#16a34a";
pub const EMPTY_COLOR: &str = "#9ca3af";

impl CardDefinition {
    pub fn metric_definitions(&self) -> impl Iterator<Item = &'static MetricDefinition> + '_ {
        self.metrics.iter().filter_map(|name| metric(name))
    }

    /// Accent colour: explicit, otherwise indigo for symptom scales and green
    /// for everything else.
    pub fn accent(&self) -> &'static str {
        self.color.unwrap_or_else(|| {
            if self.metric_definitions().any(|m| m.kind == ValueKind::Scale0To10) {
                SCALE_COLOR
            } else {
                VALUE_COLOR
            }
        })
    }

    /// Whether the card's values belong on a 0-10 axis.
    pub fn is_scale(&self) -> bool {
        self.metric_definitions().all(|m| m.kind == ValueKind::Scale0To10)
    }

    /// Metrics that can be plotted (booleans are not).
    pub fn chartable_metrics(&self) -> Vec<&'static MetricDefinition> {
        self.metric_definitions()
            .filter(|m| m.kind != ValueKind::Boolean)
            .collect()
    }
}

pub static METRICS: &[MetricDefinition] = &[
    MetricDefinition {
        name: "weight",
        title: "Weight",
        kind: ValueKind::Numeric,
        unit: "lbs",
        prompt: "What is your weight?",
    },
    MetricDefinition {
        name: "pain",
        title: "Pain",
        kind: ValueKind::Scale0To10,
        unit: "",
        prompt: "How bad is your pain today?",
    },
    MetricDefinition {
        name: "back",
        title: "Back Ache",
        kind: ValueKind::Scale0To10,
        unit: "",
        prompt: "How bad is your back pain today?",
    },
    MetricDefinition {
        name: "headache",
        title: "Headache",
        kind: ValueKind::Scale0To10,
        unit: "",
        prompt: "How bad is your headache today?",
    },
    MetricDefinition {
        name: "tired",
        title: "Tired",
        kind: ValueKind::Scale0To10,
        unit: "",
        prompt: "How tired are you today?",
    },
    MetricDefinition {
        name: "temperature",
        title: "Temperature",
        kind: ValueKind::Numeric,
        unit: "°F",
        prompt: "What is your temperature?",
    },
    MetricDefinition {
        name: "heart",
        title: "Heart Rate",
        kind: ValueKind::Numeric,
        unit: "bpm",
        prompt: "What is your Heart Rate (beats per minute)?",
    },
    MetricDefinition {
        name: "systolic",
        title: "Systolic",
        kind: ValueKind::Numeric,
        unit: "mmHg",
        prompt: "Systolic (top number)",
    },
    MetricDefinition {
        name: "diastolic",
        title: "Diastolic",
        kind: ValueKind::Numeric,
        unit: "mmHg",
        prompt: "Diastolic (bottom number)",
    },
    MetricDefinition {
        name: "glucose",
        title: "Glucose",
        kind: ValueKind::Numeric,
        unit: "mg/dL",
        prompt: "What is your Blood Glucose (sugar) level?",
    },
    MetricDefinition {
        name: "tylenol",
        title: "Tylenol",
        kind: ValueKind::Boolean,
        unit: "",
        prompt: "Did you take Tylenol within the last 4 hours?",
    },
    MetricDefinition {
        name: "losartan",
        title: "Losartan",
        kind: ValueKind::Boolean,
        unit: "",
        prompt: "Did you take Losartan today?",
    },
];

pub static CARDS: &[CardDefinition] = &[
    CardDefinition {
        name: "weight",
        title: "Weight",
        icon: CardIcon::Activity,
        color: None,
        metrics: &["weight"],
    },
    CardDefinition {
        name: "symptoms",
        title: "Symptoms",
        icon: CardIcon::Activity,
        color: None,
        metrics: &["pain", "temperature", "tylenol"],
    },
    CardDefinition {
        name: "heart",
        title: "Heart Rate",
        icon: CardIcon::Heart,
        color: None,
        metrics: &["heart"],
    },
    CardDefinition {
        name: "blood-pressure",
        title: "Blood Pressure",
        icon: CardIcon::Activity,
        color: None,
        metrics: &["systolic", "diastolic", "losartan"],
    },
    CardDefinition {
        name: "glucose",
        title: "Glucose",
        icon: CardIcon::Droplet,
        color: None,
        metrics: &["glucose"],
    },
    CardDefinition {
        name: "tired",
        title: "Tired",
        icon: CardIcon::Moon,
        color: Some("#4f46e5"),
        metrics: &["tired"],
    },
    CardDefinition {
        name: "headache",
        title: "Headache",
        icon: CardIcon::Brain,
        color: Some("#7c3aed"),
        metrics: &["headache"],
    },
    CardDefinition {
        name: "back",
        title: "Back Ache",
        icon: CardIcon::Bone,
        color: Some("#f59e0b"),
        metrics: &["back"],
    },
    CardDefinition {
        name: "tylenol",
        title: "Tylenol",
        icon: CardIcon::Pill,
        color: Some("#10b981"),
        metrics: &["tylenol"],
    },
    CardDefinition {
        name: "losartan",
        title: "Losartan",
        icon: CardIcon::Pill,
        color: Some("#10b981"),
        metrics: &["losartan"],
    },
];

/// Providers offered in the connected-services form. Purely descriptive.
pub const SERVICE_PROVIDERS: &[&str] = &[
    "Fitbit",
    "Apple Health",
    "Google Fit",
    "Withings",
    "Oura",
    "Dexcom",
];

pub fn metric(name: &str) -> Option<&'static MetricDefinition> {
    METRICS.iter().find(|m| m.name == name)
}

pub fn card(name: &str) -> Option<&'static CardDefinition> {
    CARDS.iter().find(|c| c.name == name)
}

/// Default dashboard: every card, in catalog order.
pub fn default_card_order() -> Vec<String> {
    CARDS.iter().map(|c| c.name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_card_metric_is_defined() {
        for card in CARDS {
            for name in card.metrics {
                assert!(metric(name).is_some(), "card {} references unknown metric {name}", card.name);
            }
        }
    }

    #[test]
    fn accent_falls_back_by_kind() {
        assert_eq!(card("symptoms").unwrap().accent(), SCALE_COLOR);
        assert_eq!(card("glucose").unwrap().accent(), VALUE_COLOR);
        assert_eq!(card("back").unwrap().accent(), "#f59e0b");
    }

    #[test]
    fn booleans_are_not_charted() {
        let bp = card("blood-pressure").unwrap();
        let names: Vec<_> = bp.chartable_metrics().iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["systolic", "diastolic"]);
        assert!(card("tylenol").unwrap().chartable_metrics().is_empty());
    }
}
