use dioxus::prelude::*;
use time::Date;

use crate::core::catalog::{CardDefinition, MetricDefinition};
use crate::core::format;
use crate::core::store::RecordStore;
use crate::core::timing::{self, Zone};
use crate::state::use_app_state;

/// Days covered by a card chart, ending at the selected day.
pub const CHART_DAYS: u16 = 14;

const WIDTH: f64 = 560.0;
const HEIGHT: f64 = 240.0;
const PAD_LEFT: f64 = 40.0;
const PAD_RIGHT: f64 = 12.0;
const PAD_TOP: f64 = 12.0;
const PAD_BOTTOM: f64 = 28.0;

const LINE_COLORS: &[&str] = &["#2563eb", "#dc2626", "#16a34a"];

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub metric: &'static MetricDefinition,
    /// One point per day; `None` marks a gap.
    pub points: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub days: Vec<Date>,
    pub lines: Vec<ChartLine>,
    pub y_min: f64,
    pub y_max: f64,
}

impl ChartData {
    /// Daily values of every chartable metric on `card` for the
    /// [`CHART_DAYS`] days ending at `anchor`. Each day contributes its
    /// current reading, exactly as the day view would show it.
    pub fn build(
        card: &CardDefinition,
        records: &RecordStore,
        anchor: Date,
        zone: Zone,
    ) -> Self {
        let days = timing::trailing_days(anchor, CHART_DAYS);
        let lines: Vec<ChartLine> = card
            .chartable_metrics()
            .into_iter()
            .map(|metric| ChartLine {
                metric,
                points: days
                    .iter()
                    .map(|day| {
                        records
                            .select_for_day(metric.name, *day, zone)
                            .and_then(|r| r.value.as_number())
                    })
                    .collect(),
            })
            .collect();

        let (y_min, y_max) = if card.is_scale() {
            (0.0, 10.0)
        } else {
            auto_domain(lines.iter().flat_map(|l| l.points.iter().flatten().copied()))
        };

        Self {
            days,
            lines,
            y_min,
            y_max,
        }
    }

    pub fn has_points(&self) -> bool {
        self.lines.iter().any(|l| l.points.iter().any(Option::is_some))
    }

    fn x(&self, index: usize) -> f64 {
        let span = (self.days.len().max(2) - 1) as f64;
        PAD_LEFT + (WIDTH - PAD_LEFT - PAD_RIGHT) * index as f64 / span
    }

    fn y(&self, value: f64) -> f64 {
        let range = (self.y_max - self.y_min).max(f64::EPSILON);
        let plot = HEIGHT - PAD_TOP - PAD_BOTTOM;
        PAD_TOP + plot * (1.0 - (value - self.y_min) / range)
    }

    /// SVG `points` strings for each unbroken run of values in `line`.
    pub fn segments(&self, line: &ChartLine) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current: Vec<String> = Vec::new();
        for (index, point) in line.points.iter().enumerate() {
            match point {
                Some(value) => current.push(format!("{:.1},{:.1}", self.x(index), self.y(*value))),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current).join(" ")),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current.join(" "));
        }
        segments
    }
}

/// Domain padded by 10% of the span (at least 1) on each side.
fn auto_domain(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((max - min) * 0.1).max(1.0);
    ((min - pad).floor(), (max + pad).ceil())
}

#[component]
pub fn CardChart(card: &'static CardDefinition) -> Element {
    let state = use_app_state();
    let app = state.read();
    let data = ChartData::build(card, &app.records, app.selected_day, app.zone);

    let scale_note = if card.is_scale() { " (0–10)" } else { "" };
    let title = format!("{}{scale_note}", card.title);

    let grid_right = WIDTH - PAD_RIGHT;
    let tick_x = PAD_LEFT - 6.0;
    let axis_y = HEIGHT - 8.0;
    let gridlines: Vec<(f64, f64, String)> = (0..=4)
        .map(|step| {
            let value = data.y_min + (data.y_max - data.y_min) * step as f64 / 4.0;
            let y = data.y(value);
            (y, y + 4.0, format::format_number(value))
        })
        .collect();
    let labels: Vec<(f64, String)> = data
        .days
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 2 == 1 || *i + 1 == data.days.len())
        .map(|(i, day)| (data.x(i), format::format_axis_day(*day)))
        .collect();
    let plotted: Vec<(&'static str, &'static str, Vec<String>)> = data
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            (
                line.metric.title,
                LINE_COLORS[i % LINE_COLORS.len()],
                data.segments(line),
            )
        })
        .collect();
    let legend = plotted.len() > 1;

    rsx! {
        figure { class: "chart",
            figcaption { class: "chart__title",
                "{title} · "
                {crate::t!("chart-last-days")}
            }

            if !data.has_points() {
                p { class: "chart__placeholder", {crate::t!("chart-empty")} }
            }

            svg {
                class: "chart__plot",
                view_box: "0 0 {WIDTH} {HEIGHT}",
                role: "img",

                for (y, label_y, label) in gridlines.iter() {
                    line {
                        class: "chart__grid",
                        x1: "{PAD_LEFT}",
                        x2: "{grid_right}",
                        y1: "{y}",
                        y2: "{y}",
                    }
                    text {
                        class: "chart__axis-label",
                        x: "{tick_x}",
                        y: "{label_y}",
                        "text-anchor": "end",
                        "{label}"
                    }
                }

                for (x, label) in labels.iter() {
                    text {
                        class: "chart__axis-label",
                        x: "{x}",
                        y: "{axis_y}",
                        "text-anchor": "middle",
                        "{label}"
                    }
                }

                for (_, color, segments) in plotted.iter() {
                    for points in segments.iter() {
                        polyline {
                            class: "chart__line",
                            points: "{points}",
                            fill: "none",
                            stroke: "{color}",
                            stroke_width: "2",
                        }
                    }
                }
            }

            if legend {
                ul { class: "chart__legend",
                    for (name, color, _) in plotted.iter() {
                        li { class: "chart__legend-item",
                            span { class: "chart__legend-swatch", style: "background: {color}" }
                            "{name}"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::card;
    use crate::core::store::MetricWrite;
    use crate::core::MetricValue;
    use time::macros::{date, time};

    const UTC: Zone = Zone::UTC;

    fn put(store: &mut RecordStore, metric: &str, day: Date, value: f64) {
        let ts = timing::local_millis(day, time!(08:00), UTC);
        store.upsert(
            MetricWrite {
                metric: metric.into(),
                input_value: MetricValue::Number(value),
                timestamp: ts,
                edit_timestamp: None,
                source: None,
            },
            ts,
        );
    }

    #[test]
    fn one_point_per_day_with_gaps() {
        let anchor = date!(2024 - 11 - 14);
        let mut store = RecordStore::new();
        put(&mut store, "weight", date!(2024 - 11 - 01), 174.0);
        put(&mut store, "weight", date!(2024 - 11 - 02), 173.0);
        put(&mut store, "weight", date!(2024 - 11 - 14), 171.0);
        put(&mut store, "weight", date!(2024 - 11 - 15), 170.0);

        let data = ChartData::build(card("weight").unwrap(), &store, anchor, UTC);
        assert_eq!(data.days.len(), CHART_DAYS as usize);
        let points = &data.lines[0].points;
        assert_eq!(points[0], Some(174.0));
        assert_eq!(points[2], None);
        assert_eq!(points[13], Some(171.0));

        let segments = data.segments(&data.lines[0]);
        assert_eq!(segments.len(), 2);
        assert!(data.y_min < 171.0 && data.y_max > 174.0);
    }

    #[test]
    fn scale_cards_use_fixed_axis() {
        let data = ChartData::build(card("tired").unwrap(), &RecordStore::new(), date!(2024 - 11 - 14), UTC);
        assert_eq!((data.y_min, data.y_max), (0.0, 10.0));
        assert!(!data.has_points());
    }

    #[test]
    fn blood_pressure_plots_two_lines() {
        let day = date!(2024 - 11 - 14);
        let mut store = RecordStore::new();
        put(&mut store, "systolic", day, 120.0);
        put(&mut store, "diastolic", day, 80.0);
        let data = ChartData::build(card("blood-pressure").unwrap(), &store, day, UTC);
        assert_eq!(data.lines.len(), 2);
        assert!(data.has_points());
    }

    #[test]
    fn auto_domain_handles_empty_and_flat() {
        assert_eq!(auto_domain(std::iter::empty()), (0.0, 1.0));
        assert_eq!(auto_domain([100.0, 100.0].into_iter()), (99.0, 101.0));
    }
}
