use dioxus::prelude::*;

use crate::core::catalog::CardIcon;

/// Stroke path data for each card icon, drawn on a 24x24 grid.
pub fn icon_path(icon: CardIcon) -> &'static str {
    match icon {
        CardIcon::Activity => "M22 12h-4l-3 9L9 3l-3 9H2",
        CardIcon::Heart => {
            "M19 14c1.49-1.46 3-3.21 3-5.5A5.5 5.5 0 0 0 16.5 3c-1.76 0-3 .5-4.5 2-1.5-1.5-2.74-2-4.5-2A5.5 5.5 0 0 0 2 8.5c0 2.3 1.5 4.05 3 5.5l7 7Z"
        }
        CardIcon::Droplet => {
            "M12 22a7 7 0 0 0 7-7c0-2-1-3.9-3-5.5s-3.5-4-4-6.5c-.5 2.5-2 4.9-4 6.5C6 11.1 5 13 5 15a7 7 0 0 0 7 7z"
        }
        CardIcon::Moon => "M12 3a6 6 0 0 0 9 9 9 9 0 1 1-9-9Z",
        CardIcon::Brain => {
            "M12 5a3 3 0 1 0-6 .13 4 4 0 0 0-2.5 5.77 4 4 0 0 0 .55 6.59A4 4 0 1 0 12 18Z M12 5a3 3 0 1 1 6 .13 4 4 0 0 1 2.5 5.77 4 4 0 0 1-.55 6.59A4 4 0 1 1 12 18Z"
        }
        CardIcon::Bone => {
            "M17 10c.7-.7 1.69 0 2.5 0a2.5 2.5 0 1 0 0-5 .5.5 0 0 1-.5-.5 2.5 2.5 0 1 0-5 0c0 .81.7 1.8 0 2.5l-7 7c-.7.7-1.69 0-2.5 0a2.5 2.5 0 0 0 0 5c.28 0 .5.22.5.5a2.5 2.5 0 1 0 5 0c0-.81-.7-1.8 0-2.5Z"
        }
        CardIcon::Pill => "m10.5 20.5 10-10a4.95 4.95 0 1 0-7-7l-10 10a4.95 4.95 0 1 0 7 7Z M8.5 8.5l7 7",
    }
}

#[component]
pub fn CardGlyph(icon: CardIcon, color: &'static str) -> Element {
    let d = icon_path(icon);
    rsx! {
        svg {
            class: "card-icon",
            view_box: "0 0 24 24",
            width: "28",
            height: "28",
            fill: "none",
            stroke: "{color}",
            stroke_width: "2",
            stroke_linecap: "round",
            stroke_linejoin: "round",
            "aria-hidden": "true",
            path { d: "{d}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CARDS;

    #[test]
    fn every_catalog_icon_has_a_path() {
        for card in CARDS {
            assert!(icon_path(card.icon).starts_with(['M', 'm']), "{}", card.name);
        }
    }
}
