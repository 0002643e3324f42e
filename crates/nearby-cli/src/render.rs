//! Terminal rendering of the recommendation screen.

use std::fmt::Write as _;

use nearby_core::RecommendationResult;

const HEADER: &str = "Nearby Places";
const SPINNER: &str = "Loading…";
const EMPTY_STATE: &str = "No nearby places found";
pub const PERMISSION_DENIED: &str = "Location permission denied";

/// Display label for a category identifier. Unknown identifiers are shown
/// with their first character upper-cased.
pub fn category_label(id: &str) -> String {
    match id {
        "park" => "Parks 🏞️".to_string(),
        "shopping_mall" => "Shopping Malls 🛍️".to_string(),
        "tourist_attraction" => "Tourist Attractions 🗽".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Renders the whole screen: header, optional location line, then a
/// spinner, the empty state, or one section per category.
pub fn render_screen(loading: bool, result: &RecommendationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{HEADER}");

    if let Some(name) = &result.location_name {
        let _ = writeln!(out, "You're near: {name}");
    }
    out.push('\n');

    if loading {
        let _ = writeln!(out, "{SPINNER}");
        return out;
    }

    if result.places.is_empty() {
        let _ = writeln!(out, "{EMPTY_STATE}");
        return out;
    }

    let mut sections = result.places.iter().peekable();
    while let Some((category, places)) = sections.next() {
        let _ = writeln!(out, "{}", category_label(category.as_str()));
        for place in places {
            let _ = writeln!(out, "  • {place}");
        }
        if sections.peek().is_some() {
            out.push('\n');
        }
    }
    out
}
