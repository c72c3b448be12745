use std::sync::OnceLock;

use regex::Regex;

use crate::matching::states::closest_state;

/// Structured components of one raw address string. Parts that cannot be
/// located stay empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressParts {
    pub house_flat_number: String,
    pub town: String,
    pub street_road_name: String,
    pub city: String,
    pub country: String,
    pub pincode: String,
    pub premise_building_name: String,
    pub landmark: String,
    pub state: String,
}

fn pin_regex() -> &'static Regex {
    static PIN_RE: OnceLock<Regex> = OnceLock::new();
    PIN_RE.get_or_init(|| Regex::new(r"\b\d{6}\b").unwrap())
}

/// Split a raw comma-separated address into its components. The PIN code is a
/// 6-digit token, the state any segment resembling a known state name, the
/// country a literal "India" segment. Remaining segments are assigned
/// positionally: house/flat, premise/building, street/road, landmark, town,
/// city, in order of appearance.
pub fn parse_address(raw: &str) -> AddressParts {
    let mut parts = AddressParts::default();
    if raw.trim().is_empty() {
        return parts;
    }

    let mut leftovers: Vec<String> = Vec::new();
    for segment in raw.split(',') {
        let mut segment = segment.trim().to_string();
        if segment.is_empty() {
            continue;
        }

        if parts.pincode.is_empty() {
            if let Some(m) = pin_regex().find(&segment) {
                parts.pincode = m.as_str().to_string();
                segment = pin_regex().replace(&segment, "").trim().to_string();
                segment = segment.trim_matches('-').trim().to_string();
                if segment.is_empty() {
                    continue;
                }
            }
        }

        if parts.country.is_empty() && segment.eq_ignore_ascii_case("india") {
            parts.country = segment;
            continue;
        }

        if parts.state.is_empty() && closest_state(&segment).is_some() {
            parts.state = segment;
            continue;
        }

        leftovers.push(segment);
    }

    let mut slots: [&mut String; 6] = [
        &mut parts.house_flat_number,
        &mut parts.premise_building_name,
        &mut parts.street_road_name,
        &mut parts.landmark,
        &mut parts.town,
        &mut parts.city,
    ];
    for (slot, segment) in slots.iter_mut().zip(leftovers.into_iter()) {
        **slot = segment;
    }

    parts
}
