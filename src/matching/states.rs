use strsim::jaro_winkler;

/// The 28 Indian state names an extracted State value must resemble before its
/// match score is allowed to count.
pub const INDIAN_STATES: [&str; 28] = [
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
];

/// Minimum jaro-winkler similarity for an extracted value to count as a state.
const STATE_MATCH_THRESHOLD: f64 = 0.85;

/// Closest known state and its similarity, if any clears the threshold.
pub fn closest_state(value: &str) -> Option<(&'static str, f64)> {
    let needle = value.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    let mut best: Option<(&'static str, f64)> = None;
    for state in INDIAN_STATES.iter() {
        let similarity = jaro_winkler(&needle, &state.to_lowercase());
        if similarity >= STATE_MATCH_THRESHOLD
            && best.map(|(_, s)| similarity > s).unwrap_or(true)
        {
            best = Some((state, similarity));
        }
    }
    best
}

/// Whether an extracted State value resembles any known state. Partial OCR text
/// that happens to equal an unrelated ground-truth cell fails this guard.
pub fn is_known_state(value: &str) -> bool {
    closest_state(value).is_some()
}
