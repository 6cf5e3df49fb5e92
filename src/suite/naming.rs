//! Display names for benchmark artifacts
//!
//! `bench_sort_algorithms` becomes `Sort Algorithms`.

/// Marker every benchmark file stem starts with.
pub const BENCH_MARKER: &str = "bench_";

/// Convert a benchmark file stem into a human-readable label.
///
/// Strips the leading `bench_` marker, splits the rest on `_`, and title-cases each word: a
/// letter is upper-cased when it starts a run of letters and lower-cased otherwise, so
/// `bench_2d_arrays` reads `2D Arrays`. Pure and total: a stem with no usable words
/// falls back to the stem itself, so the result is never empty for a non-empty stem.
pub fn format_benchmark_name(stem: &str) -> String {
    format_name_with_marker(stem, BENCH_MARKER)
}

/// [`format_benchmark_name`] for suites that use a different filename marker.
pub fn format_name_with_marker(stem: &str, marker: &str) -> String {
    let identifier = stem.strip_prefix(marker).unwrap_or(stem);

    let label = identifier
        .split('_')
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ");

    if label.is_empty() { stem.to_string() } else { label }
}

fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut after_letter = false;
    for c in word.chars() {
        if !c.is_alphabetic() {
            out.push(c);
        } else if after_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        after_letter = c.is_alphabetic();
    }
    out
}
