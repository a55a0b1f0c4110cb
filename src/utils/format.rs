//! Formatting helpers for recommendation results.

/// Format a `0.0..=1.0` score as a percentage with one decimal (e.g. `"85.7"`).
///
/// Rounds like JavaScript's `toFixed(1)`: an exact tie goes away from zero
/// (`0.25` -> `"0.3"`), where `{:.1}` alone would round it to even.
pub fn format_score(value: f64) -> String {
    let percent = value * 100.0;
    // Ties at the second decimal are exactly the odd multiples of 0.25.
    let quarters = percent * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return format!("{:.1}", (percent * 10.0).round() / 10.0);
    }
    format!("{:.1}", percent)
}

/// Badge markup for a ranking position.
///
/// First place gets the amber trophy badge, anything else up to third green,
/// the rest muted.
pub fn rank_badge(rank: u32) -> String {
    match rank {
        1 => r#"<span class="badge badge-amber">🏆 #1</span>"#.to_string(),
        0..=3 => format!(r#"<span class="badge badge-green">#{rank}</span>"#),
        _ => format!(r#"<span class="badge badge-muted">#{rank}</span>"#),
    }
}
