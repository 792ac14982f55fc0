//! Horizontal text bar charts of outcome counts.

use crate::counts::OutcomeCounts;

/// Default width of the longest bar, in characters.
pub const DEFAULT_BAR_WIDTH: usize = 40;

const BAR: char = '█';

/// Render one row per observed outcome, scaled so the most frequent outcome spans `bar_width`.
///
/// # Example
/// ```
/// use qteleport::counts::OutcomeCounts;
/// use qteleport::histogram::render;
///
/// let counts = OutcomeCounts::from_bit_strings([("00", 30), ("11", 10)]).unwrap();
/// let chart = render(&counts, 9);
/// let rows: Vec<&str> = chart.lines().collect();
/// assert_eq!(rows[0], "00 │█████████ 30 (75.0%)");
/// assert_eq!(rows[1], "11 │███ 10 (25.0%)");
/// ```
pub fn render(counts: &OutcomeCounts, bar_width: usize) -> String {
    let total = counts.shots();
    let max = counts.iter_bits().map(|(_, c)| c).max().unwrap_or(0);
    if total == 0 || max == 0 {
        return "(no outcomes)".to_string();
    }
    let count_width = max.to_string().len();

    counts
        .iter()
        .map(|(key, count)| {
            // Round to nearest, but never hide an outcome that occurred.
            let len = ((count * bar_width + max / 2) / max).max(usize::from(count > 0));
            let bar: String = std::iter::repeat(BAR).take(len).collect();
            let percent = 100.0 * count as f64 / total as f64;
            format!(
                "{} │{} {:>w$} ({:.1}%)",
                key,
                bar,
                count,
                percent,
                w = count_width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
