//! Terminal trend chart
//!
//! Plots practised tempos as points, one column per take, with the target
//! tempo drawn as a dashed horizontal line.

use std::fmt::Write;

/// Width of one take column in characters
const COLUMN_WIDTH: usize = 3;

/// Smallest chart height that can show a trend
const MIN_HEIGHT: usize = 2;

/// Render a BPM series as chart lines (top row first).
///
/// Returns no lines for an empty series. Rows are labelled with the tempo
/// they represent; the legend is the last line.
pub fn render_trend(bpms: &[u32], target_bpm: u32, height: usize) -> Vec<String> {
    if bpms.is_empty() {
        return Vec::new();
    }

    let height = height.max(MIN_HEIGHT);
    let lo = bpms.iter().copied().chain([target_bpm]).min().unwrap_or(target_bpm);
    let mut hi = bpms.iter().copied().chain([target_bpm]).max().unwrap_or(target_bpm);
    if hi == lo {
        hi = lo + 1;
    }

    let span = (hi - lo) as f64;
    let steps = (height - 1) as f64;
    let row_of = |bpm: u32| ((bpm - lo) as f64 / span * steps).round() as usize;
    let target_row = row_of(target_bpm);

    let mut lines = Vec::with_capacity(height + 3);
    for row in (0..height).rev() {
        let value = lo as f64 + span * row as f64 / steps;
        let mut line = String::with_capacity(8 + bpms.len() * COLUMN_WIDTH);
        write!(line, "{:>5.0} |", value).ok();
        for &bpm in bpms {
            let cell = if row_of(bpm) == row {
                " o "
            } else if row == target_row {
                "---"
            } else {
                "   "
            };
            line.push_str(cell);
        }
        lines.push(line.trim_end().to_string());
    }

    let mut axis = String::from("      +");
    axis.push_str(&"-".repeat(bpms.len() * COLUMN_WIDTH));
    lines.push(axis);

    let mut labels = String::from("       ");
    for i in 1..=bpms.len() {
        write!(labels, "{:^width$}", i, width = COLUMN_WIDTH).ok();
    }
    lines.push(labels.trim_end().to_string());

    lines.push(format!("       o BPM   --- target ({target_bpm})"));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series() {
        assert!(render_trend(&[], 120, 8).is_empty());
    }

    #[test]
    fn test_points_and_target() {
        let lines = render_trend(&[100, 110, 120], 120, 3);
        // 3 plot rows + axis + labels + legend
        assert_eq!(lines.len(), 6);
        // Top row is 120: third point sits on the target line
        assert!(lines[0].starts_with("  120 |"));
        assert_eq!(lines[0], "  120 |------ o");
        assert_eq!(lines[1], "  110 |    o");
        assert_eq!(lines[2], "  100 | o");
        assert_eq!(lines[3], "      +---------");
        assert_eq!(lines[4], "        1  2  3");
        assert!(lines[5].contains("target (120)"));
    }

    #[test]
    fn test_flat_series() {
        let lines = render_trend(&[90, 90], 90, 1);
        // height is raised to the minimum of two rows
        assert_eq!(lines.len(), 5);
        assert!(lines[1].contains(" o  o"));
    }

    #[test]
    fn test_every_point_is_drawn() {
        let bpms = [60, 75, 90, 105, 120, 135, 150, 160];
        let lines = render_trend(&bpms, 120, 12);
        let points: usize = lines[..12].iter().map(|l| l.matches('o').count()).sum();
        assert_eq!(points, bpms.len());
    }
}
