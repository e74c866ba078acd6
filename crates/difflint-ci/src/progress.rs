// Progress indicator for the lint fan-out

use indicatif::{ProgressBar, ProgressStyle};

/// Create the lint progress bar; `total` counts the start tick plus one per project.
///
/// The bar draws to stderr, leaving stdout to the reports.
pub fn create_progress_bar(total: u64, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("linting [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to create progress bar template");
            ProgressStyle::default_bar()
        })
        .progress_chars("=>-");
    pb.set_style(style);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_bar_still_counts() {
        let pb = create_progress_bar(3, false);
        pb.inc(1);
        pb.inc(1);
        assert_eq!(pb.position(), 2);
    }
}
