// The scrolling chat log surface
//
// Append-only: entries are never reordered, edited, or removed. The scroll
// offset is the only mutable geometry, and the user owns it between
// appends (arrow keys, mouse wheel). Appending decides whether to keep the
// view pinned to the newest entry:
//
// 1. BEFORE touching the content, check whether the view is at (or within
//    SCROLL_THRESHOLD rows of) the bottom.
// 2. Append the rendered entry.
// 3. If the view was near the bottom, snap to the new bottom; otherwise
//    leave the offset alone so a reader who scrolled back stays put.
//
// The measurement must precede the append: appending grows the content,
// which changes the very geometry being measured.

/// How close to the bottom (in rows) still counts as "at the bottom"
pub const SCROLL_THRESHOLD: usize = 10;

/// Append-only log of rendered entries plus viewport geometry.
///
/// `offset` is the index of the first visible line; the bottom position is
/// `total_lines - viewport`. All mutation happens from the TUI task, one
/// call at a time, so measure-then-append is never interleaved.
#[derive(Debug, Default)]
pub struct LogView {
    entries: Vec<String>,
    total_lines: usize,
    offset: usize,
    viewport: usize,
}

impl LogView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rendered entry and apply the autoscroll heuristic.
    pub fn append(&mut self, rendered: String) {
        let at_bottomish = self.at_bottomish();

        // An entry occupies one line per embedded newline-separated segment;
        // an empty entry still takes a line on screen
        self.total_lines += rendered.lines().count().max(1);
        self.entries.push(rendered);

        if at_bottomish {
            self.offset = self.max_offset();
        }
    }

    /// Whether the viewport currently shows (or nearly shows) the newest
    /// line. True whenever the content does not overflow the viewport.
    pub fn at_bottomish(&self) -> bool {
        self.offset + SCROLL_THRESHOLD >= self.max_offset()
    }

    /// Exactly pinned to the newest line (no threshold slack).
    #[allow(dead_code)]
    pub fn at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.viewport)
    }

    /// Sync the viewport height with the layout, called each render frame.
    /// A resize keeps a pinned-ish view pinned and clamps everything else.
    pub fn set_viewport(&mut self, rows: usize) {
        let pinned = self.at_bottomish();
        self.viewport = rows;
        if pinned {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    // User scrolling. These run between appends and simply move the
    // offset; the next append re-evaluates the heuristic from wherever the
    // user left the view.

    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.offset = (self.offset + 1).min(self.max_offset());
    }

    pub fn page_up(&mut self) {
        self.offset = self.offset.saturating_sub(self.viewport.max(1));
    }

    pub fn page_down(&mut self) {
        self.offset = (self.offset + self.viewport.max(1)).min(self.max_offset());
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Lines visible at the current offset, newest-last.
    pub fn visible_lines(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|entry| {
                // Mirror the line accounting in append(): an empty entry is
                // one blank line
                let mut lines: Vec<&str> = entry.lines().collect();
                if lines.is_empty() {
                    lines.push("");
                }
                lines
            })
            .skip(self.offset)
            .take(self.viewport)
    }

    /// Rows between the bottom of the viewport and the newest line.
    pub fn lines_below(&self) -> usize {
        self.max_offset() - self.offset
    }

    // Inspection accessors; the render path itself only needs
    // visible_lines and lines_below

    /// Every entry appended so far, in call order.
    #[allow(dead_code)]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[allow(dead_code)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[allow(dead_code)]
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }
}

impl crate::dispatch::LogSink for LogView {
    fn append(&mut self, rendered: String) {
        LogView::append(self, rendered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A view with `n` single-line entries and the given viewport height.
    fn view_with(n: usize, viewport: usize) -> LogView {
        let mut view = LogView::new();
        view.set_viewport(viewport);
        for i in 0..n {
            view.append(format!("line {i}"));
        }
        view
    }

    #[test]
    fn surface_is_the_concatenation_of_appends_in_order() {
        let mut view = LogView::new();
        view.set_viewport(5);

        let rendered: Vec<String> = (0..20).map(|i| format!("entry {i}")).collect();
        for entry in &rendered {
            view.append(entry.clone());
        }

        assert_eq!(view.entries(), rendered.as_slice());
    }

    #[test]
    fn pinned_exactly_at_bottom_follows_new_content() {
        let mut view = view_with(50, 10);
        assert_eq!(view.offset(), 40); // exactly at bottom

        view.append("new".to_string());

        // Snapped to the new bottom
        assert_eq!(view.offset(), 41);
        assert!(view.at_bottom());
    }

    #[test]
    fn within_threshold_of_bottom_still_follows() {
        let mut view = view_with(50, 10);
        for _ in 0..SCROLL_THRESHOLD {
            view.scroll_up();
        }
        assert_eq!(view.offset(), 30);

        view.append("new".to_string());

        assert_eq!(view.offset(), 41);
    }

    #[test]
    fn scrolled_past_threshold_is_not_interrupted() {
        let mut view = view_with(50, 10);
        for _ in 0..SCROLL_THRESHOLD + 1 {
            view.scroll_up();
        }
        let parked = view.offset();
        assert_eq!(parked, 29);

        view.append("new".to_string());
        view.append("newer".to_string());

        // Reader stays exactly where they were
        assert_eq!(view.offset(), parked);
    }

    #[test]
    fn short_content_is_always_at_bottomish() {
        let mut view = view_with(3, 10);
        assert!(view.at_bottomish());

        view.append("fourth".to_string());
        assert_eq!(view.offset(), 0);
        assert!(view.at_bottom());
    }

    #[test]
    fn measurement_happens_before_the_append() {
        // Parked exactly SCROLL_THRESHOLD rows above the bottom: bottomish
        // by the pre-append measure, but one row out of range if measured
        // against the grown content. Only the pre-append measure pins here.
        let mut view = view_with(50, 10);
        for _ in 0..SCROLL_THRESHOLD {
            view.scroll_up();
        }

        view.append("boundary".to_string());

        assert!(view.at_bottom());
    }

    #[test]
    fn multiline_entries_count_every_line() {
        let mut view = LogView::new();
        view.set_viewport(2);
        view.append("a\nb\nc".to_string());

        assert_eq!(view.total_lines(), 3);
        assert_eq!(view.offset(), 1); // pinned: shows b, c
        let visible: Vec<&str> = view.visible_lines().collect();
        assert_eq!(visible, vec!["b", "c"]);
    }

    #[test]
    fn empty_entry_still_occupies_a_line() {
        let mut view = LogView::new();
        view.set_viewport(5);
        view.append(String::new());
        view.append("after".to_string());

        assert_eq!(view.total_lines(), 2);
        let visible: Vec<&str> = view.visible_lines().collect();
        assert_eq!(visible, vec!["", "after"]);
    }

    #[test]
    fn user_scrolling_moves_within_bounds() {
        let mut view = view_with(30, 10);

        view.scroll_down();
        assert_eq!(view.offset(), 20); // already at bottom, clamped

        view.page_up();
        assert_eq!(view.offset(), 10);
        view.page_up();
        view.page_up();
        assert_eq!(view.offset(), 0); // clamped at top

        view.scroll_to_bottom();
        assert_eq!(view.offset(), 20);
    }

    #[test]
    fn shrinking_viewport_keeps_a_pinned_view_pinned() {
        let mut view = view_with(50, 10);
        assert!(view.at_bottom());

        view.set_viewport(5);
        assert!(view.at_bottom());
        assert_eq!(view.offset(), 45);
    }

    #[test]
    fn resize_clamps_a_parked_view_without_unparking_it() {
        let mut view = view_with(50, 10);
        for _ in 0..20 {
            view.scroll_up();
        }
        assert_eq!(view.offset(), 20);

        view.set_viewport(12);
        assert_eq!(view.offset(), 20); // still parked, still in range
    }
}
