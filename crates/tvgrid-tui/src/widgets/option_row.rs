//! OptionRow: a one-line horizontal selector (` a │ b │ c `).
//!
//! Used for both the playlist and category bars. When the options do not fit,
//! the row starts late enough that the selected option is fully visible.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{C_MUTED, C_PRIMARY, C_SECONDARY, C_SELECTION_BG, C_SEPARATOR};

const SEPARATOR: &str = "│";

/// Screen columns `[start, end)` occupied by option `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionHit {
    pub start: u16,
    pub end: u16,
    pub index: usize,
}

/// Lay out `labels` from `x`, skipping leading options until `selected` fits
/// in `width`. Returns one hit range per drawn option.
pub fn layout_options(labels: &[&str], selected: usize, x: u16, width: u16) -> Vec<OptionHit> {
    // usize throughout: labels come from playlist content and can be huge.
    let cell = |label: &str| label.width().saturating_add(2);
    let sep = SEPARATOR.width();

    let selected = selected.min(labels.len().saturating_sub(1));
    let mut first = selected;
    let mut span = 0usize;
    while first > 0 {
        let next = span.saturating_add(cell(labels[first])).saturating_add(sep);
        if next > usize::from(width) {
            break;
        }
        span = next;
        first -= 1;
    }
    if first < selected {
        // The loop stopped on an option that no longer fits, unless it hit 0.
        let fits = span
            .saturating_add(cell(labels[first]))
            .saturating_add(sep)
            <= usize::from(width);
        if !fits {
            first += 1;
        }
    }

    let mut hits = Vec::new();
    let mut cursor = usize::from(x);
    let limit = usize::from(x).saturating_add(usize::from(width));
    for (index, label) in labels.iter().enumerate().skip(first) {
        if cursor >= limit {
            break;
        }
        let end = cursor.saturating_add(cell(label)).min(limit);
        hits.push(OptionHit {
            start: u16::try_from(cursor).unwrap_or(u16::MAX),
            end: u16::try_from(end).unwrap_or(u16::MAX),
            index,
        });
        cursor = end.saturating_add(sep);
    }
    hits
}

pub fn draw_options(
    frame: &mut Frame,
    area: Rect,
    labels: &[&str],
    selected: Option<usize>,
    focused: bool,
) -> Vec<OptionHit> {
    let hits = layout_options(labels, selected.unwrap_or(0), area.x, area.width);
    let mut spans = Vec::new();
    for (n, hit) in hits.iter().enumerate() {
        if n > 0 {
            spans.push(Span::styled(SEPARATOR, Style::default().fg(C_SEPARATOR)));
        }
        let style = if Some(hit.index) == selected {
            let s = Style::default()
                .fg(C_PRIMARY)
                .bg(C_SELECTION_BG)
                .add_modifier(Modifier::BOLD);
            if focused {
                s.add_modifier(Modifier::UNDERLINED)
            } else {
                s
            }
        } else if focused {
            Style::default().fg(C_SECONDARY)
        } else {
            Style::default().fg(C_MUTED)
        };
        spans.push(Span::styled(format!(" {} ", labels[hit.index]), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
    hits
}

/// Option under screen column `column`, if any.
pub fn hit_test(hits: &[OptionHit], column: u16) -> Option<usize> {
    hits.iter()
        .find(|h| column >= h.start && column < h.end)
        .map(|h| h.index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_from_start_when_it_fits() {
        let hits = layout_options(&["All", "News"], 1, 10, 40);
        assert_eq!(
            hits,
            vec![
                OptionHit {
                    start: 10,
                    end: 15,
                    index: 0
                },
                OptionHit {
                    start: 16,
                    end: 22,
                    index: 1
                },
            ]
        );
        assert_eq!(hit_test(&hits, 15), None);
        assert_eq!(hit_test(&hits, 16), Some(1));
    }

    #[test]
    fn test_layout_skips_to_keep_selection_visible() {
        let labels = ["Animation", "Business", "Comedy", "Documentary", "News"];
        let hits = layout_options(&labels, 4, 0, 20);
        assert!(hits.iter().any(|h| h.index == 4 && h.end <= 20));
        assert_ne!(hits[0].index, 0);
    }

    #[test]
    fn test_thousands_of_categories_do_not_overflow() {
        let owned: Vec<String> = (0..7000).map(|n| format!("Category{n:05}")).collect();
        let labels: Vec<&str> = owned.iter().map(String::as_str).collect();

        let hits = layout_options(&labels, 6999, 0, 80);
        assert_eq!(hits.last().map(|h| h.index), Some(6999));
        assert!(hits.iter().all(|h| h.end <= 80));

        let hits = layout_options(&labels, 0, 0, 80);
        assert_eq!(hits[0].index, 0);
        assert!(hits.iter().all(|h| h.end <= 80));
    }

    #[test]
    fn test_overlong_label_is_clipped_to_row() {
        let long = "x".repeat(100_000);
        let hits = layout_options(&["All", long.as_str()], 1, 5, 30);
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0],
            OptionHit {
                start: 5,
                end: 35,
                index: 1
            }
        );
    }
}
