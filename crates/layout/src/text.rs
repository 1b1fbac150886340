//! Greedy line breaking over runs of styled text.

use crate::fonts::{FontKey, LoadedFont};
use folio_model::{Alignment, Color};
use std::sync::Arc;

/// A run of text with its font resolved and its vertical metrics computed.
#[derive(Debug, Clone)]
pub struct MeasuredRun {
    pub text: String,
    pub font_key: FontKey,
    pub font: Arc<LoadedFont>,
    pub size: f32,
    pub color: Color,
    /// Height of one line box for this run.
    pub line_height: f32,
    /// Distance from the top of the line box to the baseline.
    pub baseline_offset: f32,
}

impl MeasuredRun {
    pub fn new(
        text: impl Into<String>,
        font_key: FontKey,
        font: Arc<LoadedFont>,
        size: f32,
        line_height_factor: f32,
        color: Color,
    ) -> Self {
        let glyph_box = font.metrics.box_height(size);
        let line_height = glyph_box * line_height_factor;
        let baseline_offset = font.metrics.ascent_at(size) + (line_height - glyph_box) / 2.0;
        Self {
            text: text.into(),
            font_key,
            font,
            size,
            color,
            line_height,
            baseline_offset,
        }
    }

    fn width_of(&self, text: &str) -> f32 {
        self.font.metrics.text_width(text, self.size)
    }
}

#[derive(Debug, Clone)]
pub struct LineLayout {
    pub items: Vec<LineItem>,
    pub width: f32,
    pub height: f32,
    pub baseline: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub run_index: usize,
    pub text: String,
    pub x: f32,
    pub width: f32,
    pub is_space: bool,
}

enum Token<'a> {
    Word(&'a str),
    Space,
    Newline,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut word_start = None;
    for (i, c) in text.char_indices() {
        // No-break spaces stay inside words.
        if c.is_whitespace() && c != '\u{a0}' {
            if let Some(start) = word_start.take() {
                tokens.push(Token::Word(&text[start..i]));
            }
            if c == '\n' {
                tokens.push(Token::Newline);
            } else if !matches!(tokens.last(), Some(Token::Space)) {
                tokens.push(Token::Space);
            }
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(start) = word_start {
        tokens.push(Token::Word(&text[start..]));
    }
    tokens
}

struct LineBuilder<'a> {
    runs: &'a [MeasuredRun],
    max_width: f32,
    align: Alignment,
    lines: Vec<LineLayout>,
    items: Vec<LineItem>,
    width: f32,
    height: f32,
    baseline: f32,
}

impl<'a> LineBuilder<'a> {
    fn has_content(&self) -> bool {
        self.items.iter().any(|item| !item.is_space)
    }

    fn push(&mut self, run_index: usize, text: &str, width: f32, is_space: bool) {
        let run = &self.runs[run_index];
        self.height = self.height.max(run.line_height);
        self.baseline = self.baseline.max(run.baseline_offset);
        self.items.push(LineItem {
            run_index,
            text: text.to_string(),
            x: self.width,
            width,
            is_space,
        });
        self.width += width;
    }

    fn break_line(&mut self, hard: bool, next_run: usize) {
        let items = std::mem::take(&mut self.items);
        let line = finalize_line(
            items,
            self.height,
            self.baseline,
            self.max_width,
            self.align,
            !hard,
        );
        self.lines.push(line);
        self.width = 0.0;
        let run = &self.runs[next_run];
        self.height = run.line_height;
        self.baseline = run.baseline_offset;
    }

    fn push_word(&mut self, run_index: usize, word: &str) {
        let run = &self.runs[run_index];
        let word_width = run.width_of(word);

        if self.width + word_width > self.max_width && self.has_content() {
            self.break_line(false, run_index);
        }

        if word_width <= self.max_width - self.width {
            self.push(run_index, word, word_width, false);
            return;
        }

        // Wider than a whole line: split between characters, at least one per line.
        let mut start = 0;
        let mut segment_width = 0.0;
        for (i, c) in word.char_indices() {
            let char_width = run.width_of(&word[i..i + c.len_utf8()]);
            let fits = self.width + segment_width + char_width <= self.max_width;
            if !fits && (i > start || self.has_content()) {
                if i > start {
                    self.push(run_index, &word[start..i], segment_width, false);
                }
                self.break_line(false, run_index);
                start = i;
                segment_width = 0.0;
            }
            segment_width += char_width;
        }
        self.push(run_index, &word[start..], segment_width, false);
    }
}

/// Breaks `runs` into lines no wider than `max_width`.
///
/// Whitespace collapses to single spaces and is dropped at line starts and
/// ends; `\n` forces a break. An infinite `max_width` yields one line per
/// hard break with unaligned content widths.
pub fn break_lines(runs: &[MeasuredRun], max_width: f32, align: Alignment) -> Vec<LineLayout> {
    let Some(first) = runs.first() else {
        return Vec::new();
    };
    let mut builder = LineBuilder {
        runs,
        max_width,
        align,
        lines: Vec::new(),
        items: Vec::new(),
        width: 0.0,
        height: first.line_height,
        baseline: first.baseline_offset,
    };

    for (run_index, run) in runs.iter().enumerate() {
        for token in tokenize(&run.text) {
            match token {
                Token::Newline => builder.break_line(true, run_index),
                Token::Space => {
                    let after_space = builder.items.last().is_some_and(|item| item.is_space);
                    if builder.has_content() && !after_space {
                        let width = run.width_of(" ");
                        builder.push(run_index, " ", width, true);
                    }
                }
                Token::Word(word) => builder.push_word(run_index, word),
            }
        }
    }

    if builder.has_content() {
        let last = runs.len() - 1;
        builder.break_line(true, last);
    }
    builder.lines
}

fn finalize_line(
    mut items: Vec<LineItem>,
    height: f32,
    baseline: f32,
    max_width: f32,
    align: Alignment,
    may_justify: bool,
) -> LineLayout {
    while items.last().is_some_and(|item| item.is_space) {
        items.pop();
    }
    let content_width = items.last().map(|item| item.x + item.width).unwrap_or(0.0);
    let justify = align == Alignment::Justify && may_justify;

    if !justify && !items.is_empty() {
        let mut merged: Vec<LineItem> = Vec::with_capacity(items.len());
        for item in items {
            match merged.last_mut() {
                Some(current) if current.run_index == item.run_index => {
                    current.text.push_str(&item.text);
                    current.width += item.width;
                    current.is_space = false;
                }
                _ => merged.push(item),
            }
        }
        items = merged;
    }

    if !max_width.is_finite() {
        return LineLayout {
            items,
            width: content_width,
            height,
            baseline,
        };
    }

    let free_space = (max_width - content_width).max(0.0);
    match align {
        Alignment::Center => items.iter_mut().for_each(|item| item.x += free_space / 2.0),
        Alignment::Right => items.iter_mut().for_each(|item| item.x += free_space),
        Alignment::Justify if justify => {
            let gaps = items.iter().filter(|item| item.is_space).count();
            if gaps > 0 {
                let extra = free_space / gaps as f32;
                let mut offset = 0.0;
                for item in &mut items {
                    item.x += offset;
                    if item.is_space {
                        item.width += extra;
                        offset += extra;
                    }
                }
            }
        }
        _ => {}
    }

    LineLayout {
        items,
        width: max_width,
        height,
        baseline,
    }
}

/// Width of the widest hard-broken line, used to size auto columns.
pub fn max_content_width(runs: &[MeasuredRun]) -> f32 {
    break_lines(runs, f32::INFINITY, Alignment::Left)
        .iter()
        .map(|line| line.width)
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontRegistry;

    fn courier_run(text: &str, size: f32) -> MeasuredRun {
        let registry = FontRegistry::standard();
        let (key, font) = registry.resolve("Courier", false, false).unwrap();
        MeasuredRun::new(text, key, font, size, 1.0, Color::BLACK)
    }

    fn line_text(line: &LineLayout) -> String {
        line.items.iter().map(|item| item.text.as_str()).collect()
    }

    #[test]
    fn test_wraps_on_spaces() {
        // Courier 10pt: 6pt per character.
        let runs = [courier_run("aaa bbb ccc", 10.0)];
        let lines = break_lines(&runs, 45.0, Alignment::Left);

        let texts: Vec<_> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn test_collapses_whitespace() {
        let runs = [courier_run("  a \t  b  ", 10.0)];
        let lines = break_lines(&runs, 1000.0, Alignment::Left);
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "a b");
    }

    #[test]
    fn test_newline_forces_break() {
        let runs = [courier_run("one\ntwo", 10.0)];
        let lines = break_lines(&runs, 1000.0, Alignment::Left);
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[1]), "two");
    }

    #[test]
    fn test_splits_overlong_word() {
        let runs = [courier_run("abcdefghij", 10.0)];
        let lines = break_lines(&runs, 24.0, Alignment::Left);

        let texts: Vec<_> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_always_makes_progress_on_tiny_width() {
        let runs = [courier_run("abc", 10.0)];
        let lines = break_lines(&runs, 1.0, Alignment::Left);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_center_and_right_alignment() {
        let runs = [courier_run("ab", 10.0)];
        let centered = break_lines(&runs, 100.0, Alignment::Center);
        assert_eq!(centered[0].items[0].x, 44.0);

        let right = break_lines(&runs, 100.0, Alignment::Right);
        assert_eq!(right[0].items[0].x, 88.0);
    }

    #[test]
    fn test_justify_spreads_all_but_last_line() {
        let runs = [courier_run("aa bb cc dd", 10.0)];
        let lines = break_lines(&runs, 50.0, Alignment::Justify);
        assert_eq!(lines.len(), 2);

        let first = &lines[0];
        let last_item = first.items.last().unwrap();
        assert!((last_item.x + last_item.width - 50.0).abs() < 0.01);
        assert_eq!(lines[1].items.len(), 1);
        assert_eq!(lines[1].items[0].x, 0.0);
    }

    #[test]
    fn test_mixed_runs_take_tallest_line_box() {
        let runs = [courier_run("small ", 8.0), courier_run("BIG", 20.0)];
        let lines = break_lines(&runs, 1000.0, Alignment::Left);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].items.len(), 2);
        assert!((lines[0].height - runs[1].line_height).abs() < f32::EPSILON);
    }

    #[test]
    fn test_max_content_width() {
        let runs = [courier_run("abc\nabcdef", 10.0)];
        assert_eq!(max_content_width(&runs), 36.0);
    }
}
