use std::cmp::Ordering;
use std::fmt;

use super::pager::{Pager, RenderedLine, RenderedPage};
use super::theme::{AnsiColor, Style};
use super::wrap::{collapse_lines, measure, wrap};
use crate::util::text::pad_to_width;

/// Prefix marking the selected item. Every item is measured with it so the
/// layout does not move when the selection does.
pub const SELECTED_PREFIX: &str = " >";

const INDICATOR_STYLE: Style = Style::fg(AnsiColor::DarkGreen);

pub type Formatter<T> = Box<dyn Fn(&T) -> String>;
pub type Styler<T> = Box<dyn Fn(&T, &str, bool) -> String>;
pub type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering>;

/// A selectable list that lays its items out into screen pages.
///
/// The selection is an absolute index into the ordered items; the current
/// page is derived from it using the most recent layout.
pub struct PagedListBox<T> {
    items: Vec<T>,
    formatter: Formatter<T>,
    styler: Styler<T>,
    ordering: Option<Comparator<T>>,
    selected: usize,
    page: usize,
    pages: Vec<RenderedPage>,
    hide_single_page_indicator: bool,
}

impl<T> fmt::Debug for PagedListBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedListBox")
            .field("items", &self.items.len())
            .field("selected", &self.selected)
            .field("page", &self.page)
            .field("pages", &self.pages.len())
            .finish()
    }
}

impl<T> PagedListBox<T> {
    pub fn new(
        formatter: impl Fn(&T) -> String + 'static,
        styler: impl Fn(&T, &str, bool) -> String + 'static,
    ) -> Self {
        PagedListBox {
            items: Vec::new(),
            formatter: Box::new(formatter),
            styler: Box::new(styler),
            ordering: None,
            selected: 0,
            page: 0,
            pages: Vec::new(),
            hide_single_page_indicator: false,
        }
    }

    /// Sort items with `cmp` every time they are updated.
    pub fn with_ordering(mut self, cmp: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        self.ordering = Some(Box::new(cmp));
        self
    }

    /// Skip the `Page x/y` row (and give its row to content) when all items
    /// fit on one page.
    pub fn hide_page_number_if_single_page(mut self, hide: bool) -> Self {
        self.hide_single_page_indicator = hide;
        self
    }

    /// Replace the item snapshot, re-apply the ordering and clamp the
    /// selection into range.
    pub fn update(&mut self, items: impl IntoIterator<Item = T>) {
        self.items = items.into_iter().collect();
        if let Some(cmp) = &self.ordering {
            self.items.sort_by(|a, b| cmp(a, b));
        }
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
        self.sync_page();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn page_index(&self) -> usize {
        self.page
    }

    /// Page count of the most recent layout.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn selected(&self) -> Option<&T> {
        self.items.get(self.selected)
    }

    /// The selected item.
    ///
    /// # Panics
    ///
    /// Panics when the list is empty. Use [`selected`](Self::selected) when
    /// that can happen.
    pub fn selected_item(&self) -> &T {
        match self.items.get(self.selected) {
            Some(item) => item,
            None => panic!("selected_item called on an empty list box"),
        }
    }

    /// Move the selection to `index` (clamped). Returns whether it changed.
    pub fn select_index(&mut self, index: usize) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let index = index.min(self.items.len() - 1);
        self.set_selection(index)
    }

    pub fn select_next(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let next = (self.selected + 1).min(self.items.len() - 1);
        self.set_selection(next)
    }

    pub fn select_previous(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.set_selection(self.selected.saturating_sub(1))
    }

    /// Select the first item of the current page.
    pub fn select_first(&mut self) -> bool {
        if self.items.is_empty() || self.pages.is_empty() {
            return false;
        }
        let first = self.page_start(self.page).min(self.items.len() - 1);
        self.set_selection(first)
    }

    /// Select the last item of the current page.
    pub fn select_last(&mut self) -> bool {
        if self.items.is_empty() || self.pages.is_empty() {
            return false;
        }
        let count = self.pages[self.page].lines.len();
        let last = (self.page_start(self.page) + count)
            .saturating_sub(1)
            .min(self.items.len() - 1);
        self.set_selection(last)
    }

    pub fn next_page(&mut self) -> bool {
        if self.items.is_empty() || self.pages.is_empty() {
            return false;
        }
        let next = (self.page + 1).min(self.pages.len() - 1);
        self.set_page(next)
    }

    pub fn previous_page(&mut self) -> bool {
        if self.items.is_empty() || self.pages.is_empty() {
            return false;
        }
        self.set_page(self.page.saturating_sub(1))
    }

    /// Lay every item out into pages of `height` rows.
    pub fn layout(&self, width: usize, height: usize) -> Vec<RenderedPage> {
        let width = width.max(1);
        let mut pager = Pager::new(width, height.max(1));
        for (index, item) in self.items.iter().enumerate() {
            let line = self.render_item(index, item, width, pager.lines_left_on_page());
            pager.add_item(line);
        }
        pager.build()
    }

    /// Produce exactly `height` rows for the current page: the page's
    /// items, the page indicator and blank filler. An empty list renders
    /// nothing.
    pub fn render(&mut self, width: usize, height: usize) -> Vec<String> {
        if self.items.is_empty() {
            self.pages.clear();
            self.page = 0;
            return Vec::new();
        }
        let width = width.max(1);
        let height = height.max(1);
        let body = if height > 1 { height - 1 } else { 1 };

        let mut show_indicator = height > 1;
        let mut pages = self.layout(width, body);
        if self.hide_single_page_indicator {
            let full = self.layout(width, height);
            if full.len() <= 1 {
                pages = full;
                show_indicator = false;
            }
        }
        self.pages = pages;
        self.sync_page();

        let page = &self.pages[self.page];
        let mut rows: Vec<String> = page
            .lines
            .iter()
            .flat_map(|line| line.rendered.iter().cloned())
            .collect();
        if show_indicator {
            let indicator = format!("Page {}/{}", self.page + 1, self.pages.len());
            rows.push(pad_to_width(&INDICATOR_STYLE.paint(&indicator), width));
        }
        while rows.len() < height {
            rows.push(" ".repeat(width));
        }
        rows
    }

    /// Write the current page to `out`, one row per line.
    pub fn print(
        &mut self,
        out: &mut impl std::io::Write,
        width: usize,
        height: usize,
    ) -> std::io::Result<()> {
        for row in self.render(width, height) {
            write!(out, "{}\r\n", row)?;
        }
        Ok(())
    }

    fn render_item(&self, index: usize, item: &T, width: usize, lines_left: usize) -> RenderedLine {
        let formatted = (self.formatter)(item);
        let prefixed = format!("{}{}", SELECTED_PREFIX, formatted);
        let measured = measure(&prefixed, width);
        let is_selected = index == self.selected;

        let wrapped = wrap(if is_selected { &prefixed } else { &formatted }, width);
        let rendered_height = if lines_left > 0 && lines_left < measured.max_height {
            lines_left
        } else {
            measured.max_height
        };

        let mut lines = collapse_lines(&wrapped.lines, rendered_height, width);
        lines.resize(rendered_height, " ".repeat(width));

        let rendered = lines
            .iter()
            .map(|line| (self.styler)(item, line, is_selected))
            .collect();

        RenderedLine {
            max_width: measured.max_width,
            max_height: measured.max_height,
            rendered_height,
            raw_text: formatted,
            rendered,
        }
    }

    fn set_selection(&mut self, index: usize) -> bool {
        if index == self.selected {
            return false;
        }
        self.selected = index;
        self.sync_page();
        true
    }

    fn set_page(&mut self, page: usize) -> bool {
        if page == self.page {
            return false;
        }
        self.page = page;
        self.selected = self.page_start(page).min(self.items.len().saturating_sub(1));
        true
    }

    /// Absolute index of the first item on `page`.
    fn page_start(&self, page: usize) -> usize {
        self.pages[..page].iter().map(|p| p.lines.len()).sum()
    }

    fn sync_page(&mut self) {
        if self.pages.is_empty() {
            self.page = 0;
            return;
        }
        let mut start = 0;
        for (i, page) in self.pages.iter().enumerate() {
            let end = start + page.lines.len();
            if self.selected < end {
                self.page = i;
                return;
            }
            start = end;
        }
        self.page = self.pages.len() - 1;
    }
}
