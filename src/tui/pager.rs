/// One list item after formatting, wrapping and styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub max_width: usize,
    pub max_height: usize,
    /// Screen rows the item actually takes (after any collapsing)
    pub rendered_height: usize,
    /// Display text before wrapping and styling
    pub raw_text: String,
    /// Styled screen rows, `rendered_height` of them
    pub rendered: Vec<String>,
}

/// A run of rendered items that fits in one viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub lines: Vec<RenderedLine>,
    pub total_height: usize,
    pub render_width: usize,
    pub render_height: usize,
}

impl RenderedPage {
    fn new(lines: Vec<RenderedLine>, render_width: usize, render_height: usize) -> Self {
        let total_height = lines.iter().map(|l| l.rendered_height).sum();
        RenderedPage {
            lines,
            total_height,
            render_width,
            render_height,
        }
    }
}

/// Lays pre-measured items out into pages of a fixed height.
#[derive(Debug)]
pub struct Pager {
    width: usize,
    height: usize,
    current: Vec<RenderedLine>,
    current_height: usize,
    pages: Vec<RenderedPage>,
}

impl Pager {
    pub fn new(width: usize, height: usize) -> Self {
        Pager {
            width,
            height,
            current: Vec::new(),
            current_height: 0,
            pages: Vec::new(),
        }
    }

    /// Rows still free on the page under construction.
    pub fn lines_left_on_page(&self) -> usize {
        self.height.saturating_sub(self.current_height)
    }

    /// Place one item.
    ///
    /// An item taller than the room left gets a page of its own: the page in
    /// progress is closed first when it has content, and the item's page is
    /// closed right after it. An item that fills the page exactly closes it.
    pub fn add_item(&mut self, line: RenderedLine) {
        let after = self.current_height + line.rendered_height;

        if after > self.height {
            if !self.current.is_empty() {
                self.close_page();
            }
            self.place(line);
            self.close_page();
        } else if after == self.height {
            self.place(line);
            self.close_page();
        } else {
            self.place(line);
        }
    }

    /// Finish layout and hand back every page. A page still in progress is
    /// flushed when it has content.
    pub fn build(mut self) -> Vec<RenderedPage> {
        if !self.current.is_empty() {
            self.close_page();
        }
        self.pages
    }

    fn place(&mut self, line: RenderedLine) {
        self.current_height += line.rendered_height;
        self.current.push(line);
    }

    fn close_page(&mut self) {
        let lines = std::mem::take(&mut self.current);
        self.pages.push(RenderedPage::new(lines, self.width, self.height));
        self.current_height = 0;
    }
}
