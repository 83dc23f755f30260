//! Pagination options and configuration.

use crate::model::PageSize;

/// Default safety buffer subtracted from the usable page height, in points.
pub const DEFAULT_SAFETY_BUFFER: f32 = 20.0;

/// Default minimum length (in characters) of each fragment of a split text.
pub const DEFAULT_MIN_SPLIT_CHARS: usize = 50;

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    /// Top margin
    pub top: f32,
    /// Right margin
    pub right: f32,
    /// Bottom margin
    pub bottom: f32,
    /// Left margin
    pub left: f32,
}

impl Margins {
    /// Same margin on every side.
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Sum of the top and bottom margins.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Sum of the left and right margins.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(72.0)
    }
}

/// Options for paginating a document.
#[derive(Debug, Clone)]
pub struct PaginateOptions {
    /// Physical page size
    pub page_size: PageSize,

    /// Page margins
    pub margins: Margins,

    /// Height kept free at the bottom of every page
    pub safety_buffer: f32,

    /// Explicit content height; overrides the computed budget when set
    pub content_height: Option<f32>,

    /// Minimum characters on each side of a text split
    pub min_split_chars: usize,
}

impl PaginateOptions {
    /// Create new pagination options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Letter-sized pages.
    pub fn letter() -> Self {
        Self::new().with_page_size(PageSize::LETTER)
    }

    /// A4-sized pages.
    pub fn a4() -> Self {
        Self::new().with_page_size(PageSize::A4)
    }

    /// Set the page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the page margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the same margin on every side.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margins = Margins::uniform(margin);
        self
    }

    /// Set the safety buffer.
    pub fn with_safety_buffer(mut self, buffer: f32) -> Self {
        self.safety_buffer = buffer.max(0.0);
        self
    }

    /// Use a fixed content height instead of deriving it from the page.
    pub fn with_content_height(mut self, height: f32) -> Self {
        self.content_height = Some(height.max(0.0));
        self
    }

    /// Set the minimum fragment length for text splits.
    pub fn with_min_split_chars(mut self, chars: usize) -> Self {
        self.min_split_chars = chars;
        self
    }

    /// Height available for content on each page.
    ///
    /// The page height minus top and bottom margins and the safety buffer,
    /// unless an explicit content height was set. Never negative.
    pub fn content_budget(&self) -> f32 {
        match self.content_height {
            Some(height) => height,
            None => (self.page_size.height - self.margins.vertical() - self.safety_buffer).max(0.0),
        }
    }

    /// Width available for content on each page.
    pub fn content_width(&self) -> f32 {
        (self.page_size.width - self.margins.horizontal()).max(0.0)
    }
}

impl Default for PaginateOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::LETTER,
            margins: Margins::default(),
            safety_buffer: DEFAULT_SAFETY_BUFFER,
            content_height: None,
            min_split_chars: DEFAULT_MIN_SPLIT_CHARS,
        }
    }
}
