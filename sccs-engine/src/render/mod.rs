//! Series renderers for divergence curves

pub mod csv;

pub use self::csv::CsvRenderer;

use sccs_core::SccsResult;

/// A named x/y series with one label per point
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub title: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub labels: Vec<String>,
}

impl Series {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x: Vec::new(),
            y: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn push(&mut self, x: f64, y: f64, label: impl Into<String>) {
        self.x.push(x);
        self.y.push(y);
        self.labels.push(label.into());
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

pub trait Renderer: Send + Sync {
    fn render(&self, series: &Series) -> SccsResult<()>;
}

/// Discards every series
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&self, _series: &Series) -> SccsResult<()> {
        Ok(())
    }
}
