use serde::{Deserialize, Serialize};

pub const DEFAULT_COLORS: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

pub const DEFAULT_SYMBOLS: [&str; 6] = ["circle", "square", "triangle", "star", "cross", "x"];

/// Visual style of a map layer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Style {
    pub symbol: String,
    pub fill: Fill,
    pub stroke: Stroke,
    pub size: u32,
    pub opacity: u32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOLS[0].to_string(),
            fill: Fill::default(),
            stroke: Stroke::default(),
            size: 15,
            opacity: 50,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Fill {
    pub color: String,
}

impl Default for Fill {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLORS[0].to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Stroke {
    pub color: String,
    pub width: u32,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLORS[0].to_string(),
            width: 2,
        }
    }
}

/// Assigns a style to the n-th emitted layer.
///
/// Any `Fn(usize) -> Style` closure is a strategy, which keeps visual policy
/// out of the derivation itself.
pub trait StyleStrategy {
    fn style(&self, index: usize) -> Style;

    fn color(&self, index: usize) -> String {
        self.style(index).fill.color
    }
}

impl<F> StyleStrategy for F
where
    F: Fn(usize) -> Style,
{
    fn style(&self, index: usize) -> Style {
        self(index)
    }
}

/// Fixed lists of colors and marker symbols, cycled by layer index
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Palette {
    pub colors: Vec<String>,
    pub symbols: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Palette {
    pub fn new(colors: Vec<String>, symbols: Vec<String>) -> Self {
        Self { colors, symbols }
    }

    fn color_at(&self, index: usize) -> String {
        if self.colors.is_empty() {
            return DEFAULT_COLORS[index % DEFAULT_COLORS.len()].to_string();
        }
        self.colors[index % self.colors.len()].clone()
    }

    fn symbol_at(&self, index: usize) -> String {
        if self.symbols.is_empty() {
            return DEFAULT_SYMBOLS[index % DEFAULT_SYMBOLS.len()].to_string();
        }
        self.symbols[index % self.symbols.len()].clone()
    }
}

impl StyleStrategy for Palette {
    fn style(&self, index: usize) -> Style {
        let color = self.color_at(index);
        Style {
            symbol: self.symbol_at(index),
            fill: Fill {
                color: color.clone(),
            },
            stroke: Stroke { color, width: 2 },
            ..Style::default()
        }
    }

    fn color(&self, index: usize) -> String {
        self.color_at(index)
    }
}
