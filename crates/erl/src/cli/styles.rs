//! Semantic styles for terminal output.
//!
//! Render code asks for a style by what the text *is* (a delta, a region
//! name, a muted hint) and never picks colours itself. `console` drops the
//! styling when stdout is not a terminal.

use console::Style;

pub fn delta() -> Style {
    Style::new().yellow()
}

pub fn heading() -> Style {
    Style::new().bold()
}

pub fn region() -> Style {
    Style::new().cyan()
}

pub fn muted() -> Style {
    Style::new().dim()
}

pub fn hidden() -> Style {
    Style::new().dim().italic()
}

pub fn success() -> Style {
    Style::new().green()
}

pub fn warning() -> Style {
    Style::new().yellow()
}

pub fn error() -> Style {
    Style::new().red()
}
