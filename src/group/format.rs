//! Debug text rendering
//!
//! `{}`  -> `Group 'name' [start-end)`
//! `{:#}` -> header plus one box-drawn line per child, recursively

use std::fmt;

use super::{Group, Span};

/// Column the item annotation is padded to.
const ALIGN: usize = 12;

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group '{}' {}", self.name, self.range)?;
        if !f.alternate() {
            return Ok(());
        }

        let pad = " ".repeat(ALIGN + 2);
        let mut idx = 0;
        for (i, span) in self.children.iter().enumerate() {
            let count = span.item_count();
            let annotation = if count <= 1 {
                format!("[{}]", idx)
            } else {
                format!("[{}..{}]", idx, idx + count - 1)
            };
            idx += count;

            let (connector, continuation) = if i + 1 < self.children.len() {
                (" ├─ ", format!("\n │ {}", pad))
            } else {
                (" └─ ", format!("\n   {}", pad))
            };
            let filler = "─".repeat(ALIGN.saturating_sub(annotation.len()));
            write!(f, "\n{}{} {} ", connector, annotation, filler)?;

            match span {
                Span::Range(range) => write!(f, "Atoms {}", range)?,
                Span::Group(group) => {
                    let nested = format!("{:#}", group);
                    f.write_str(&nested.replace('\n', &continuation))?;
                }
            }
        }
        Ok(())
    }
}
