//! Debug views written to stderr between steps.

use piwalk_core::Position;

/// Raw source characters, indexed by grid position.
pub struct SourceView {
    lines: Vec<Vec<char>>,
}

impl SourceView {
    pub fn new(source: &str) -> Self {
        let lines = source
            .split('\n')
            .map(|line| line.trim_end_matches('\r').chars().collect())
            .collect();
        Self { lines }
    }

    fn char_at(&self, x: i64, y: i64) -> char {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return ' ';
        };
        self.lines
            .get(y)
            .and_then(|line| line.get(x))
            .copied()
            .unwrap_or(' ')
    }

    /// The `2r+1` rows around `cursor`, `4r+1` columns wide since horizontal
    /// moves cover two columns. The cursor cell is bracketed.
    pub fn render(&self, cursor: Position, radius: u32) -> String {
        let dy = i64::from(radius);
        let dx = dy * 2;
        let mut out = String::new();

        for y in cursor.y - dy..=cursor.y + dy {
            for x in cursor.x - dx..=cursor.x + dx {
                let ch = self.char_at(x, y);
                if x == cursor.x && y == cursor.y {
                    out.push_str(&format!("[{ch}]"));
                } else {
                    out.push_str(&format!(" {ch} "));
                }
            }
            let trimmed = out.trim_end_matches(' ').len();
            out.truncate(trimmed);
            out.push('\n');
        }
        out
    }
}

/// One line: `r0=5 r1=_ ...`, `_` marking a floating register.
pub fn render_registers(registers: &[Option<i64>]) -> String {
    let mut out = String::new();
    for (index, value) in registers.iter().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        match value {
            Some(value) => {
                out.push_str(&format!("r{index}={value}"));
            }
            None => {
                out.push_str(&format!("r{index}=_"));
            }
        }
    }
    out
}
