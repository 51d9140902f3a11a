/// What an isolated rule row stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// `---` or `***`, spaces allowed between the characters.
    Horizontal,
    /// `~~~`: a break that renders as space.
    Invisible,
    /// `===`, optionally followed by a column count.
    Section { columns: u32 },
}

pub struct Rule;

impl Rule {
    pub const MIN_RUN: usize = 3;

    pub fn classify(row: &str) -> Option<RuleKind> {
        let t = row.trim();
        let first = t.chars().next()?;
        match first {
            '-' | '*' => {
                let count = t.chars().filter(|&c| c == first).count();
                (count >= Self::MIN_RUN && t.chars().all(|c| c == first || c == ' '))
                    .then_some(RuleKind::Horizontal)
            }
            '~' => (t.len() >= Self::MIN_RUN && t.chars().all(|c| c == '~')).then_some(RuleKind::Invisible),
            '=' => {
                let run = t.chars().take_while(|&c| c == '=').count();
                if run < Self::MIN_RUN {
                    return None;
                }
                let rest = t[run..].trim().trim_end_matches('=').trim();
                let columns = if rest.is_empty() {
                    1
                } else {
                    rest.parse::<u32>().ok().filter(|&n| n > 0)?
                };
                Some(RuleKind::Section { columns })
            }
            _ => None,
        }
    }
}
