use std::path::PathBuf;

/// Outcome of re-indexing the current subset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Narrowing {
    pub selected: Vec<PathBuf>,
    /// Tokens that were not a valid 1-based position.
    pub rejected: Vec<String>,
}

/// Pick entries of `current` by 1-based positions separated by whitespace or
/// commas. Repeated positions count once; selection keeps input order.
pub fn select_by_positions(current: &[PathBuf], input: &str) -> Narrowing {
    let mut narrowing = Narrowing::default();
    let mut seen = Vec::new();

    for token in input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        match token.parse::<usize>() {
            Ok(position) if (1..=current.len()).contains(&position) => {
                if !seen.contains(&position) {
                    seen.push(position);
                    narrowing.selected.push(current[position - 1].clone());
                }
            }
            _ => narrowing.rejected.push(token.to_string()),
        }
    }

    narrowing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files() -> Vec<PathBuf> {
        ["/a", "/b", "/c"].iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_selects_in_input_order() {
        let narrowing = select_by_positions(&files(), "3 1");
        assert_eq!(narrowing.selected, vec![PathBuf::from("/c"), PathBuf::from("/a")]);
        assert!(narrowing.rejected.is_empty());
    }

    #[test]
    fn test_rejects_out_of_range_and_garbage() {
        let narrowing = select_by_positions(&files(), "0, 2,x 4 2");
        assert_eq!(narrowing.selected, vec![PathBuf::from("/b")]);
        assert_eq!(narrowing.rejected, vec!["0", "x", "4"]);
    }

    #[test]
    fn test_empty_input_selects_nothing() {
        let narrowing = select_by_positions(&files(), "   ");
        assert!(narrowing.selected.is_empty());
        assert!(narrowing.rejected.is_empty());
    }
}
