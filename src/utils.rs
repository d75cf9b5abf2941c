use crate::engine::{Color, Tube};
use crate::error::{Result, SolverError};
use std::fs;
use std::path::Path;

/// Parses one tube per string slice into a list of `Tube`s.
///
/// Each slice lists a tube's units from bottom to top, in one of two forms:
/// - letters, where `A` is color 0, `B` is color 1, and so on. Whitespace is ignored.
/// - non-negative integers separated by commas and/or whitespace, e.g. `0, 1, 1`.
///
/// A slice holding only `-` or `.` is an empty tube.
///
/// # Errors
/// Returns `SolverError::Parse` with the 1-based index of the offending slice
/// for a lowercase letter, a symbol, or an integer that does not fit a color id.
///
/// # Examples
/// ```
/// use water_sort_solver::utils::tubes_from_str_array;
///
/// let tubes = tubes_from_str_array(&["ABB", "2, 0", "-"]).unwrap();
/// assert_eq!(tubes[0].units(), &[0, 1, 1]);
/// assert_eq!(tubes[1].units(), &[2, 0]);
/// assert!(tubes[2].is_empty());
///
/// assert!(tubes_from_str_array(&["AxB"]).is_err());
/// ```
pub fn tubes_from_str_array(s: &[&str]) -> Result<Vec<Tube>> {
    s.iter()
        .enumerate()
        .map(|(i, line)| parse_tube_line(line, i + 1))
        .collect()
}

/// Parses a whole puzzle description: one tube per line.
///
/// Blank lines and lines starting with `#` are skipped. Line numbers in errors
/// refer to the original text.
pub fn parse_puzzle(text: &str) -> Result<Vec<Tube>> {
    let mut tubes = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        tubes.push(parse_tube_line(trimmed, i + 1)?);
    }
    if tubes.is_empty() {
        return Err(SolverError::Parse {
            line: 0,
            message: "puzzle contains no tubes".to_string(),
        });
    }
    Ok(tubes)
}

/// Reads and parses a puzzle file, see [`parse_puzzle`].
pub fn read_puzzle_file(path: &Path) -> Result<Vec<Tube>> {
    let content = fs::read_to_string(path)?;
    parse_puzzle(&content)
}

fn parse_tube_line(line: &str, line_no: usize) -> Result<Tube> {
    let trimmed = line.trim();
    if trimmed == "-" || trimmed == "." || trimmed.is_empty() {
        return Ok(Tube::new());
    }

    let parse_error = |message: String| SolverError::Parse {
        line: line_no,
        message,
    };

    let units = if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<Color>()
                    .map_err(|e| parse_error(format!("invalid color '{}': {}", token, e)))
            })
            .collect::<Result<Vec<Color>>>()?
    } else {
        trimmed
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| {
                if c.is_ascii_uppercase() {
                    Ok(c as u8 - b'A')
                } else {
                    Err(parse_error(format!("Unrecognized character '{}'", c)))
                }
            })
            .collect::<Result<Vec<Color>>>()?
    };
    Ok(Tube::from_units(units))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tubes_from_str_array_letters() {
        let tubes = tubes_from_str_array(&["ABCA", "C B", "."]).unwrap();
        assert_eq!(tubes.len(), 3);
        assert_eq!(tubes[0].units(), &[0, 1, 2, 0]);
        assert_eq!(tubes[1].units(), &[2, 1]);
        assert!(tubes[2].is_empty());
    }

    #[test]
    fn test_tubes_from_str_array_numbers() {
        let tubes = tubes_from_str_array(&["0,1,1", "12 3", "7"]).unwrap();
        assert_eq!(tubes[0].units(), &[0, 1, 1]);
        assert_eq!(tubes[1].units(), &[12, 3]);
        assert_eq!(tubes[2].units(), &[7]);
    }

    #[test]
    fn test_tubes_from_str_array_invalid_char() {
        let err = tubes_from_str_array(&["AB", "AbA"]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("line 2"), "{}", message);
        assert!(message.contains("Unrecognized character 'b'"), "{}", message);
    }

    #[test]
    fn test_tubes_from_str_array_color_out_of_range() {
        let err = tubes_from_str_array(&["1, 300"]).unwrap_err();
        assert!(err.to_string().contains("invalid color '300'"));
    }

    #[test]
    fn test_parse_puzzle_skips_comments_and_blank_lines() {
        let text = "# two colors\nAB\n\nBA\n-\n";
        let tubes = parse_puzzle(text).unwrap();
        assert_eq!(tubes.len(), 3);
        assert_eq!(tubes[1].units(), &[1, 0]);
        assert!(tubes[2].is_empty());
    }

    #[test]
    fn test_parse_puzzle_reports_original_line_number() {
        let err = parse_puzzle("# header\nAB\nA?\n").unwrap_err();
        assert!(matches!(err, SolverError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_parse_puzzle_empty_input() {
        assert!(parse_puzzle("# nothing here\n\n").is_err());
    }
}
