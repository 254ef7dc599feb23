//! # Unfolded Net
//!
//! ```text
//!            top
//!   left  front  right  back
//!           bottom
//! ```
//!
//! Every facelet is printed as two spaces and its color digit.

use cube_core::Side;

use crate::error::{CliError, CliResult};

const BLANK: &str = "   ";

/// Renders a serialized state (as returned by `show()`) as an unfolded net.
///
/// # Errors
///
/// Returns [`CliError::Malformed`] if `state` is not `6 * size * size`
/// ASCII characters long.
pub fn net(state: &str, size: usize) -> CliResult<String> {
    let face_len = size * size;
    if size == 0 || !state.is_ascii() || state.len() != Side::COUNT * face_len {
        return Err(CliError::Malformed(format!(
            "{} characters for size {size}",
            state.len()
        )));
    }

    let row = |side: Side, r: usize| {
        let start = side.index() * face_len + r * size;
        &state[start..start + size]
    };

    let mut out = String::new();
    let mut push_row = |indent: usize, parts: &[&str]| {
        for _ in 0..indent * size {
            out.push_str(BLANK);
        }
        for part in parts {
            for c in part.chars() {
                out.push_str("  ");
                out.push(c);
            }
        }
        out.push('\n');
    };

    for r in 0..size {
        push_row(1, &[row(Side::Top, r)]);
    }
    for r in 0..size {
        push_row(
            0,
            &[
                row(Side::Left, r),
                row(Side::Front, r),
                row(Side::Right, r),
                row(Side::Back, r),
            ],
        );
    }
    for r in 0..size {
        push_row(1, &[row(Side::Bottom, r)]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_of_solved_size_2() {
        let net = net("000011112222333344445555", 2).unwrap();
        let lines: Vec<&str> = net.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "        0  0");
        assert_eq!(lines[2], "  1  1  2  2  3  3  4  4");
        assert_eq!(lines[5], "        5  5");
    }

    #[test]
    fn test_net_rows_follow_faces() {
        let mut state = cube_core::FaceletState::new(3).unwrap();
        state.apply(0, 0).unwrap();
        let net = net(&state.serialize(), 3).unwrap();
        let middle = net.lines().nth(3).unwrap();
        assert_eq!(middle.replace(' ', ""), "222333444111");
    }

    #[test]
    fn test_net_rejects_wrong_length() {
        assert!(matches!(net("0123", 3), Err(CliError::Malformed(_))));
        assert!(matches!(net("", 0), Err(CliError::Malformed(_))));
    }
}
