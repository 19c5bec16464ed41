use std::path::Path;

use crate::error::Ls8Error;

/// Parse an LS-8 program from its text load format.
///
/// Each line may carry a `#` comment; the text before it, if any, is
/// parsed as one base-2 byte. Lines that do not parse are skipped, and
/// the skip is logged so the policy is observable rather than silent.
pub fn parse_program(source: &str) -> Vec<u8> {
    let mut program = Vec::new();
    for line in source.lines() {
        let text = line.split('#').next().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }
        match u8::from_str_radix(text, 2) {
            Ok(byte) => program.push(byte),
            Err(_) => {
                log::warn!("skipping unparseable program line: {:?}", line);
            }
        }
    }
    program
}

/// Read a program file from disk and parse it.
pub fn read_program(path: &Path) -> Result<Vec<u8>, Ls8Error> {
    let source = std::fs::read_to_string(path)
        .map_err(|_| Ls8Error::ProgramNotFound(path.to_path_buf()))?;
    Ok(parse_program(&source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_binary_literals_in_order() {
        let source = "10000010\n00000000\n00001000\n00000001\n";
        assert_eq!(parse_program(source), vec![0b1000_0010, 0, 8, 1]);
    }

    #[test]
    fn strips_trailing_comments_and_whitespace() {
        let source = "10000010 # LDI R0,8\n  00000000  \n";
        assert_eq!(parse_program(source), vec![0b1000_0010, 0]);
    }

    #[test]
    fn skips_blank_and_comment_only_lines() {
        let source = "# a whole-line comment\n\n   \n00000001\n";
        assert_eq!(parse_program(source), vec![1]);
    }

    #[test]
    fn skips_lines_that_are_not_binary() {
        let source = "10000010\nnot a number\n10021000\n00000001\n";
        assert_eq!(parse_program(source), vec![0b1000_0010, 1]);
    }

    #[test]
    fn skips_values_wider_than_a_byte() {
        assert_eq!(parse_program("100000000\n"), Vec::<u8>::new());
    }

    #[test]
    fn missing_file_reports_program_not_found() {
        let path = Path::new("does/not/exist.ls8");
        assert_eq!(
            read_program(path),
            Err(Ls8Error::ProgramNotFound(path.to_path_buf()))
        );
    }
}
