//! Context-size annotation persisted inside the seed alignment file.
//!
//! Stockholm files carry it as a `#=GF CTXSZ <n>` line right after the
//! `# STOCKHOLM` marker; any other file gets a bare `CTXSZ <n>` first line.

use sccs_core::{SccsError, SccsResult};
use std::fs;
use std::path::Path;

pub const CONTEXT_SIZE_TAG: &str = "CTXSZ";

const STOCKHOLM_MARKER: &str = "# STOCKHOLM";

/// Leading lines that may carry the annotation: the `#` block of a Stockholm
/// file, or everything before the first `>` record otherwise
fn header_lines(contents: &str) -> usize {
    let stockholm = contents.starts_with(STOCKHOLM_MARKER);
    contents
        .lines()
        .take_while(|line| {
            if stockholm {
                line.starts_with('#')
            } else {
                !line.starts_with('>')
            }
        })
        .count()
}

/// Value of the annotation, scanning only the header lines before the first record
pub fn parse_context_size(contents: &str) -> SccsResult<Option<u64>> {
    for line in contents.lines().take(header_lines(contents)) {
        let mut tokens = line.split_whitespace();
        while let Some(token) = tokens.next() {
            if token == CONTEXT_SIZE_TAG {
                let value = tokens.next().ok_or_else(|| {
                    SccsError::Parse(format!("{} annotation without a value", CONTEXT_SIZE_TAG))
                })?;
                let size = value.parse().map_err(|_| {
                    SccsError::Parse(format!("Bad {} value: {}", CONTEXT_SIZE_TAG, value))
                })?;
                return Ok(Some(size));
            }
        }
    }
    Ok(None)
}

pub fn read_context_size<P: AsRef<Path>>(path: P) -> SccsResult<Option<u64>> {
    parse_context_size(&fs::read_to_string(path)?)
}

fn is_annotation_line(line: &str) -> bool {
    line.split_whitespace().any(|t| t == CONTEXT_SIZE_TAG)
}

/// Rewrite `contents` with exactly one annotation carrying `size`
pub fn with_context_size(contents: &str, size: u64) -> String {
    let header = header_lines(contents);
    let mut lines: Vec<String> = contents
        .lines()
        .enumerate()
        .filter(|(i, line)| *i >= header || !is_annotation_line(line))
        .map(|(_, line)| line.to_string())
        .collect();

    match lines.first() {
        Some(first) if first.starts_with(STOCKHOLM_MARKER) => {
            lines.insert(1, format!("#=GF {} {}", CONTEXT_SIZE_TAG, size));
        }
        _ => lines.insert(0, format!("{} {}", CONTEXT_SIZE_TAG, size)),
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Persist the annotation, replacing any previous value
pub fn write_context_size<P: AsRef<Path>>(path: P, size: u64) -> SccsResult<()> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let updated = with_context_size(&contents, size);

    let tmp = path.with_extension("ctxsz.tmp");
    fs::write(&tmp, updated)?;
    fs::rename(&tmp, path)?;
    tracing::debug!("Annotated {} with {} {}", path.display(), CONTEXT_SIZE_TAG, size);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_annotation() {
        assert_eq!(parse_context_size(">a\nACGT\n").unwrap(), None);
        // Tokens inside records are not annotations
        assert_eq!(parse_context_size(">a CTXSZ 5\nACGT\n").unwrap(), None);
    }

    #[test]
    fn test_plain_file_round_trip() {
        let updated = with_context_size(">a\nACGT\n", 150);
        assert!(updated.starts_with("CTXSZ 150\n>a"));
        assert_eq!(parse_context_size(&updated).unwrap(), Some(150));

        let replaced = with_context_size(&updated, 80);
        assert_eq!(replaced.matches(CONTEXT_SIZE_TAG).count(), 1);
        assert_eq!(parse_context_size(&replaced).unwrap(), Some(80));
    }

    #[test]
    fn test_stockholm_placement() {
        let updated = with_context_size("# STOCKHOLM 1.0\n#=GF ID fam\nseq1 ACGU\n//\n", 40);
        let lines: Vec<&str> = updated.lines().collect();
        assert_eq!(lines[0], "# STOCKHOLM 1.0");
        assert_eq!(lines[1], "#=GF CTXSZ 40");
        assert_eq!(parse_context_size(&updated).unwrap(), Some(40));
    }

    #[test]
    fn test_stockholm_body_is_not_header() {
        let body = "# STOCKHOLM 1.0\n#=GF CTXSZ 40\nCTXSZ ACGU\n#=GC CTXSZ xx\n//\n";
        assert_eq!(parse_context_size(body).unwrap(), Some(40));

        let updated = with_context_size(body, 90);
        let lines: Vec<&str> = updated.lines().collect();
        assert_eq!(
            lines,
            vec!["# STOCKHOLM 1.0", "#=GF CTXSZ 90", "CTXSZ ACGU", "#=GC CTXSZ xx", "//"]
        );

        // An alignment whose only CTXSZ token sits in a sequence row has no annotation
        assert_eq!(parse_context_size("# STOCKHOLM 1.0\nCTXSZ 12\n//\n").unwrap(), None);
    }

    #[test]
    fn test_bad_value() {
        assert!(matches!(
            parse_context_size("CTXSZ wide\n"),
            Err(SccsError::Parse(_))
        ));
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seeds.fa");
        fs::write(&path, ">s1\nACGTACGT\n").unwrap();

        assert_eq!(read_context_size(&path).unwrap(), None);
        write_context_size(&path, 250).unwrap();
        assert_eq!(read_context_size(&path).unwrap(), Some(250));
        assert!(fs::read_to_string(&path).unwrap().ends_with(">s1\nACGTACGT\n"));
    }
}
