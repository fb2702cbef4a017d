//! Entry files: one region per line, tab-separated `name start end strand`

use csv::{ReaderBuilder, WriterBuilder};
use sccs_core::{EntryRef, SccsError, SccsResult};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

fn csv_error(err: csv::Error) -> SccsError {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(io) => SccsError::Io(io),
            other => SccsError::Parse(format!("{:?}", other)),
        }
    } else {
        SccsError::Parse(format!("Malformed entry line: {}", err))
    }
}

pub fn read_entries_from<R: Read>(reader: R) -> SccsResult<Vec<EntryRef>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut entries = Vec::new();
    for record in reader.deserialize::<EntryRef>() {
        let entry = record.map_err(csv_error)?;
        if entry.end < entry.start {
            return Err(SccsError::Parse(format!(
                "Entry {} ends before it starts",
                entry.name
            )));
        }
        entries.push(entry);
    }
    Ok(entries)
}

/// Read an entry file, preserving line order
pub fn read_entries<P: AsRef<Path>>(path: P) -> SccsResult<Vec<EntryRef>> {
    let path = path.as_ref();
    let entries = read_entries_from(File::open(path)?)?;
    tracing::debug!("Read {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

pub fn write_entries_to<W: Write>(writer: W, entries: &[EntryRef]) -> SccsResult<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer);

    for entry in entries {
        writer.serialize(entry).map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_entries<P: AsRef<Path>>(path: P, entries: &[EntryRef]) -> SccsResult<()> {
    write_entries_to(File::create(path)?, entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sccs_core::Strand;

    #[test]
    fn test_read_with_comments_and_blank_lines() {
        let data = "# seeds\nchr1\t10\t50\t+\n\nchr2\t0\t8\t-\nscaffold_9\t3\t4\t.\n";
        let entries = read_entries_from(data.as_bytes()).unwrap();

        assert_eq!(
            entries,
            vec![
                EntryRef::new("chr1", 10, 50, Strand::Forward),
                EntryRef::new("chr2", 0, 8, Strand::Reverse),
                EntryRef::new("scaffold_9", 3, 4, Strand::Unknown),
            ]
        );
    }

    #[test]
    fn test_write_format() {
        let mut out = Vec::new();
        write_entries_to(&mut out, &[EntryRef::new("chr3", 7, 19, Strand::Reverse)]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "chr3\t7\t19\t-\n");
    }

    #[test]
    fn test_malformed_lines() {
        assert!(matches!(
            read_entries_from("chr1\tten\t50\t+\n".as_bytes()),
            Err(SccsError::Parse(_))
        ));
        assert!(matches!(
            read_entries_from("chr1\t60\t50\t+\n".as_bytes()),
            Err(SccsError::Parse(_))
        ));
        assert!(matches!(
            read_entries_from("chr1\t1\t5\tx\n".as_bytes()),
            Err(SccsError::Parse(_))
        ));
    }
}
