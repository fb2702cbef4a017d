use crate::sequence::Sequence;
use flate2::read::GzDecoder;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{line_ending, not_line_ending},
    combinator::{eof, map, opt},
    sequence::preceded,
    IResult,
};
use sccs_core::{SccsError, SccsResult};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const LINE_WIDTH: usize = 80;

/// Parse a FASTA header line
fn parse_header(input: &[u8]) -> IResult<&[u8], (&str, Option<&str>)> {
    let (input, _) = tag(b">")(input)?;
    let (input, id) = map(
        take_till(|c: u8| c == b' ' || c == b'\t' || c == b'\n' || c == b'\r'),
        |s| std::str::from_utf8(s).unwrap_or(""),
    )(input)?;
    let (input, description) = opt(preceded(
        alt((tag(b" "), tag(b"\t"))),
        map(not_line_ending, |s| std::str::from_utf8(s).unwrap_or("")),
    ))(input)?;
    let (input, _) = alt((line_ending, eof))(input)?;
    Ok((input, (id, description)))
}

/// Parse sequence lines until next header or EOF.
///
/// Alignment gap symbols are dropped so aligned inputs are profiled ungapped.
fn parse_sequence(input: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let mut sequence = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() && remaining[0] != b'>' {
        let (rest, line) =
            take_till::<_, _, nom::error::Error<_>>(|c: u8| c == b'\n' || c == b'\r')(remaining)?;
        let (rest, _) = opt(line_ending)(rest)?;

        for &c in line {
            if !c.is_ascii_whitespace() && c != b'-' && c != b'.' {
                sequence.push(c.to_ascii_uppercase());
            }
        }

        remaining = rest;
    }

    Ok((remaining, sequence))
}

/// Skip one line (used for annotation lines ahead of the first record)
fn skip_line(input: &[u8]) -> &[u8] {
    match input.iter().position(|&c| c == b'\n') {
        Some(pos) => &input[pos + 1..],
        None => &[],
    }
}

/// Parse FASTA from bytes
pub fn parse_fasta_from_bytes(data: &[u8]) -> SccsResult<Vec<Sequence>> {
    let mut sequences = Vec::new();
    let mut remaining = data;

    while !remaining.is_empty() {
        // Blank lines, comments and annotation lines (e.g. CTXSZ) are not records
        if remaining[0] != b'>' {
            remaining = skip_line(remaining);
            continue;
        }

        let (rest, (id, description)) = parse_header(remaining)
            .map_err(|_| SccsError::Parse("Failed to parse FASTA header".to_string()))?;
        if id.is_empty() {
            return Err(SccsError::Parse("FASTA record with empty identifier".to_string()));
        }

        let (rest, seq_data) = parse_sequence(rest)
            .map_err(|_| SccsError::Parse("Failed to parse FASTA sequence".to_string()))?;

        let mut seq = Sequence::from_id(id, seq_data);
        if let Some(desc) = description.map(str::trim).filter(|d| !d.is_empty()) {
            seq = seq.with_description(desc.to_string());
        }
        sequences.push(seq);

        remaining = rest;
    }

    Ok(sequences)
}

/// Parse a FASTA file into sequences (supports .gz compression)
pub fn parse_fasta<P: AsRef<Path>>(path: P) -> SccsResult<Vec<Sequence>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut buffer = Vec::new();

    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        GzDecoder::new(BufReader::new(file)).read_to_end(&mut buffer)?;
    } else {
        BufReader::new(file).read_to_end(&mut buffer)?;
    }

    let sequences = parse_fasta_from_bytes(&buffer)?;
    tracing::debug!("Parsed {} sequences from {}", sequences.len(), path.display());
    Ok(sequences)
}

/// Write sequences as FASTA, wrapping at 80 columns
pub fn write_fasta<P: AsRef<Path>>(path: P, sequences: &[Sequence]) -> SccsResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_fasta_to(&mut writer, sequences)?;
    writer.flush()?;
    Ok(())
}

pub fn write_fasta_to<W: Write>(writer: &mut W, sequences: &[Sequence]) -> SccsResult<()> {
    for seq in sequences {
        writeln!(writer, "{}", seq.header())?;
        for chunk in seq.sequence.chunks(LINE_WIDTH) {
            writer.write_all(chunk)?;
            writer.write_all(b"\n")?;
        }
    }
    Ok(())
}
