//! Line codec for the boat data file.
//!
//! One record per line, `name,length,kind,detail,amount`. There is no quoting
//! and no header, so a name cannot contain the delimiter.

use crate::domain::model::{Boat, Location, LocationKind, Money};
use crate::utils::error::{DecodeError, Result};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::io::{Read, Write};

pub const DELIMITER: u8 = b',';
pub const FIELD_COUNT: usize = 5;

/// csv reader configured for the data file: no headers, no quoting, extra fields tolerated.
pub fn reader<R: Read>(source: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .delimiter(DELIMITER)
        .quoting(false)
        .flexible(true)
        .from_reader(source)
}

pub fn writer<W: Write>(sink: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .delimiter(DELIMITER)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(sink)
}

/// Decodes one user-entered or stored line.
pub fn decode(line: &str) -> std::result::Result<Boat, DecodeError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let record: StringRecord = line.split(DELIMITER as char).collect();
    decode_record(&record)
}

pub fn decode_record(record: &StringRecord) -> std::result::Result<Boat, DecodeError> {
    // 換行字元會讓存檔後的記錄被拆成多行
    if let Some(field) = record.iter().find(|f| f.contains(['\r', '\n'])) {
        return Err(DecodeError::Malformed {
            message: format!("line break inside field {:?}", field),
        });
    }

    if record.len() < FIELD_COUNT {
        return Err(DecodeError::MissingField {
            found: record.len(),
        });
    }

    let name = &record[0];
    if name.is_empty() {
        return Err(DecodeError::EmptyName);
    }

    let length = parse_length(&record[1])?;

    let kind: LocationKind = record[2]
        .parse()
        .map_err(|kind| DecodeError::UnknownLocationKind { kind })?;

    let detail = &record[3];
    if detail.is_empty() {
        return Err(DecodeError::EmptyDetail);
    }
    let location = match kind {
        LocationKind::Slip => Location::Slip(parse_leading_int(detail)),
        LocationKind::Land => Location::Land(detail.chars().next().ok_or(DecodeError::EmptyDetail)?),
        LocationKind::Trailor => Location::trailor(detail),
        LocationKind::Storage => Location::Storage(parse_leading_int(detail)),
    };

    let amount_owed =
        Money::parse_decimal(&record[4]).ok_or_else(|| DecodeError::InvalidAmount {
            value: record[4].to_string(),
        })?;

    Ok(Boat::new(name, length, location, amount_owed))
}

/// Fields in file order, ready for `csv::Writer::write_record`.
pub fn encode_fields(boat: &Boat) -> [String; FIELD_COUNT] {
    let detail = match &boat.location {
        Location::Slip(n) | Location::Storage(n) => n.to_string(),
        Location::Land(bay) => bay.to_string(),
        Location::Trailor(tag) => tag.clone(),
    };
    [
        boat.name.clone(),
        boat.length.to_string(),
        boat.kind().as_str().to_string(),
        detail,
        boat.amount_owed.to_string(),
    ]
}

/// Encodes a boat as a single line, without the trailing newline.
pub fn encode(boat: &Boat) -> String {
    encode_fields(boat).join(",")
}

/// Writes every boat in the given order, one per line. Returns the number written.
pub fn write_boats<'a, W, I>(sink: W, boats: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Boat>,
{
    let mut writer = writer(sink);
    let mut count = 0;
    for boat in boats {
        writer.write_record(encode_fields(boat))?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

fn parse_length(text: &str) -> std::result::Result<u32, DecodeError> {
    match text.trim().parse::<u32>() {
        Ok(length) if length > 0 => Ok(length),
        _ => Err(DecodeError::InvalidLength {
            value: text.to_string(),
        }),
    }
}

/// atoi-style parsing: optional leading whitespace and sign, then leading digits.
/// Anything non-numeric yields 0; out-of-range values saturate.
fn parse_leading_int(text: &str) -> i32 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let limit = i64::from(i32::MAX) + 1;
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| (acc * 10 + i64::from(digit - b'0')).min(limit));

    let value = if negative { -magnitude } else { magnitude };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
