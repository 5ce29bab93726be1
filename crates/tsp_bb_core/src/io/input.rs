use std::{fs, io::Read, path::Path};

use tsp_bb_derive::New;

use crate::{CityPoint, Error, Result};

/// One parsed input record: integer label plus planar coordinates. Input
/// order matters: the first record becomes the anchor city.
#[derive(Clone, Copy, Debug, New)]
pub struct CityRecord {
    pub id: u32,
    pub point: CityPoint,
}

/// Reads city records from `path`, or from stdin when no path is given.
pub fn read_cities(path: Option<&Path>) -> Result<Vec<CityRecord>> {
    let text = match path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    parse_cities(&text)
}

/// Parses `<id> <x> <y>` lines. Lines not starting with an ASCII digit are
/// headers or comments and are skipped; a digit-leading line that does not
/// parse fails the whole load.
pub(crate) fn parse_cities(input: &str) -> Result<Vec<CityRecord>> {
    let mut records = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        if !line.as_bytes().first().is_some_and(u8::is_ascii_digit) {
            continue;
        }

        let mut parts = line.split_whitespace();
        let (Some(id_raw), Some(x_raw), Some(y_raw), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::invalid_input(format!(
                "Line {}: expected '<id> <x> <y>' but got: {line}",
                idx + 1
            )));
        };

        let id: u32 = id_raw.parse().map_err(|_| {
            Error::invalid_input(format!("Line {}: invalid city id: {id_raw}", idx + 1))
        })?;
        let x: f64 = x_raw.parse().map_err(|_| {
            Error::invalid_input(format!("Line {}: invalid x coordinate: {x_raw}", idx + 1))
        })?;
        let y: f64 = y_raw.parse().map_err(|_| {
            Error::invalid_input(format!("Line {}: invalid y coordinate: {y_raw}", idx + 1))
        })?;

        let point = CityPoint::new(x, y);
        if !point.is_valid() {
            return Err(Error::invalid_input(format!(
                "Line {}: non-finite coordinates: {line}",
                idx + 1
            )));
        }

        records.push(CityRecord::new(id, point));
    }

    if records.is_empty() {
        return Err(Error::invalid_input("No city records found in input."));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::parse_cities;

    #[test]
    fn parse_cities_skips_header_and_comment_lines() {
        let input = concat!(
            "NAME : tiny\n",
            "COMMENT : three cities\n",
            "NODE_COORD_SECTION\n",
            "1 0.0 0.0\n",
            "2 10.5 0.0\n",
            "3 0.0 -4.25\n",
            "EOF\n",
        );
        let records = parse_cities(input).expect("parse");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[2].point.y, -4.25);
    }

    #[test]
    fn first_record_is_kept_first_for_the_anchor() {
        let records = parse_cities("7 1.0 2.0\n3 0.0 0.0\n9 5.0 5.0\n").expect("parse");
        assert_eq!(records[0].id, 7);
    }

    #[test]
    fn parse_cities_rejects_wrong_field_count() {
        let err = parse_cities("1 2.0\n").expect_err("two fields should fail");
        assert!(err.to_string().contains("expected '<id> <x> <y>'"));

        let err = parse_cities("1 2.0 3.0 4.0\n").expect_err("four fields should fail");
        assert!(err.to_string().contains("expected '<id> <x> <y>'"));
    }

    #[test]
    fn parse_cities_rejects_non_numeric_fields() {
        let err = parse_cities("1 abc 3.0\n").expect_err("bad x should fail");
        assert!(err.to_string().contains("invalid x coordinate"));
    }

    #[test]
    fn parse_cities_rejects_non_finite_coordinates() {
        let err = parse_cities("1 nan 3.0\n").expect_err("nan should fail");
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn parse_cities_rejects_empty_input() {
        let err = parse_cities("HEADER ONLY\n").expect_err("no records should fail");
        assert!(err.to_string().contains("No city records"));
    }
}
