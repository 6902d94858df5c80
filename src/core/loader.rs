use crate::domain::model::Participant;
use crate::utils::error::{Result, SantaError};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;

pub const FIELD_NAMES: [&str; 5] = ["email", "first_name", "last_name", "family", "category"];

/// Parses `email;first_name;last_name;family;category` records.
///
/// Lines starting with `#` are comments and blank lines are skipped. A first
/// row whose first column reads `email` is taken as a header.
pub fn parse_participants(data: &[u8], delimiter: u8) -> Result<Vec<Participant>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(data);

    let mut participants = Vec::new();
    let mut seen: HashMap<String, u64> = HashMap::new();
    let mut first_row = true;

    for (index, row) in reader.records().enumerate() {
        let record = row?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 1);

        // Whitespace-only lines trim down to a single empty field.
        if record.iter().all(str::is_empty) {
            continue;
        }
        if std::mem::take(&mut first_row) && is_header(&record) {
            tracing::debug!("Skipping header row at line {}", line);
            continue;
        }

        let participant = parse_record(&record, line, delimiter)?;

        let key = participant.email.to_lowercase();
        if let Some(first_line) = seen.get(&key) {
            return Err(SantaError::malformed(
                line,
                raw(&record, delimiter),
                format!(
                    "duplicate email {} (first seen on line {})",
                    participant.email, first_line
                ),
            ));
        }
        seen.insert(key, line);
        participants.push(participant);
    }

    if participants.is_empty() {
        return Err(SantaError::malformed(0, "", "no participants found"));
    }

    tracing::debug!("Parsed {} participants", participants.len());
    Ok(participants)
}

fn is_header(record: &StringRecord) -> bool {
    record
        .get(0)
        .map(|field| field.eq_ignore_ascii_case("email"))
        .unwrap_or(false)
}

fn parse_record(record: &StringRecord, line: u64, delimiter: u8) -> Result<Participant> {
    if record.len() != FIELD_NAMES.len() {
        return Err(SantaError::malformed(
            line,
            raw(record, delimiter),
            format!(
                "expected {} fields ({}), found {}",
                FIELD_NAMES.len(),
                FIELD_NAMES.join(", "),
                record.len()
            ),
        ));
    }

    for (name, value) in FIELD_NAMES.iter().zip(record.iter()) {
        if value.is_empty() {
            return Err(SantaError::malformed(
                line,
                raw(record, delimiter),
                format!("field '{}' is empty", name),
            ));
        }
    }

    let email = &record[0];
    if !looks_like_email(email) {
        return Err(SantaError::malformed(
            line,
            raw(record, delimiter),
            format!("'{}' is not an email address", email),
        ));
    }

    Ok(Participant::new(
        email,
        &record[1],
        &record[2],
        &record[3],
        &record[4],
    ))
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn raw(record: &StringRecord, delimiter: u8) -> String {
    let separator = (delimiter as char).to_string();
    record.iter().collect::<Vec<_>>().join(&separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_file() {
        let data = b"a@example.com;Alice;A;F1;P\n b@example.com ; Bob ; B ; F2 ; P \n";
        let participants = parse_participants(data, b';').unwrap();

        assert_eq!(participants.len(), 2);
        assert_eq!(participants[1].email, "b@example.com");
        assert_eq!(participants[1].first_name, "Bob");
        assert_eq!(participants[1].category, "P");
    }

    #[test]
    fn test_header_comments_and_blank_lines() {
        let data = b"email;first_name;last_name;family;category\n# adults\n\na@example.com;Alice;A;F1;P\n";
        let participants = parse_participants(data, b';').unwrap();
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].family, "F1");
    }

    #[test]
    fn test_whitespace_only_lines_are_skipped() {
        let data = b"a@example.com;A;A;F1;P\n   \nb@example.com;B;B;F2;P\n\t\n";
        let participants = parse_participants(data, b';').unwrap();
        assert_eq!(participants.len(), 2);
        assert_eq!(participants[1].email, "b@example.com");

        let headed = b"  \nemail;first_name;last_name;family;category\na@example.com;A;A;F1;P\n";
        assert_eq!(parse_participants(headed, b';').unwrap().len(), 1);
    }

    #[test]
    fn test_custom_delimiter() {
        let data = b"a@example.com,Alice,A,F1,P\nb@example.com,Bob,B,F2,P\n";
        assert_eq!(parse_participants(data, b',').unwrap().len(), 2);
    }

    #[test]
    fn test_wrong_field_count_reports_record() {
        let data = b"a@example.com;Alice;A;F1;P\nb@example.com;F2\n";
        let err = parse_participants(data, b';').unwrap_err();
        match err {
            SantaError::MalformedInput { line, record, reason } => {
                assert_eq!(line, 2);
                assert_eq!(record, "b@example.com;F2");
                assert!(reason.contains("expected 5 fields"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_field_is_rejected() {
        let data = b"a@example.com;Alice;;F1;P\n";
        let err = parse_participants(data, b';').unwrap_err();
        assert!(err.to_string().contains("last_name"));
    }

    #[test]
    fn test_duplicate_email_is_rejected() {
        let data = b"a@example.com;Alice;A;F1;P\nb@example.com;Bob;B;F2;P\nA@Example.com;Al;A;F3;P\n";
        let err = parse_participants(data, b';').unwrap_err();
        match err {
            SantaError::MalformedInput { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("first seen on line 1"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_email_and_empty_file() {
        assert!(parse_participants(b"alice;Alice;A;F1;P\n", b';').is_err());
        assert!(parse_participants(b"a@;Alice;A;F1;P\n", b';').is_err());
        let err = parse_participants(b"# nobody yet\n", b';').unwrap_err();
        assert!(err.to_string().contains("no participants"));
    }
}
