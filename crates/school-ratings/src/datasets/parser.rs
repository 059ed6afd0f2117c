use serde::de::DeserializeOwned;
use std::io::Read;

/// Reads every row of a CSV export. Header names map to field names and cells
/// are trimmed; blank optional cells deserialize as absent.
pub(crate) fn parse_rows<T, R>(reader: R) -> Result<Vec<T>, csv::Error>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(strip_bom(reader)?);

    csv_reader.deserialize::<T>().collect()
}

// Spreadsheet exports often start with a byte-order mark that would otherwise
// end up in the first header name.
fn strip_bom<R: Read>(mut reader: R) -> Result<std::io::Cursor<Vec<u8>>, csv::Error> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let start = if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        3
    } else {
        0
    };
    bytes.drain(..start);
    Ok(std::io::Cursor::new(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{AttendanceRow, RegistryRow};
    use std::io::Cursor;

    #[test]
    fn blank_cells_are_absent_and_unknown_columns_ignored() {
        let csv = "\u{feff}urn,name,country,phase,extra\n100001, Hill Top ,England,,ignored\n";
        let rows: Vec<RegistryRow> = parse_rows(Cursor::new(csv)).expect("rows parse");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].urn, "100001");
        assert_eq!(rows[0].name, "Hill Top");
        assert_eq!(rows[0].country.as_deref(), Some("England"));
        assert!(rows[0].phase.is_none());
    }

    #[test]
    fn missing_optional_columns_default_to_absent() {
        let csv = "urn,overall_absence_rate\n100001,4.5\n";
        let rows: Vec<AttendanceRow> = parse_rows(Cursor::new(csv)).expect("rows parse");

        assert_eq!(rows[0].overall_absence_rate.as_deref(), Some("4.5"));
        assert!(rows[0].academic_year.is_none());
        assert!(rows[0].la_absence_rate.is_none());
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let csv = "name\nHill Top\n";
        let result: Result<Vec<RegistryRow>, _> = parse_rows(Cursor::new(csv));
        assert!(result.is_err());
    }
}
