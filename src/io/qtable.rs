//! JSON persistence for learned value tables.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::agent::QTable;
use crate::error::Result;

/// Writes `table` as JSON to `path`.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] or [`crate::Error::Serialization`].
pub fn save_q_table(table: &QTable, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_q_table(table, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Reads a table previously written by [`save_q_table`].
///
/// The table is checked for internal consistency but not against any
/// environment; pass it to `QLearningAgent::load_q_table` for that.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] or [`crate::Error::Serialization`].
pub fn load_q_table(path: &Path) -> Result<QTable> {
    read_q_table(BufReader::new(File::open(path)?))
}

pub fn write_q_table(table: &QTable, writer: impl Write) -> Result<()> {
    serde_json::to_writer_pretty(writer, table)?;
    Ok(())
}

pub fn read_q_table(reader: impl Read) -> Result<QTable> {
    let table: QTable = serde_json::from_reader(reader)?;
    table.validate()?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn written_table_reads_back() {
        let mut table = QTable::zeros(24, 4);
        table.set(7, 3, -12.5);
        let mut buf = Vec::new();
        write_q_table(&table, &mut buf).expect("in-memory write");
        let back = read_q_table(buf.as_slice()).expect("valid json");
        assert_eq!(back, table);
    }

    #[test]
    fn inconsistent_table_is_rejected() {
        let json = r#"{"rows": 2, "cols": 2, "values": [0.0, 1.0, 2.0]}"#;
        assert!(matches!(
            read_q_table(json.as_bytes()),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn overflowing_shape_is_rejected() {
        let json = format!(r#"{{"rows": {}, "cols": 2, "values": []}}"#, usize::MAX);
        assert!(matches!(
            read_q_table(json.as_bytes()),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        assert!(matches!(
            read_q_table("not json".as_bytes()),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn save_and_load_through_a_file() {
        let path = std::env::temp_dir().join(format!("qtable_{}.json", std::process::id()));
        let table = QTable::zeros(3, 2);
        save_q_table(&table, &path).expect("writable temp dir");
        let back = load_q_table(&path).expect("file just written");
        std::fs::remove_file(&path).ok();
        assert_eq!(back, table);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = Path::new("/nonexistent/dir/qtable.json");
        assert!(matches!(load_q_table(path), Err(Error::Io(_))));
    }
}
