use crate::model::TransactionColumn;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MappingError(String);

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl StdError for MappingError {}

/// Maps the header row of a ledger file to column positions.
///
/// Header names are normalized by trimming surrounding whitespace (and a leading byte order mark,
/// which spreadsheet exports like to add), so `" Credit "` locates the `Credit` column.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Mapping {
    headers: Vec<String>,
    header_map: HashMap<String, usize>,
}

impl Mapping {
    pub fn new<S, I>(headers: I) -> Result<Self, MappingError>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let headers: Vec<String> = headers
            .into_iter()
            .map(|s| normalize_header(s.as_ref()))
            .collect();

        let mut header_map = HashMap::with_capacity(headers.len());
        for (ix, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            if header_map.insert(header.clone(), ix).is_some() {
                return Err(MappingError(format!(
                    "Encountered a duplicate header '{header}'"
                )));
            }
        }

        Ok(Self {
            headers,
            header_map,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The position of `column` in the file, if present.
    pub fn index(&self, column: TransactionColumn) -> Option<usize> {
        self.header_map.get(column.header()).copied()
    }

    /// The required columns that this header row lacks, in file order.
    pub fn missing(&self) -> Vec<TransactionColumn> {
        TransactionColumn::ALL
            .into_iter()
            .filter(|&c| self.index(c).is_none())
            .collect()
    }
}

fn normalize_header(s: &str) -> String {
    s.trim_start_matches('\u{feff}').trim().to_string()
}
