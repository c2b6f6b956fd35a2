use rustc_hash::FxHashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessionError {
    #[error("Error reading accession file {}: {source}.", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed record at line {line}: expected {expected} tab-separated fields, found {actual}.")]
    MalformedRecord { line: usize, expected: usize, actual: usize },
}

pub type AccessionResult<T> = Result<T, AccessionError>;

/// Accession, version, and taxid columns of the matched records, one
/// entry per matched accession, in file order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AccessionMatches {
    pub ids: Vec<String>,
    pub versions: Vec<String>,
    pub taxids: Vec<String>,
}

impl AccessionMatches {
    pub fn len(&self) -> usize { self.ids.len() }
    pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.ids
            .iter()
            .zip(&self.versions)
            .zip(&self.taxids)
            .map(|((id, version), taxid)| {
                (id.as_str(), version.as_str(), taxid.as_str())
            })
    }

    fn push(&mut self, id: &str, version: &str, taxid: &str) {
        self.ids.push(id.to_string());
        self.versions.push(version.to_string());
        self.taxids.push(taxid.to_string());
    }
}

const RECORD_FIELDS: usize = 3;

/// Looks up accessions in a tab-separated `accession, version, taxid`
/// table, e.g. NCBI's `accession2taxid` files.
///
/// Only the first record of each requested accession is kept. Reading
/// stops as soon as every requested accession has been found.
pub fn match_accessions(
    accession_ids: &FxHashSet<String>,
    path: impl AsRef<Path>,
) -> AccessionResult<AccessionMatches> {
    let path = path.as_ref();
    let mut matches = AccessionMatches::default();
    if accession_ids.is_empty() {
        return Ok(matches);
    }

    let io_error = |source: std::io::Error| AccessionError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_error)?);
    let mut remaining: FxHashSet<&str> =
        accession_ids.iter().map(String::as_str).collect();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.map_err(io_error)?;
        let line = line.trim_end_matches('\r');
        let id = line.split('\t').next().unwrap_or_default();
        if !remaining.remove(id) {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < RECORD_FIELDS {
            return Err(AccessionError::MalformedRecord {
                line: line_idx + 1,
                expected: RECORD_FIELDS,
                actual: fields.len(),
            });
        }
        matches.push(fields[0], fields[1], fields[2]);

        if remaining.is_empty() {
            break;
        }
    }

    tracing::debug!(
        path = %path.display(),
        requested = accession_ids.len(),
        matched = matches.len(),
        "matched accessions"
    );
    Ok(matches)
}
