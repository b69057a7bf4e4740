use std::fs;
use std::path::Path;

use log::warn;

use crate::constants::EMPTY_SLOT;
use crate::error::{PagingError, Result};
use crate::page_table::Residency;
use crate::vm_manager::Simulation;

/// Parse a request trace: whitespace-separated process ids
///
/// Reading stops at the first token that is not a non-negative integer.
pub fn parse_requests(content: &str) -> Vec<usize> {
    let mut requests = Vec::new();
    for token in content.split_whitespace() {
        match token.parse::<usize>() {
            Ok(process) => requests.push(process),
            Err(_) => {
                warn!("Stopped reading requests at malformed token {:?}", token);
                break;
            }
        }
    }
    requests
}

pub fn read_requests<P: AsRef<Path>>(path: P) -> Result<Vec<usize>> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|source| PagingError::Io { path: path.as_ref().to_path_buf(), source })?;
    Ok(parse_requests(&content))
}

/// Render the final state
///
/// One line per process with its page table entries, then one line with
/// every physical slot in index order.
pub fn render_report(sim: &Simulation) -> Result<String> {
    let pager = sim.pager();
    let mut out = String::new();

    for process in 0..pager.table().processes() {
        let row: Vec<String> = pager
            .table()
            .row(process)?
            .iter()
            .map(|entry: &Residency| entry.to_output().to_string())
            .collect();
        out.push_str(&row.join(", "));
        out.push('\n');
    }

    for slot in pager.frames().slots() {
        let cell = match slot {
            Some(id) => {
                let page = pager.store().get(*id)?;
                format!("{},{},{}", id.process, id.page, page.last_accessed)
            }
            None => EMPTY_SLOT.to_string(),
        };
        out.push_str(&cell);
        out.push_str("; ");
    }
    out.push('\n');

    Ok(out)
}

pub fn write_report<P: AsRef<Path>>(path: P, sim: &Simulation) -> Result<()> {
    let content = render_report(sim)?;
    fs::write(path.as_ref(), content)
        .map_err(|source| PagingError::Io { path: path.as_ref().to_path_buf(), source })
}
