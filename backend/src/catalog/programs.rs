//! JWST observation-program table.
//!
//! A distilled TrExoLiSTS-style CSV of hosts with approved or archived JWST
//! time-series programs. Hosts appearing here drive the prior-observation
//! provenance flag on resolved targets.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::catalog::aliases::normalize_name;

/// One JWST program row.
#[derive(Debug, Clone, Deserialize)]
pub struct JwstProgram {
    /// Host star name as listed by the program (often unnormalized)
    pub host: String,
    pub ra: f64,
    pub dec: f64,
    pub program: String,
    pub instrument: String,
    pub status: String,
}

/// Load the program table from CSV. Rows starting with '#' are comments.
pub fn load_programs(path: &Path) -> anyhow::Result<Vec<JwstProgram>> {
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open program table {}", path.display()))?;

    let mut programs = Vec::new();
    for record in reader.deserialize() {
        let program: JwstProgram =
            record.with_context(|| format!("bad program row in {}", path.display()))?;
        programs.push(program);
    }
    Ok(programs)
}

/// Distinct normalized host names with at least one program.
pub fn jwst_hosts(programs: &[JwstProgram]) -> HashSet<String> {
    programs
        .iter()
        .map(|p| normalize_name(&p.host))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_table(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_programs() {
        let file = write_table(
            "host,ra,dec,program,instrument,status\n\
             WASP-39,217.32660,-3.44450,ERS 1366,NIRSpec,Archived\n\
             # a comment row\n\
             HATP11,297.71010,48.08620,GTO 1274,NIRISS,Implementation\n",
        );
        let programs = load_programs(file.path()).unwrap();
        assert_eq!(programs.len(), 2);
        assert_eq!(programs[0].host, "WASP-39");
        assert_eq!(programs[1].program, "GTO 1274");
    }

    #[test]
    fn test_jwst_hosts_are_normalized() {
        let file = write_table(
            "host,ra,dec,program,instrument,status\n\
             HATP11,297.71010,48.08620,GTO 1274,NIRISS,Implementation\n\
             GL486,191.96040,9.75190,GO 1981,NIRSpec,Archived\n",
        );
        let programs = load_programs(file.path()).unwrap();
        let hosts = jwst_hosts(&programs);
        assert!(hosts.contains("HAT-P-11"));
        assert!(hosts.contains("GJ 486"));
        assert!(!hosts.contains("HATP11"));
    }

    #[test]
    fn test_load_programs_rejects_malformed_row() {
        let file = write_table("host,ra,dec,program,instrument,status\nWASP-39,not-a-number,-3.4,X,Y,Z\n");
        assert!(load_programs(file.path()).is_err());
    }
}
