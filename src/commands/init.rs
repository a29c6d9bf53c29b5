use crate::config::AuditProfile;
use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG_FILE: &str = "archmap.toml";

const HEADER: &str = "\
# archmap audit profile.
#
# Every value has a documented default; delete what you do not override.
# The composite-score constants and risk weights are policy decisions:
# change them deliberately, not to silence a finding. Accepted findings
# belong in [[justifications]] with a reason, keyed by rule/file/line.

";

pub fn init_config(force: bool) -> Result<()> {
    let path = Path::new(CONFIG_FILE);
    if path.exists() && !force {
        anyhow::bail!("{CONFIG_FILE} already exists (use --force to overwrite)");
    }

    let profile = AuditProfile::strict();
    let body = toml::to_string_pretty(&profile)?;
    fs::write(path, format!("{HEADER}{body}"))?;
    println!("wrote {CONFIG_FILE}");
    Ok(())
}
