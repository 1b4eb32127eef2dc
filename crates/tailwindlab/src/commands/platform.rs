//! Platform command - show what release binary this host needs

use crate::output::{print_json, print_text};
use anyhow::Result;
use serde::Serialize;
use tailwindlab_tailwind::identify;

#[derive(Debug, Serialize)]
struct PlatformInfo {
    os: &'static str,
    arch: &'static str,
    binary: String,
}

/// Execute `tailwindlab platform`
pub fn run(json: bool) -> Result<()> {
    let platform = identify()?;
    let info = PlatformInfo {
        os: platform.os.tag(),
        arch: platform.arch.tag(),
        binary: platform.binary_name()?,
    };

    if json {
        print_json(&info)?;
    } else {
        print_text(&format!("OS:     {}", info.os))?;
        print_text(&format!("Arch:   {}", info.arch))?;
        print_text(&format!("Binary: {}", info.binary))?;
    }

    Ok(())
}
