//! Build script compiling the C shims:
//! - `selinux_log.c` expands libselinux's printf-style log messages
//!   (feature `selinux`)
//! - `pam_syslog_stub.c` stands in for libpam's `pam_syslog` in unit tests
//!   (debug builds only)

use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=csrc/selinux_log.c");
    println!("cargo:rerun-if-changed=csrc/pam_syslog_stub.c");

    if env::var_os("CARGO_FEATURE_SELINUX").is_some() {
        let mut shim = cc::Build::new();
        shim.file("csrc/selinux_log.c").warnings(true);
        if env::var_os("CARGO_FEATURE_AUDIT").is_some() {
            shim.define("ROOTOK_AUDIT", None);
        }
        shim.try_compile("rootok_selinux_log")?;
    }

    if env::var_os("CARGO_CFG_DEBUG_ASSERTIONS").is_some() {
        cc::Build::new()
            .file("csrc/pam_syslog_stub.c")
            .warnings(true)
            .try_compile("rootok_pam_syslog_stub")?;
    }

    Ok(())
}
