//! Stamps the build date and time for `artrack version`.
//!
//! `ARTRACK_BUILD_DATE` / `ARTRACK_BUILD_TIME` in the environment win, so
//! packaged builds can be reproducible.

use time::format_description;
use time::OffsetDateTime;

fn stamp(var: &str, now: OffsetDateTime, description: &str) {
    println!("cargo:rerun-if-env-changed={}", var);
    let value = std::env::var(var)
        .ok()
        .or_else(|| {
            let format = format_description::parse(description).ok()?;
            now.format(&format).ok()
        })
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env={}={}", var, value);
}

fn main() {
    let now = OffsetDateTime::now_utc();
    stamp("ARTRACK_BUILD_DATE", now, "[year]-[month]-[day]");
    stamp("ARTRACK_BUILD_TIME", now, "[hour]:[minute] UTC");
}
