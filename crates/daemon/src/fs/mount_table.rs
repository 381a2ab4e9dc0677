use std::path::Path;

use super::MountDescriptor;

/// Look up the entry mounted exactly at `target` in `/proc/self/mounts`
/// text.
///
/// Format per line: `<source> <target> <fstype> <options> <dump> <pass>`.
/// The kernel escapes whitespace in the target field as octal (`\040`
/// etc.), so fields are unescaped before comparison. When a path is
/// mounted over more than once the kernel lists entries in mount order;
/// the last match is the one currently visible.
pub(crate) fn find_entry(table: &str, target: &Path) -> Option<MountDescriptor> {
    let target = target.to_str()?;
    let mut found = None;
    for line in table.lines() {
        let mut parts = line.split_whitespace();
        let _source = parts.next()?;
        let entry_target = parts.next()?;
        let fs_type = parts.next()?;
        let options = parts.next()?;
        if unescape(entry_target) == target {
            found = Some(MountDescriptor {
                fs_type: fs_type.to_string(),
                read_only: options.split(',').any(|o| o == "ro"),
            });
        }
    }
    found
}

/// Decode the octal escapes the kernel uses for whitespace in mount
/// fields: `\040` space, `\011` tab, `\012` newline, `\134` backslash.
fn unescape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let digits: String = chars.clone().take(3).collect();
        if digits.len() == 3 && digits.chars().all(|d| ('0'..='7').contains(&d)) {
            if let Ok(code) = u8::from_str_radix(&digits, 8) {
                out.push(code as char);
                chars.nth(2);
                continue;
            }
        }
        out.push(c);
    }
    out
}
