//! Format-preserving manifest patching and backup
//!
//! Updates are applied as text replacements, never by re-serializing the
//! JSON, so key order, indentation and unrelated formatting survive. Each
//! replacement is scoped to the brace-delimited body of the section that
//! declared the dependency, so a package listed in both `dependencies` and
//! `devDependencies` is only touched where the update belongs. A backup
//! copy is written before any write-back; if the backup fails, the
//! write-back never happens.

use crate::domain::DependencyType;
use crate::error::ManifestError;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// One range replacement to apply to the manifest text
#[derive(Debug, Clone)]
pub struct RangePatch {
    pub dep_type: DependencyType,
    pub name: String,
    /// Range exactly as currently written in the manifest
    pub old: String,
    /// Replacement range text
    pub new: String,
}

impl RangePatch {
    pub fn new(
        dep_type: DependencyType,
        name: impl Into<String>,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Self {
        Self {
            dep_type,
            name: name.into(),
            old: old.into(),
            new: new.into(),
        }
    }
}

/// Backup file path: `.bak` slips in before the final extension
/// (`package.json` becomes `package.bak.json`); a name without an extension
/// gets `.bak.json` appended.
pub fn backup_path(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(extension) => path.with_extension(format!("bak.{}", extension)),
        None => {
            let mut name = path.as_os_str().to_os_string();
            name.push(".bak.json");
            PathBuf::from(name)
        }
    }
}

/// Copy the manifest to its backup path before rewriting.
pub fn write_backup(path: &Path) -> Result<PathBuf, ManifestError> {
    let backup = backup_path(path);
    fs::copy(path, &backup).map_err(|e| ManifestError::backup_error(&backup, e))?;
    Ok(backup)
}

/// Write the patched manifest content back.
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    fs::write(path, content).map_err(|e| ManifestError::write_error(path, e))
}

/// Patch the manifest on disk: back it up first (unless opted out), apply
/// the patches to `content` and write the result back. A failed backup
/// aborts before anything is written, leaving the manifest untouched.
pub fn update_manifest(
    path: &Path,
    content: &str,
    patches: &[RangePatch],
    backup: bool,
) -> Result<(), ManifestError> {
    if backup {
        write_backup(path)?;
    }
    let patched = patch_manifest(content, patches)?;
    write_manifest(path, &patched)
}

/// Apply all patches to the manifest text, each scoped to its section.
pub fn patch_manifest(content: &str, patches: &[RangePatch]) -> Result<String, ManifestError> {
    let mut patched = content.to_string();
    for patch in patches {
        patched = apply_patch(&patched, patch)?;
    }
    Ok(patched)
}

fn apply_patch(content: &str, patch: &RangePatch) -> Result<String, ManifestError> {
    let section = patch.dep_type.manifest_key();
    let span = section_span(content, section)
        .ok_or_else(|| ManifestError::patch_target_not_found(&patch.name, section))?;

    let pattern = format!(
        r#"("{}"\s*:\s*)"{}""#,
        regex::escape(&patch.name),
        regex::escape(&patch.old)
    );
    // The pattern is built from escaped literals only.
    let re = Regex::new(&pattern).expect("escaped literal pattern");

    let body = &content[span.clone()];
    let replaced = re.replace(body, |caps: &regex::Captures| {
        format!(r#"{}"{}""#, &caps[1], patch.new)
    });

    match replaced {
        std::borrow::Cow::Borrowed(_) => Err(ManifestError::patch_target_not_found(
            &patch.name,
            section,
        )),
        std::borrow::Cow::Owned(body) => Ok(format!(
            "{}{}{}",
            &content[..span.start],
            body,
            &content[span.end..]
        )),
    }
}

/// Byte span of the brace-delimited object following `"section":`, exclusive
/// of the braces. The scanner is string-aware so braces inside quoted values
/// never unbalance the count.
fn section_span(content: &str, section: &str) -> Option<std::ops::Range<usize>> {
    let key = format!("\"{}\"", section);
    let key_at = content.find(&key)?;
    let after_key = &content[key_at + key.len()..];

    let colon = after_key.find(':')?;
    let open = after_key[colon..].find('{')? + colon;
    let body_start = key_at + key.len() + open + 1;

    let mut depth = 1usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in content[body_start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(body_start..body_start + offset);
                }
            }
            _ => {}
        }
    }

    None
}
