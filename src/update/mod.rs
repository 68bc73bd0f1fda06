//! Report assembly for checked dependencies
//!
//! Turns checker results into a displayable update report: one row per
//! dependency that has something to show, accumulated column widths for
//! alignment, and check failures grouped by kind. The newer cell is the
//! style-preserving edit of the declared range; the latest cell is a fresh
//! caret range colored by the magnitude of the jump from the current range
//! floor.

use crate::domain::{CheckStatus, Dependency, DependencyType};
use crate::semver::{Part, Range, RangeEdit, UpdateDirection, VersionParts};
use colored::Colorize;

/// One table cell, kept in both plain and colored form. Width math must use
/// the plain length because color escapes inflate the byte count.
#[derive(Debug, Clone)]
pub struct Cell {
    pub plain: String,
    pub colored: String,
}

/// One displayable row of the update table
#[derive(Debug, Clone)]
pub struct UpdateRow {
    pub name: String,
    pub dep_type: DependencyType,
    /// Normalized declared range, shown in the current column
    pub current: String,
    /// Raw declared range as written in the manifest, used for patching
    pub current_raw: String,
    pub newer: Option<Cell>,
    pub latest: Option<Cell>,
}

/// Accumulated column widths, in plain characters
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnWidths {
    pub name: usize,
    pub current: usize,
    pub newer: usize,
    pub latest: usize,
}

impl ColumnWidths {
    fn absorb(&mut self, row: &UpdateRow) {
        self.name = self.name.max(row.name.len());
        self.current = self.current.max(row.current.len());
        if let Some(cell) = &row.newer {
            self.newer = self.newer.max(cell.plain.len());
        }
        if let Some(cell) = &row.latest {
            self.latest = self.latest.max(cell.plain.len());
        }
    }
}

/// Check failures grouped by kind, reported after the table
#[derive(Debug, Clone, Default)]
pub struct CheckErrors {
    pub invalid: Vec<String>,
    pub complex: Vec<String>,
    pub network: Vec<String>,
}

impl CheckErrors {
    pub fn is_empty(&self) -> bool {
        self.invalid.is_empty() && self.complex.is_empty() && self.network.is_empty()
    }
}

/// Assembled update report
#[derive(Debug, Clone)]
pub struct UpdateReport {
    pub rows: Vec<UpdateRow>,
    pub widths: ColumnWidths,
    pub errors: CheckErrors,
}

impl UpdateReport {
    pub fn has_newer(&self) -> bool {
        self.widths.newer > 0
    }

    pub fn has_latest(&self) -> bool {
        self.widths.latest > 0
    }
}

/// Build the report from checked dependencies. `prerelease` is the global
/// inclusion flag; a range that itself names a prerelease opts in locally.
pub fn build_report(deps: &[Dependency], prerelease: bool) -> UpdateReport {
    let mut rows = Vec::new();
    let mut widths = ColumnWidths::default();
    let mut errors = CheckErrors::default();

    for dep in deps {
        match dep.status {
            CheckStatus::InvalidRange => {
                errors.invalid.push(dep.name.clone());
                continue;
            }
            CheckStatus::ComplexRange => {
                errors.complex.push(dep.name.clone());
                continue;
            }
            CheckStatus::NetworkError => {
                errors.network.push(dep.name.clone());
                continue;
            }
            CheckStatus::Pending => continue,
            CheckStatus::Resolved => {}
        }

        let range = match Range::parse(&dep.current) {
            Ok(range) => range,
            Err(_) => continue,
        };

        let newer = dep.newer.as_deref().and_then(|newer_text| {
            let target = VersionParts::parse(newer_text).ok()?;
            let include_pre =
                prerelease || range.names_prerelease() || target.is_prerelease();
            let edit = range.update_toward(&target, include_pre)?;
            if !edit.is_changed() {
                return None;
            }
            Some(Cell {
                plain: edit.text(),
                colored: color_edit(&edit),
            })
        });

        let latest = dep.latest.as_deref().and_then(|latest_text| {
            let target = VersionParts::parse(latest_text).ok()?;
            let floor = range.floor()?;
            let colored = color_version(&floor, &target)?;
            Some(Cell {
                plain: format!("^{}", latest_text),
                colored: format!("^{}", colored),
            })
        });

        if newer.is_none() && latest.is_none() {
            continue;
        }

        let row = UpdateRow {
            name: dep.name.clone(),
            dep_type: dep.dep_type,
            current: dep.current.clone(),
            current_raw: dep.current_raw.clone(),
            newer,
            latest,
        };
        widths.absorb(&row);
        rows.push(row);
    }

    UpdateReport {
        rows,
        widths,
        errors,
    }
}

fn release(major: u64, minor: u64, patch: u64) -> VersionParts {
    VersionParts {
        major,
        minor,
        patch,
        prerelease: Vec::new(),
        build: Vec::new(),
    }
}

/// Color `next` by how far it jumps past `prev`: next major reddens the
/// whole version, a minor jump colors from the minor component, a patch
/// jump colors only the patch suffix, and a downgrade is black on red.
/// Equal versions yield `None` and the cell is omitted.
pub fn color_version(prev: &VersionParts, next: &VersionParts) -> Option<String> {
    let full = next.to_string();

    let past = |bound: Option<VersionParts>| bound.is_some_and(|b| *next >= b);

    if past(prev.major.checked_add(1).map(|m| release(m, 0, 0))) {
        return Some(full.red().to_string());
    }

    if past(prev.minor.checked_add(1).map(|m| release(prev.major, m, 0))) {
        let head = format!("{}.", next.major);
        let tail = &full[head.len()..];
        let tail = if prev.major == 0 {
            tail.red()
        } else {
            tail.cyan()
        };
        return Some(format!("{}{}", head, tail));
    }

    if past(
        prev.patch
            .checked_add(1)
            .map(|p| release(prev.major, prev.minor, p)),
    ) {
        let head = format!("{}.{}.", next.major, next.minor);
        let tail = &full[head.len()..];
        let tail = if prev.minor == 0 {
            tail.red()
        } else if prev.major == 0 {
            tail.cyan()
        } else {
            tail.green()
        };
        return Some(format!("{}{}", head, tail));
    }

    if next < prev {
        return Some(full.black().on_red().to_string());
    }

    None
}

/// Color the changed suffix of a computed range edit. The untouched
/// operator or hyphen bound stays plain; the edited base is colored from
/// the first changed component onward.
fn color_edit(edit: &RangeEdit) -> String {
    let update = &edit.update;
    let changed = match update.changed {
        Some(changed) => changed,
        None => return edit.text(),
    };

    let body = if update.direction == UpdateDirection::Backward {
        update.text.black().on_red().to_string()
    } else {
        let head_len = changed_head_len(update, changed.part, changed.pre_index);
        let (head, tail) = update.text.split_at(head_len.min(update.text.len()));
        let tail = match changed.part {
            Part::Major => tail.red(),
            Part::Minor => {
                if update.base.major.floor() == 0 {
                    tail.red()
                } else {
                    tail.cyan()
                }
            }
            Part::Patch => {
                if update.base.minor.floor() == 0 {
                    tail.red()
                } else if update.base.major.floor() == 0 {
                    tail.cyan()
                } else {
                    tail.green()
                }
            }
            Part::Prerelease | Part::Build => tail.yellow(),
        };
        format!("{}{}", head, tail)
    };

    format!("{}{}{}", edit.prefix, body, edit.suffix)
}

/// Length of the unchanged prefix of the serialized base text, so coloring
/// starts exactly at the first changed component.
fn changed_head_len(update: &crate::semver::RangeBaseUpdate, part: Part, pre_index: usize) -> usize {
    let base = &update.base;
    match part {
        Part::Major => 0,
        Part::Minor => format!("{}.", base.major).len(),
        Part::Patch => format!("{}.{}.", base.major, base.minor).len(),
        Part::Prerelease | Part::Build => {
            // A prerelease edit toward a release drops the suffix entirely;
            // the whole rewritten base is then the changed portion.
            if !base.names_prerelease() {
                return 0;
            }
            let mut head = format!("{}", base.major);
            if base.include_minor {
                head.push_str(&format!(".{}", base.minor));
            }
            if base.include_patch {
                head.push_str(&format!(".{}", base.patch));
            }
            head.push('-');
            for identifier in &base.prerelease[..pre_index] {
                head.push_str(&identifier.to_string());
                head.push('.');
            }
            head.len()
        }
    }
}
