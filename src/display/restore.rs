//! Restore and search display formatting

use super::format_size;
use crate::backup::{FileState, RestorePreview, RestoreResult};
use crate::locator::SearchPlan;

fn format_state(label: &str, state: &FileState) -> String {
    if !state.exists {
        return format!("  {:<8} {} (missing)\n", label, state.path.display());
    }
    let modified = state
        .modified
        .map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "  {:<8} {} ({}, modified {})\n",
        label,
        state.path.display(),
        format_size(state.size),
        modified
    )
}

/// Format what a restore would do
pub fn format_preview(preview: &RestorePreview) -> String {
    let mut output = String::from("Restore preview\n");
    output.push_str(&format_state("Target:", &preview.target));
    output.push_str(&format_state("Backup:", &preview.backup));

    if !preview.can_restore {
        output.push_str("\nCannot restore: backup is missing or is the target itself.\n");
        return output;
    }

    output.push_str("\nSteps:\n");
    match &preview.preserved_path {
        Some(path) => output.push_str(&format!(
            "  1. Copy current target to {}\n",
            path.display()
        )),
        None => output.push_str("  1. Target does not exist; nothing to preserve\n"),
    }
    output.push_str("  2. Copy backup over target\n");
    if preview.will_dispose {
        output.push_str("  3. Move backup to trash\n");
    }

    output
}

/// Format the outcome of a restore
pub fn format_restore_result(result: &RestoreResult) -> String {
    let mut output = if result.success {
        format!("✓ {}\n", result.message)
    } else {
        format!("✗ {}\n", result.message)
    };

    if let Some(path) = &result.preserved_path {
        output.push_str(&format!("  Preserved: {}\n", path.display()));
    }
    if let Some(path) = &result.disposed_path {
        output.push_str(&format!("  Trashed:   {}\n", path.display()));
    }

    output
}

/// Format the locator's search plan
pub fn format_search_plan(plan: &SearchPlan) -> String {
    let mut output = format!("Search plan for {}\n", plan.target.display());

    output.push_str("Same directory:\n");
    for probe in &plan.same_directory {
        let mark = if probe.exists { "found" } else { "-" };
        output.push_str(&format!("  [{:>5}] {}\n", mark, probe.path.display()));
    }

    if !plan.ancestors.is_empty() {
        output.push_str("Ancestors:\n");
        for ancestor in &plan.ancestors {
            output.push_str(&format!(
                "  level {}: {} ({} match{})\n",
                ancestor.level,
                ancestor.directory.display(),
                ancestor.matches.len(),
                if ancestor.matches.len() == 1 { "" } else { "es" }
            ));
            for path in &ancestor.matches {
                output.push_str(&format!("    {}\n", path.display()));
            }
        }
    }

    match plan.winner() {
        Some(winner) => output.push_str(&format!("Winner: {}\n", winner.display())),
        None => output.push_str("Winner: none\n"),
    }

    output
}
