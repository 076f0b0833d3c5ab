//! # Shape DSL Host-Language Validation (§6.7)
//!
//! The Shape DSL (§4.6) itself has no parser path — it is a Rust builder
//! API called directly. What §6.7 and §8.2 scenario 8 describe is a
//! *host-language* front door onto it: a user-authored JavaScript-ish
//! script that imports the DSL and exports a Shape-producing function,
//! submitted through the same [`EvalRequest`](pipeline_types::EvalRequest)
//! as OpenSCAD source but tagged `language: "javascript"`.
//!
//! Embedding a full JavaScript engine to execute that script is out of
//! scope here — no JS runtime crate is grounded anywhere in this
//! workspace's lineage, and the spec itself frames "the hard engineering"
//! as the language-plus-geometry pipeline, with everything else plumbing.
//! What we *do* implement is the static surface check §6.7 actually
//! specifies: a fixed allow-list of importable module names, checked
//! before any execution would happen, surfacing `logic.forbidden_import`
//! with the offending import's line — exactly what scenario 8 exercises —
//! plus the sibling `logic.missing_export`/`logic.missing_return`/
//! `logic.invalid_export_type` checks §6.5 lists alongside it.

use pipeline_types::EnhancedError;

/// Static-analysis findings for a Shape DSL script, per §6.7/§6.5.
///
/// This is a line-oriented scan, not a JavaScript parse: it looks for the
/// textual shapes `import ... from '...'`, `import '...'`, and
/// `export default ...` rather than building a real AST. It is deliberately
/// conservative — on anything it can't confidently classify it reports
/// nothing rather than a false positive.
pub fn validate(code: &str, allow_list: &[String]) -> Vec<EnhancedError> {
    let mut errors = Vec::new();

    for (idx, line) in code.lines().enumerate() {
        let line_no = (idx + 1) as u32;
        let trimmed = line.trim_start();
        let indent = (line.len() - trimmed.len()) as u32;
        if let Some(rest) = trimmed.strip_prefix("import ") {
            if let Some(module) = extract_module_name(rest) {
                if !allow_list.iter().any(|allowed| allowed == &module) {
                    errors.push(
                        EnhancedError::new(
                            "logic.forbidden_import",
                            format!("import of module '{module}' is not on the configured allow-list"),
                        )
                        .with_location(line_no, indent + 1),
                    );
                }
            }
        }
    }

    match find_default_export(code) {
        None => {
            errors.push(EnhancedError::new(
                "logic.missing_export",
                "script must `export default` a function returning a Shape",
            ));
        }
        Some(ExportedValue::NonFunction { line }) => {
            errors.push(
                EnhancedError::new(
                    "logic.invalid_export_type",
                    "default export must be a function returning a Shape, not a plain value",
                )
                .with_location(line, 1),
            );
        }
        Some(ExportedValue::Function { body }) => {
            if !body.contains("return") {
                errors.push(EnhancedError::new(
                    "logic.missing_return",
                    "exported function has no `return` statement",
                ));
            }
        }
    }

    errors
}

enum ExportedValue {
    Function { body: String },
    NonFunction { line: u32 },
}

/// Pull the module name out of `module from '<name>';` or a bare
/// `'<name>';` side-effect import. Returns `None` for anything that
/// doesn't parse as either shape (e.g. a destructured import whose
/// `from` clause is split across lines — deliberately conservative).
fn extract_module_name(rest: &str) -> Option<String> {
    let source = if let Some(from_idx) = rest.find("from") {
        &rest[from_idx + 4..]
    } else {
        rest
    };
    let bytes = source.as_bytes();
    let quote_start = source.find(|c| c == '\'' || c == '"')?;
    let quote_char = bytes[quote_start] as char;
    let after = &source[quote_start + 1..];
    let quote_end = after.find(quote_char)?;
    Some(after[..quote_end].to_string())
}

/// Locate `export default <expr>` and classify `<expr>` as a function or
/// not, on a best-effort textual basis.
fn find_default_export(code: &str) -> Option<ExportedValue> {
    let marker = "export default";
    let start = code.find(marker)?;
    let (line_no, _) = line_and_column_of(code, start);
    let after = code[start + marker.len()..].trim_start();

    if after.starts_with("function") || after.starts_with("async function") || looks_like_arrow_fn(after) {
        return Some(ExportedValue::Function { body: after.to_string() });
    }
    // A bare identifier could still name a function declared elsewhere in
    // the file; treat identifier references as functions rather than
    // guessing wrong, since we have no symbol table here.
    if after.chars().next().map(|c| c.is_alphabetic() || c == '_').unwrap_or(false)
        && !after.starts_with('{')
        && !after.starts_with('[')
    {
        return Some(ExportedValue::Function { body: code.to_string() });
    }
    Some(ExportedValue::NonFunction { line: line_no })
}

fn looks_like_arrow_fn(s: &str) -> bool {
    s.starts_with('(') || s.find("=>").map(|i| i < 80).unwrap_or(false)
}

fn line_and_column_of(code: &str, byte_offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 1u32;
    for ch in code[..byte_offset].chars() {
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn forbidden_import_is_flagged_with_line() {
        let code = "import fs from 'fs';\nexport default function main() { return 1; }";
        let errors = validate(code, &allow(&[]));
        assert!(errors.iter().any(|e| e.code == "logic.forbidden_import" && e.line == Some(1)));
    }

    #[test]
    fn allow_listed_import_passes() {
        let code = "import { Shape } from 'openscad-shape';\nexport default function main() { return Shape.cube(10); }";
        let errors = validate(code, &allow(&["openscad-shape"]));
        assert!(errors.is_empty());
    }

    #[test]
    fn missing_export_default_is_flagged() {
        let code = "const x = 1;";
        let errors = validate(code, &allow(&[]));
        assert!(errors.iter().any(|e| e.code == "logic.missing_export"));
    }

    #[test]
    fn non_function_export_is_flagged() {
        let code = "export default 42;";
        let errors = validate(code, &allow(&[]));
        assert!(errors.iter().any(|e| e.code == "logic.invalid_export_type"));
    }

    #[test]
    fn function_without_return_is_flagged() {
        let code = "export default function main() { const x = 1; }";
        let errors = validate(code, &allow(&[]));
        assert!(errors.iter().any(|e| e.code == "logic.missing_return"));
    }
}
