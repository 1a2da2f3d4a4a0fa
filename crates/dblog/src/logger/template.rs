use serde_json::Value as JsonValue;

/// Render a message template against record state.
///
/// Holes are written `{name}` or `{name:format}` and bound by name, so a
/// template may use any subset of the state keys in any order. A leading `@`
/// or `$` on either side is ignored when matching. `{{` and `}}` escape
/// braces. Holes with no matching key are left as written.
///
/// The only format understood is a fixed number of decimals for numbers,
/// written as a zero pattern: `{elapsed:0.00}`.
pub fn render(template: &str, state: &[(&str, JsonValue)]) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
            continue;
        }

        let Some(end) = tail.find('}') else {
            out.push_str(tail);
            rest = "";
            break;
        };
        match render_hole(&tail[1..end], state) {
            Some(rendered) => out.push_str(&rendered),
            None => out.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }

    out.push_str(rest);
    out
}

fn render_hole(hole: &str, state: &[(&str, JsonValue)]) -> Option<String> {
    let (name, format) = match hole.split_once(':') {
        Some((name, format)) => (name.trim(), Some(format.trim())),
        None => (hole.trim(), None),
    };
    let bare = strip_sigil(name);
    let (_, value) = state.iter().find(|(k, _)| strip_sigil(k) == bare)?;

    if let (Some(decimals), Some(n)) = (format.and_then(decimal_places), value.as_f64()) {
        return Some(format!("{n:.decimals$}"));
    }
    Some(display(value))
}

fn strip_sigil(name: &str) -> &str {
    name.trim_start_matches(['@', '$'])
}

fn decimal_places(format: &str) -> Option<usize> {
    let (int, frac) = format.split_once('.').unwrap_or((format, ""));
    let zeros = |s: &str| s.chars().all(|c| c == '0' || c == '#');
    (!int.is_empty() && zeros(int) && zeros(frac)).then_some(frac.len())
}

fn display(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
