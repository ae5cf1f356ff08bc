use regex::Regex;
use std::sync::LazyLock;

static ANGLE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[\s*#]*Angle\s+(\d+)\b").expect("angle heading pattern is valid")
});

/// 取出第一个角度的完整段落（从 `Angle 1` 标题到下一个角度标题之前）
///
/// 找不到标题时返回整段角度文本。
pub fn first_angle(angles: &str) -> String {
    let headings: Vec<_> = ANGLE_HEADING.captures_iter(angles).collect();

    let first = headings
        .iter()
        .position(|caps| &caps[1] == "1")
        .and_then(|index| {
            let start = headings[index].get(0)?.start();
            let end = headings
                .get(index + 1)
                .and_then(|next| next.get(0))
                .map_or(angles.len(), |m| m.start());
            Some(&angles[start..end])
        });

    match first {
        Some(block) => block.trim().to_string(),
        None => angles.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANGLES: &str = "\
Here are three angles:

**Angle 1: The Contrarian Angle**
Hook: Everyone is wrong about AI triage.
Core Message: Speed is not the bottleneck.

**Angle 2: The How-To/Practical Angle**
Hook: Three steps to pilot AI triage.

**Angle 3: The Future-Looking/Trend Angle**
Hook: By 2030 triage will be invisible.";

    #[test]
    fn test_first_angle_block_is_extracted() {
        let angle = first_angle(ANGLES);

        assert!(angle.starts_with("**Angle 1: The Contrarian Angle**"));
        assert!(angle.contains("Core Message: Speed is not the bottleneck."));
        assert!(!angle.contains("Angle 2"));
    }

    #[test]
    fn test_markdown_heading_variant() {
        let angle = first_angle("### Angle 1 - Contrarian\nHook: A\n### Angle 2 - Practical\nHook: B");
        assert_eq!(angle, "### Angle 1 - Contrarian\nHook: A");
    }

    #[test]
    fn test_single_angle_runs_to_end() {
        let angle = first_angle("Angle 1: Only one\nHook: lonely");
        assert_eq!(angle, "Angle 1: Only one\nHook: lonely");
    }

    #[test]
    fn test_without_headings_uses_whole_text() {
        assert_eq!(first_angle("  Just write about costs.  "), "Just write about costs.");
    }
}
