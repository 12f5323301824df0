//! Simple line-based CLI output utilities.

/// Line width for separators.
pub const LINE_WIDTH: usize = 60;

/// Print the main header.
///
/// ```text
/// NETMON LATEST SAMPLE
/// ════════════════════════════════════════════════════════════
/// ```
pub fn print_header(title: &str) {
    println!();
    println!("{}", title);
    println!("{}", "═".repeat(LINE_WIDTH));
}

/// Print a section heading.
///
/// ```text
/// HISTORY (last 10)
/// ────────────────────────────────────────────────────────────
/// ```
pub fn print_section(title: &str) {
    println!();
    println!("{}", title);
    println!("{}", "─".repeat(LINE_WIDTH));
}

/// Format a label/value pair with the label padded to a fixed column.
pub fn field_line(label: &str, value: &str) -> String {
    format!("  {:<14} {}", format!("{}:", label), value)
}

/// Print a label/value pair.
///
/// ```text
///   CPU:           12.5%
/// ```
pub fn print_field(label: &str, value: &str) {
    println!("{}", field_line(label, value));
}

/// Print a status line.
///
/// ```text
///   ✓ Link up, traffic above health threshold
/// ```
pub fn print_status_line(icon: &str, message: &str) {
    println!("  {} {}", icon, message);
}

/// Print the closing separator.
pub fn print_footer() {
    println!("{}", "═".repeat(LINE_WIDTH));
}

/// Status icons
pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const FAILURE: &str = "✗";
    pub const WARNING: &str = "⚠";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_line_aligns_values() {
        assert_eq!(field_line("CPU", "1%"), "  CPU:           1%");
        assert_eq!(
            field_line("CPU", "1%").find('1'),
            field_line("Latency", "1%").find('1')
        );
    }
}
