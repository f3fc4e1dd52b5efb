//! Fixed-width receipt reflow

/// Slice `text` into lines of `width` characters
///
/// A pure fixed-width wrap: words are cut wherever the column ends. The last
/// line holds the remainder. A zero width yields the text as one line.
///
/// # Examples
///
/// ```
/// use spremote_core::receipt::reflow;
///
/// let lines = reflow::lines(&"x".repeat(45), 20);
/// let lengths: Vec<usize> = lines.iter().map(|l| l.len()).collect();
/// assert_eq!(lengths, vec![20, 20, 5]);
/// ```
pub fn lines(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return if text.is_empty() { Vec::new() } else { vec![text.to_string()] };
    }

    let chars: Vec<char> = text.chars().collect();
    chars.chunks(width).map(|chunk| chunk.iter().collect()).collect()
}

/// Reflow `text` and terminate every line with `\n`
pub fn format(text: &str, width: usize) -> String {
    lines(text, width)
        .into_iter()
        .fold(String::with_capacity(text.len() + text.len() / width.max(1) + 1), |mut acc, line| {
            acc.push_str(&line);
            acc.push('\n');
            acc
        })
}
