//! Text rendering for diagnostics.
//!
//! The injector reports failures in terms of Rust type names, which are
//! long and full of module paths. These helpers turn them into something a
//! person can scan: short names, scope chains and "did you mean?" hints.

/// Marker the compiler uses for closure types in `type_name` output.
const CLOSURE: &str = "{{closure}}";

/// Joins a chain of names with arrows.
///
/// Used for the list of injectors a lookup walked through, youngest first.
///
/// # Examples
/// ```
/// use wasil_support::rendering::render_chain;
///
/// let chain = ["request", "session", "app"];
/// assert_eq!(render_chain(&chain), "request → session → app");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    let mut rendered = String::new();
    for (i, link) in chain.iter().enumerate() {
        if i > 0 {
            rendered.push_str(" → ");
        }
        rendered.push_str(link.as_ref());
    }
    rendered
}

/// Strips module paths from every path inside a type name.
///
/// Generic arguments, tuples, references and fn pointers keep their shape.
/// A closure keeps the name of the function that defines it, since
/// `{{closure}}` alone says nothing.
///
/// ```
/// use wasil_support::rendering::shorten_type_name;
///
/// assert_eq!(shorten_type_name("my_app::services::UserService"), "UserService");
/// assert_eq!(
///     shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>"),
///     "Arc<dyn Logger>"
/// );
/// assert_eq!(
///     shorten_type_name("my_app::handlers::index::{{closure}}"),
///     "index::{{closure}}"
/// );
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut shortened = String::with_capacity(full_name.len());
    let mut segment = String::new();
    let mut rest = full_name;

    while let Some(ch) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix("::") {
            if tail.starts_with(CLOSURE) {
                segment.push_str("::");
            } else {
                segment.clear();
            }
            rest = tail;
            continue;
        }

        rest = &rest[ch.len_utf8()..];
        if is_delimiter(ch) {
            shortened.push_str(&segment);
            shortened.push(ch);
            segment.clear();
        } else {
            segment.push(ch);
        }
    }

    shortened.push_str(&segment);
    shortened
}

fn is_delimiter(ch: char) -> bool {
    matches!(ch, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' | '*')
}

/// Ranks registered type names by how likely they were meant instead of
/// `requested`, best first, at most `max_suggestions` of them.
///
/// The strongest signal is the same short name under another path (two
/// `Config` types in different modules). Then substring matches on short
/// names, then a shared prefix of at least three characters. The requested
/// name itself is never suggested.
pub fn suggest_similar(
    requested: &str,
    available: &[&str],
    max_suggestions: usize,
) -> Vec<String> {
    let wanted = shorten_type_name(requested).to_lowercase();

    let mut scored: Vec<(usize, &str)> = available
        .iter()
        .copied()
        .filter(|name| *name != requested)
        .filter_map(|name| {
            let short = shorten_type_name(name).to_lowercase();
            if short == wanted {
                return Some((100, name));
            }
            if short.contains(&wanted) || wanted.contains(&short) {
                return Some((80, name));
            }
            let prefix = short
                .chars()
                .zip(wanted.chars())
                .take_while(|(a, b)| a == b)
                .count();
            (prefix >= 3).then(|| (prefix.min(7) * 10, name))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored.dedup_by(|a, b| a.1 == b.1);
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(_, name)| name.to_string())
        .collect()
}
