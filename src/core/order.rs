//! Final boot order.
//!
//! Intended order:
//!
//! 1. nerf default entry
//! 2. default entry
//! 3. labels in the order they appeared in the config

use std::collections::HashSet;

use super::image::LinuxImage;
use super::parser::State;

/// Consume the parse state into the ordered image list.
///
/// Each label is emitted once, at its first position. Labels with no entry
/// (a default naming an undeclared label) are dropped.
pub fn resolve_order(state: State) -> Vec<LinuxImage> {
    let State {
        mut entries,
        label_order,
        default_entry,
        nerf_default_entry,
        ..
    } = state;

    let candidates = [nerf_default_entry, default_entry]
        .into_iter()
        .filter(|label| !label.is_empty())
        .chain(label_order);

    dedup(candidates)
        .into_iter()
        .filter_map(|label| entries.remove(&label))
        .collect()
}

/// Drop repeats, keeping first occurrences in order.
pub fn dedup<I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    labels
        .into_iter()
        .filter(|label| seen.insert(label.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fetch::Schemes;
    use crate::core::parser::Parser;

    fn order_of(config: &str) -> Vec<String> {
        let schemes = Schemes::new();
        let mut parser = Parser::new(None, &schemes);
        parser.append(config, None).unwrap();
        parser
            .finish()
            .unwrap()
            .into_iter()
            .map(|image| image.label)
            .collect()
    }

    #[test]
    fn dedup_keeps_first() {
        let got = dedup(["b", "a", "b", "c", "a"].map(String::from));
        assert_eq!(got, vec!["b", "a", "c"]);
    }

    #[test]
    fn no_labels_no_images() {
        assert!(order_of("").is_empty());
        assert!(order_of("default a\nnerfdefault b\nappend x").is_empty());
    }

    #[test]
    fn emission_order_without_defaults() {
        assert_eq!(order_of("label a\nlabel b\nlabel c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn default_moves_to_front() {
        assert_eq!(
            order_of("default c\nlabel a\nlabel b\nlabel c"),
            vec!["c", "a", "b"]
        );
    }

    #[test]
    fn nerf_default_precedes_default() {
        assert_eq!(
            order_of("label a\nlabel b\nmenu default\nlabel c\nnerfdefault c"),
            vec!["c", "b", "a"]
        );
    }

    #[test]
    fn undeclared_default_is_dropped() {
        assert_eq!(order_of("default ghost\nlabel a"), vec!["a"]);
    }

    #[test]
    fn redeclared_label_keeps_first_position() {
        assert_eq!(order_of("label a\nlabel b\nlabel a"), vec!["a", "b"]);
    }

    #[test]
    fn last_default_wins() {
        assert_eq!(
            order_of("default a\nlabel a\nlabel b\ndefault b"),
            vec!["b", "a"]
        );
    }
}
