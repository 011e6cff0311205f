//! Property tests for the scanner, the size filter, lookup and moves.

use ffdev::core::report::{NamingRules, collect, filter_by_body_size};
use ffdev::core::{SourceUnit, find_by_name, move_function, scan};
use proptest::prelude::*;

/// A generated function: name, doc line count, body line count (between
/// header and closing brace).
#[derive(Debug, Clone)]
struct GenFunc {
    name: String,
    docs: usize,
    inner: usize,
}

fn gen_func() -> impl Strategy<Value = GenFunc> {
    ("(Test)?[A-Z][a-z]{0,6}", 0usize..3, 0usize..8).prop_map(|(name, docs, inner)| GenFunc {
        name,
        docs,
        inner,
    })
}

/// Go-shaped source with a package clause and blank-line separated functions.
fn render(funcs: &[GenFunc]) -> String {
    let mut out = String::from("package gen\n");
    for f in funcs {
        out.push('\n');
        for i in 0..f.docs {
            if i == 0 {
                out.push_str(&format!("// {} does things.\n", f.name));
            } else {
                out.push_str(&format!("// more detail {i}.\n"));
            }
        }
        out.push_str(&format!("func {}(a int) int {{\n", f.name));
        for i in 0..f.inner {
            out.push_str(&format!("\tx{i} := a\n"));
        }
        out.push_str("}\n");
    }
    out
}

proptest! {
    #[test]
    fn scan_finds_every_function_in_order(funcs in prop::collection::vec(gen_func(), 0..8)) {
        let unit = SourceUnit::from_text("gen.go", &render(&funcs));
        let records: Vec<_> = scan(&unit).collect();

        prop_assert_eq!(records.len(), funcs.len());
        for (record, f) in records.iter().zip(&funcs) {
            prop_assert_eq!(record.name(), f.name.as_str());
            prop_assert_eq!(record.body_len(), f.inner + 2);
            prop_assert_eq!(record.documentation.len(), f.docs);
        }
        for pair in records.windows(2) {
            prop_assert!(pair[0].end_line() < pair[1].doc_start());
        }
    }

    #[test]
    fn body_size_filter_respects_threshold(
        funcs in prop::collection::vec(gen_func(), 0..8),
        threshold in 0usize..10,
    ) {
        let units = [SourceUnit::from_text("gen.go", &render(&funcs))];
        let rules = NamingRules::default();
        let kept = filter_by_body_size(collect(&units), threshold, &rules);

        for r in &kept {
            prop_assert!(r.record.body_len() > threshold);
            prop_assert!(!r.record.name().starts_with("Test"));
        }
        for pair in kept.windows(2) {
            prop_assert!(pair[0].record.body_len() <= pair[1].record.body_len());
        }
        let expected = funcs
            .iter()
            .filter(|f| f.inner + 2 > threshold && !f.name.starts_with("Test"))
            .count();
        prop_assert_eq!(kept.len(), expected);
    }

    #[test]
    fn find_by_name_is_idempotent(funcs in prop::collection::vec(gen_func(), 1..8), pick in any::<prop::sample::Index>()) {
        let unit = SourceUnit::from_text("gen.go", &render(&funcs));
        let name = &funcs[pick.index(funcs.len())].name;

        let first = find_by_name(&unit, name);
        let second = find_by_name(&unit, name);
        prop_assert!(first.is_ok());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn move_then_undo_is_net_zero(funcs in prop::collection::vec(gen_func(), 1..8), pick in any::<prop::sample::Index>()) {
        let mut from = SourceUnit::from_text("from.go", &render(&funcs));
        let mut to = SourceUnit::from_text("to.go", "package gen\n");
        let original = (from.clone(), to.clone());
        let name = funcs[pick.index(funcs.len())].name.clone();

        let report = move_function(&name, &mut from, &mut to).unwrap();

        // Put the moved block back where it came from.
        let block = to.lines.split_off(to.lines.len() - report.appended);
        for (offset, line) in block.into_iter().skip(1).enumerate() {
            from.lines.insert(report.removed_start + offset, line);
        }
        prop_assert_eq!((from, to), original);
    }
}
