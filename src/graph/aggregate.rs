//! Correlation of raw matches into the symbol graph
//!
//! A single pass over the match stream, in the order the scanner produced
//! it (which follows walker order). The correlation key is a pure function
//! of a match's captured fields: the capture named by its rule's key field.
//! No key means the match is data for the `unmatched` list; the engine
//! never fabricates a correlation it cannot derive.

use crate::graph::{Facet, SymbolGraph};
use crate::rules::CompiledRuleSet;
use crate::scanner::Match;

/// Build the symbol graph from the full match stream.
///
/// Symbols are created lazily on first key sighting and keep first-seen
/// order; facets append in stream order. Duplicates are retained, never
/// merged. Runs in O(matches) with amortized constant-time symbol lookup.
pub fn aggregate(matches: &[Match], rules: &CompiledRuleSet) -> SymbolGraph {
    let mut graph = SymbolGraph::new();

    for m in matches {
        let key = rules
            .key_field_for(&m.rule)
            .and_then(|field| m.captured.get(field))
            .filter(|value| !value.is_empty());

        match key {
            Some(key) => {
                let key = key.clone();
                graph.attach(&key, Facet::from_match(m));
            }
            None => graph.push_unmatched(m.clone()),
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSet;
    use crate::scanner::scan_content;

    fn builtin() -> CompiledRuleSet {
        RuleSet::builtin().compile().unwrap().0
    }

    #[test]
    fn test_cross_file_matches_collapse_by_key() {
        let rules = builtin();
        let mut matches = scan_content(
            "src/ticker.hpp",
            "class TickerNode : public INode {};\n",
            &rules,
        );
        matches.extend(scan_content(
            "src/ticker.cpp",
            "void TickerNode::onValue(const Value& v) {}\n",
            &rules,
        ));

        let graph = aggregate(&matches, &rules);
        let symbol = graph.get("TickerNode").expect("one symbol for both files");
        assert_eq!(symbol.facets.len(), 2);
        assert_eq!(symbol.facets[0].file, "src/ticker.hpp");
        assert_eq!(symbol.facets[1].file, "src/ticker.cpp");
    }

    #[test]
    fn test_keyless_matches_go_to_unmatched() {
        let rules = builtin();
        // Bare call with no receiver: subject capture does not participate
        let matches = scan_content("a.cpp", "registerListener(node);\n// TODO: x\n", &rules);

        let graph = aggregate(&matches, &rules);
        assert!(graph.symbols().is_empty());
        assert_eq!(graph.unmatched.len(), matches.len());
    }

    #[test]
    fn test_no_loss_accounting() {
        let rules = builtin();
        let content = "\
class A : public B {};\n\
bus->registerListener(a);\n\
// NOTE keep\n\
createTree(spec);\n";
        let matches = scan_content("a.cpp", content, &rules);
        let graph = aggregate(&matches, &rules);
        assert!(graph.accounts_for(matches.len()));
    }

    #[test]
    fn test_unknown_rule_kind_cannot_derive_a_key() {
        let rules = builtin();
        let mut m = scan_content("a.cpp", "dispatcher.onTick(dt);\n", &rules)
            .pop()
            .unwrap();
        m.rule = "not-a-known-rule".to_string();

        let graph = aggregate(&[m], &rules);
        assert!(graph.symbols().is_empty());
        assert_eq!(graph.unmatched.len(), 1);
    }

    #[test]
    fn test_facets_carry_rule_and_captures() {
        let rules = builtin();
        let matches = scan_content("a.cpp", "bus->unregisterListener(n);\n", &rules);
        let graph = aggregate(&matches, &rules);
        let facet = &graph.get("bus").unwrap().facets[0];
        assert_eq!(facet.rule, "unregister-listener");
        assert_eq!(facet.line, 1);
        assert_eq!(facet.attributes.get("subject").map(String::as_str), Some("bus"));
    }
}
