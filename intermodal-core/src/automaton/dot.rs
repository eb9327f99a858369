//! Graphviz rendering of an automaton

use std::hash::Hash;

use super::Automaton;
use crate::model::TrafficRules;

/// Flag names joined by `|`, as bitflags writes them
fn mode_name(class: TrafficRules) -> String {
    class
        .iter_names()
        .map(|(name, _)| name)
        .collect::<Vec<_>>()
        .join(" | ")
}

impl<S: Copy + Eq + Hash> Automaton<S> {
    /// Render the automaton in Graphviz `dot` syntax.
    ///
    /// States are labelled with their id and their `(mode, penalty)` pairs,
    /// transitions with `symbol_label` applied to their symbol.
    pub fn to_dot<F>(&self, symbol_label: F) -> String
    where
        F: Fn(&S) -> String,
    {
        let mut out = String::from("digraph automaton {\n");

        for state in 0..self.state_count() {
            let mut label = format!("{state} ");
            if let Some(penalties) = self.penalties(state) {
                let mut entries: Vec<_> = penalties.iter().collect();
                entries.sort_by_key(|(class, _)| **class);
                for (class, penalty) in entries {
                    label.push_str(&format!("(mode:{}, penalty:{penalty}) ", mode_name(*class)));
                }
            }
            out.push_str(&format!("  {state} [label=\"{label}\"];\n"));
        }

        for transition in self.transitions() {
            out.push_str(&format!(
                "  {} -> {} [label=\"{}\"];\n",
                transition.from,
                transition.to,
                symbol_label(&transition.symbol).replace('"', "\\\"")
            ));
        }

        out.push_str("}\n");
        out
    }
}
