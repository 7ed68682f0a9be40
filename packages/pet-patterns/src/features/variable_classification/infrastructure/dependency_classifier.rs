//! Dependency-based variable classifier
//!
//! Classification rules, first match wins:
//! 1. loop index of a loop in the region -> private
//! 2. reduction fact of a loop in the region -> reduction
//! 3. never written inside -> first-private (locals) / shared (globals)
//! 4. written, read from before and read after -> in-out dep, shared
//! 5. written and read after -> out dep, shared
//! 6. written and read from before -> in dep
//! 7. written only -> private (locals) / shared (globals)

use petgraph::stable_graph::NodeIndex;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::features::pet_graph::{LoopScope, PetGraph};
use crate::features::variable_classification::domain::{PatternContext, VariableClassification};
use crate::features::variable_classification::ports::VariableClassifier;
use crate::shared::models::{AnalysisFacts, DepType, EdgeKind, NodeKind, Variable};

#[derive(Debug, Default, Clone, Copy)]
struct VarUse {
    written: bool,
    reads_from_outside: bool,
    read_by_outside: bool,
}

/// Default [`VariableClassifier`] working on DATA edges only
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyVariableClassifier;

impl DependencyVariableClassifier {
    pub fn new() -> Self {
        Self
    }

    fn collect_uses<'g>(graph: &'g PetGraph, cus: &[NodeIndex]) -> FxHashMap<&'g str, VarUse> {
        let in_scope: FxHashSet<NodeIndex> = cus.iter().copied().collect();
        let mut uses: FxHashMap<&str, VarUse> = FxHashMap::default();

        for &cu in cus {
            for e in graph.out_edges(cu, Some(EdgeKind::Data)) {
                let Some(d) = e.dependency.as_data() else { continue };
                let entry = uses.entry(d.var_name.as_str()).or_default();
                if d.dtype.is_write() {
                    entry.written = true;
                } else if !in_scope.contains(&e.target) {
                    entry.reads_from_outside = true;
                }
            }
            for e in graph.in_edges(cu, Some(EdgeKind::Data)) {
                let Some(d) = e.dependency.data_of(DepType::Raw, None) else { continue };
                let entry = uses.entry(d.var_name.as_str()).or_default();
                entry.written = true;
                if !in_scope.contains(&e.source) {
                    entry.read_by_outside = true;
                }
            }
        }
        uses
    }
}

fn push_unique(list: &mut Vec<Variable>, var: &Variable) {
    if !list.iter().any(|v| v.name == var.name) {
        list.push(var.clone());
    }
}

impl VariableClassifier for DependencyVariableClassifier {
    fn classify(
        &self,
        graph: &PetGraph,
        facts: &AnalysisFacts,
        node: NodeIndex,
        context: PatternContext,
        seed_private: &[Variable],
        seed_shared: &[Variable],
    ) -> VariableClassification {
        let mut result = VariableClassification::empty(context);
        for v in seed_private {
            push_unique(&mut result.private, v);
        }
        for v in seed_shared {
            push_unique(&mut result.shared, v);
        }
        let seeded: FxHashSet<&str> = seed_private
            .iter()
            .chain(seed_shared)
            .map(|v| v.name.as_str())
            .collect();

        let cus = graph.cu_subtree(node);

        // name -> (variable, is_global), first declaration wins
        let mut candidates: Vec<(Variable, bool)> = Vec::new();
        for &cu in &cus {
            let n = graph.node(cu);
            let declared = n
                .local_vars
                .iter()
                .map(|v| (v, false))
                .chain(n.global_vars.iter().map(|v| (v, true)));
            for (var, global) in declared {
                match candidates.iter_mut().find(|(c, _)| c.name == var.name) {
                    Some(existing) => existing.1 |= global,
                    None => candidates.push((var.clone(), global)),
                }
            }
        }

        let loops = graph.subtree_of_kind(node, Some(NodeKind::Loop));
        let scopes: Vec<LoopScope> = loops.iter().map(|&l| graph.loop_scope(l)).collect();
        let uses = Self::collect_uses(graph, &cus);

        for (var, global) in &candidates {
            if seeded.contains(var.name.as_str()) {
                continue;
            }

            if scopes.iter().any(|s| graph.is_loop_index(&var.name, s)) {
                push_unique(&mut result.private, var);
                continue;
            }

            let reduction = loops
                .iter()
                .find_map(|&l| facts.reduction_fact(graph.node(l).start, &var.name));
            if let Some(fact) = reduction {
                let entry = format!("{}:{}", fact.operation, fact.name);
                if !result.reduction.contains(&entry) {
                    result.reduction.push(entry);
                }
                continue;
            }

            let usage = uses.get(var.name.as_str()).copied().unwrap_or_default();

            if !usage.written {
                let class = if *global {
                    &mut result.shared
                } else {
                    &mut result.first_private
                };
                push_unique(class, var);
            } else if usage.reads_from_outside && usage.read_by_outside {
                push_unique(&mut result.in_out_dep, var);
                push_unique(&mut result.shared, var);
            } else if usage.read_by_outside {
                push_unique(&mut result.out_dep, var);
                push_unique(&mut result.shared, var);
            } else if usage.reads_from_outside {
                push_unique(&mut result.in_dep, var);
                let class = if *global {
                    &mut result.shared
                } else {
                    &mut result.first_private
                };
                push_unique(class, var);
            } else if *global {
                push_unique(&mut result.shared, var);
            } else {
                push_unique(&mut result.private, var);
            }
        }

        debug!(
            "classified {} vars of {} ({}): fp={} p={} s={} red={}",
            candidates.len(),
            graph.node(node).id,
            context.as_str(),
            result.first_private.len(),
            result.private.len(),
            result.shared.len(),
            result.reduction.len()
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{
        CuNode, DataDependence, Dependency, LoopIterationTable, NodeId, ReductionFact, SourcePosition,
    };

    fn pos(line: u32) -> SourcePosition {
        SourcePosition::new(1, line)
    }

    fn raw(g: &mut PetGraph, from: NodeIndex, to: NodeIndex, var: &str, sink: u32, source: u32) {
        g.add_edge(
            from,
            to,
            Dependency::Data(DataDependence {
                dtype: DepType::Raw,
                var_name: var.to_string(),
                source: pos(source),
                sink: pos(sink),
            }),
        );
    }

    /// before (1..2) ; loop (3..9) -> [header 3..3, body 4..8] ; after (10..11)
    fn fixture() -> (PetGraph, NodeIndex, [NodeIndex; 4]) {
        let mut g = PetGraph::new();
        let cu = |g: &mut PetGraph, n: u32, kind: NodeKind, s: u32, e: u32| {
            g.add_node(CuNode::new(NodeId::new(1, n), kind, pos(s), pos(e))).unwrap()
        };
        let before = cu(&mut g, 1, NodeKind::Cu, 1, 2);
        let l = cu(&mut g, 2, NodeKind::Loop, 3, 9);
        let header = cu(&mut g, 3, NodeKind::Cu, 3, 3);
        let body = cu(&mut g, 4, NodeKind::Cu, 4, 8);
        let after = cu(&mut g, 5, NodeKind::Cu, 10, 11);
        g.add_edge(l, header, Dependency::Child);
        g.add_edge(l, body, Dependency::Child);
        {
            let h = g.node_mut(header);
            h.local_vars.push(Variable::new("int", "i"));
        }
        {
            let b = g.node_mut(body);
            b.local_vars.push(Variable::new("int", "n"));
            b.local_vars.push(Variable::new("int", "acc"));
            b.local_vars.push(Variable::new("int", "tmp"));
            b.local_vars.push(Variable::new("double", "sum"));
            b.global_vars.push(Variable::new("int*", "table"));
        }
        // i++ in header
        raw(&mut g, header, header, "i", 3, 3);
        // body reads n from before the loop
        raw(&mut g, body, before, "n", 5, 1);
        // acc: read from before, read after
        raw(&mut g, body, before, "acc", 6, 2);
        raw(&mut g, after, body, "acc", 10, 6);
        // tmp written and read only inside the body
        raw(&mut g, body, body, "tmp", 7, 6);
        (g, l, [before, header, body, after])
    }

    #[test]
    fn test_classification_rules() {
        let (g, l, _) = fixture();
        let facts = AnalysisFacts::new(
            LoopIterationTable::new(),
            vec![ReductionFact::new(pos(3), "sum", "+")],
        );
        let result = DependencyVariableClassifier::new().classify(
            &g,
            &facts,
            l,
            PatternContext::DoAll,
            &[],
            &[],
        );

        assert_eq!(VariableClassification::names(&result.private), vec!["i", "tmp"]);
        assert_eq!(result.reduction, vec!["+:sum".to_string()]);
        assert_eq!(VariableClassification::names(&result.first_private), vec!["n"]);
        assert_eq!(VariableClassification::names(&result.in_out_dep), vec!["acc"]);
        assert_eq!(VariableClassification::names(&result.shared), vec!["acc", "table"]);
        assert!(result.in_dep.is_empty());
    }

    #[test]
    fn test_seeds_lead_and_are_not_reclassified() {
        let (g, l, _) = fixture();
        let result = DependencyVariableClassifier::new().classify(
            &g,
            &AnalysisFacts::default(),
            l,
            PatternContext::GeometricDecomposition,
            &[Variable::new("int", "n")],
            &[Variable::new("int", "shared_seed")],
        );
        assert_eq!(result.private[0].name, "n");
        assert_eq!(result.shared[0].name, "shared_seed");
        assert!(result.first_private.iter().all(|v| v.name != "n"));
        assert_eq!(result.context, PatternContext::GeometricDecomposition);
    }
}
