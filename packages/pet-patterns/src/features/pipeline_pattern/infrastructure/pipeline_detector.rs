use petgraph::stable_graph::NodeIndex;
use tracing::{debug, info};

use crate::features::pet_graph::{LoopScope, PetGraph};
use crate::features::pipeline_pattern::domain::PipelineInfo;
use crate::shared::models::NodeKind;
use crate::shared::utils::similarity::cosine_similarity;

/// Scores every loop for pipeline shape and stores the score on the node
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineDetector;

impl PipelineDetector {
    pub fn new() -> Self {
        Self
    }

    /// Direct children usable as stages
    ///
    /// Single-line children sitting on the loop's first or last line, or on
    /// the first line of another child, are header/latch artifacts.
    pub fn stages(graph: &PetGraph, loop_node: NodeIndex) -> Vec<NodeIndex> {
        let root = graph.node(loop_node);
        let children = graph.children(loop_node);

        children
            .iter()
            .copied()
            .filter(|&c| {
                let child = graph.node(c);
                if child.start != child.end {
                    return true;
                }
                let on_loop_bounds = child.start == root.start || child.start == root.end;
                let on_sibling_start = children
                    .iter()
                    .any(|&o| o != c && graph.node(o).start == child.start);
                !(on_loop_bounds || on_sibling_start)
            })
            .collect()
    }

    /// Pipeline score of `loop_node`; 0 for fewer than two stages
    pub fn score(graph: &PetGraph, loop_node: NodeIndex) -> f64 {
        let stages = Self::stages(graph, loop_node);
        Self::score_stages(graph, &graph.loop_scope(loop_node), &stages)
    }

    fn score_stages(graph: &PetGraph, scope: &LoopScope, stages: &[NodeIndex]) -> f64 {
        let n = stages.len();
        if n < 2 {
            return 0.0;
        }

        // stage i+1 consumes stage i
        let mut observed: Vec<f64> = (0..n - 1)
            .map(|i| {
                if graph.depends_ignore_readonly(stages[i + 1], stages[i], scope) {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        let mut ideal = vec![1.0; n - 1];

        // non-adjacent back edges; nearer ones weigh more
        let mut min_weight: Option<f64> = None;
        for i in 0..n {
            for j in (i + 2)..n {
                if !graph.depends_ignore_readonly(stages[i], stages[j], scope) {
                    continue;
                }
                let weight = 1.0 - (j - i) as f64 / (n - 1) as f64;
                if weight > 0.0 && min_weight.map_or(true, |m| weight < m) {
                    min_weight = Some(weight);
                }
            }
        }

        match min_weight {
            Some(w) => {
                observed.push(1.0);
                ideal.push(w);
            }
            None => {
                observed.push(0.0);
                ideal.push(0.0);
            }
        }
        cosine_similarity(&observed, &ideal)
    }

    pub fn detect(&self, graph: &mut PetGraph) -> Vec<PipelineInfo> {
        let mut result = Vec::new();
        for loop_node in graph.nodes_of_kind(NodeKind::Loop) {
            let stages = Self::stages(graph, loop_node);
            let score = Self::score_stages(graph, &graph.loop_scope(loop_node), &stages);
            graph.node_mut(loop_node).pipeline = score;
            debug!("pipeline score {} = {:.4}", graph.node(loop_node).id, score);

            if score > 0.0 {
                info!(
                    "Pipeline at {} ({} stages, score {:.4})",
                    graph.node(loop_node).id,
                    stages.len(),
                    score
                );
                result.push(PipelineInfo {
                    info: graph.pattern_info(loop_node),
                    score,
                    stages: stages.iter().map(|&s| graph.node(s).id).collect(),
                });
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::pet_graph::infrastructure::fixtures::GraphFixture;

    /// loop 10..40 with `n` five-line stages starting at line 11
    fn chain(n: u32) -> (GraphFixture, NodeIndex, Vec<NodeIndex>) {
        let mut fx = GraphFixture::new();
        let l = fx.lp(0, 10, 40, 100);
        let stages: Vec<NodeIndex> = (0..n)
            .map(|i| fx.cu(i + 1, 11 + 5 * i, 15 + 5 * i, 10))
            .collect();
        fx.children(l, &stages);
        for i in 1..stages.len() {
            let line = 11 + 5 * i as u32;
            fx.raw(stages[i], stages[i - 1], &format!("v{}", i), line, line - 2);
        }
        (fx, l, stages)
    }

    #[test]
    fn test_clean_chain_scores_one() {
        let (mut fx, l, _) = chain(3);
        assert!((PipelineDetector::score(&fx.graph, l) - 1.0).abs() < 1e-12);

        let found = PipelineDetector::new().detect(&mut fx.graph);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].stages.len(), 3);
        assert!(fx.graph.node(l).pipeline > 0.0);
    }

    #[test]
    fn test_back_edge_lowers_score() {
        let (mut fx, l, s) = chain(4);
        // stage 1 reads what stage 3 wrote in the previous iteration
        fx.raw(s[1], s[3], "w", 17, 28);
        let score = PipelineDetector::score(&fx.graph, l);
        let expected = (3.0 + 1.0 / 3.0) / (2.0 * (3.0f64 + 1.0 / 9.0).sqrt());
        assert!((score - expected).abs() < 1e-9);
        assert!(score < 1.0);
    }

    #[test]
    fn test_single_stage_scores_zero() {
        let (mut fx, l, _) = chain(1);
        assert_eq!(PipelineDetector::score(&fx.graph, l), 0.0);
        assert!(PipelineDetector::new().detect(&mut fx.graph).is_empty());
        assert_eq!(fx.graph.node(l).pipeline, 0.0);
    }

    #[test]
    fn test_header_and_latch_children_are_not_stages() {
        let mut fx = GraphFixture::new();
        let l = fx.lp(0, 10, 40, 100);
        let header = fx.cu(1, 10, 10, 1);
        let body = fx.cu(2, 11, 39, 1);
        let latch = fx.cu(3, 40, 40, 1);
        let dup = fx.cu(4, 11, 11, 1);
        fx.children(l, &[header, body, latch, dup]);
        assert_eq!(PipelineDetector::stages(&fx.graph, l), vec![body]);
    }

    #[test]
    fn test_independent_stages_score_zero() {
        let mut fx = GraphFixture::new();
        let l = fx.lp(0, 10, 40, 100);
        let a = fx.cu(1, 11, 15, 1);
        let b = fx.cu(2, 16, 20, 1);
        fx.children(l, &[a, b]);
        assert_eq!(PipelineDetector::score(&fx.graph, l), 0.0);
    }
}
