//! Built-in curriculum: topics and prerequisite edges.
//!
//! Catalog order doubles as the sequencer's base order. Titles and
//! problem content live in external collaborators, keyed by topic id.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cached default curriculum - built once and reused across all operations
static DEFAULT_CURRICULUM: Lazy<Curriculum> = Lazy::new(build_default_curriculum_internal);

/// Get a reference to the cached default curriculum
pub fn get_default_curriculum() -> &'static Curriculum {
    &DEFAULT_CURRICULUM
}

/// Builds the default curriculum topic and edge lists
///
/// **Note**: For production use, prefer `get_default_curriculum()` which
/// returns a cached reference. This function is retained for testing and
/// custom curriculum creation.
pub fn build_default_curriculum() -> Curriculum {
    build_default_curriculum_internal()
}

fn topic(id: &str, unit: Unit, section: Option<&str>) -> Topic {
    Topic {
        id: id.into(),
        unit,
        section: section.map(|s| s.into()),
    }
}

fn edge(from: &str, to: &str) -> PrerequisiteEdge {
    PrerequisiteEdge {
        from: from.into(),
        to: to.into(),
    }
}

fn build_default_curriculum_internal() -> Curriculum {
    let topics = vec![
        // ====================================================================
        // Mathematics I
        // ====================================================================
        topic("algebra_expand_basic", Unit::Math1, Some("algebra")),
        topic("algebra_factor_basic", Unit::Math1, Some("algebra")),
        topic("algebra_linear_eq_basic", Unit::Math1, Some("algebra")),
        topic("algebra_ineq_basic", Unit::Math1, Some("algebra")),
        topic("set_operations_basic", Unit::Math1, Some("logic")),
        topic("prop_proposition_basic", Unit::Math1, Some("logic")),
        topic("quad_graph_basic", Unit::Math1, Some("quadratics")),
        topic("quad_solve_basic", Unit::Math1, Some("quadratics")),
        topic("quad_discriminant_basic", Unit::Math1, Some("quadratics")),
        topic("quad_maxmin_basic", Unit::Math1, Some("quadratics")),
        topic("quad_inequality_basic", Unit::Math1, Some("quadratics")),
        topic("trig_ratio_basic", Unit::Math1, Some("trigonometry")),
        topic("trig_special_angles_basic", Unit::Math1, Some("trigonometry")),
        topic(
            "geo_measure_right_triangle_basic",
            Unit::Math1,
            Some("trigonometry"),
        ),
        topic("geo_sine_cosine_law_basic", Unit::Math1, Some("trigonometry")),
        topic("data_summary_basic", Unit::Math1, Some("data")),
        topic("data_variance_sd_basic", Unit::Math1, Some("data")),
        // ====================================================================
        // Mathematics A
        // ====================================================================
        topic("combi_basic", Unit::MathA, Some("counting")),
        topic("combi_permutation_basic", Unit::MathA, Some("counting")),
        topic("prob_basic", Unit::MathA, Some("probability")),
        topic("prob_complement_basic", Unit::MathA, Some("probability")),
        topic("int_divisor_multiple_basic", Unit::MathA, Some("integers")),
        topic("int_remainder_basic", Unit::MathA, Some("integers")),
        topic("geo_ratio_theorems", Unit::MathA, Some("plane_geometry")),
        topic("geo_circle_geometry", Unit::MathA, Some("plane_geometry")),
        // ====================================================================
        // Mathematics II
        // ====================================================================
        topic("quad_roots_relations_basic", Unit::Math2, Some("equations")),
        topic("exp_log_basic", Unit::Math2, Some("exp_log")),
        topic("exp_log_equations_basic", Unit::Math2, Some("exp_log")),
        topic("trig_identities_basic", Unit::Math2, Some("trigonometry")),
        // ====================================================================
        // Mathematics B
        // ====================================================================
        topic("induction_basic", Unit::MathB, Some("sequences")),
    ];

    let edges = vec![
        edge("algebra_expand_basic", "algebra_factor_basic"),
        edge("algebra_factor_basic", "quad_solve_basic"),
        edge("algebra_linear_eq_basic", "algebra_ineq_basic"),
        edge("algebra_linear_eq_basic", "quad_solve_basic"),
        edge("set_operations_basic", "prop_proposition_basic"),
        edge("quad_solve_basic", "quad_discriminant_basic"),
        edge("quad_solve_basic", "quad_inequality_basic"),
        edge("quad_graph_basic", "quad_maxmin_basic"),
        edge("quad_graph_basic", "quad_inequality_basic"),
        edge("quad_discriminant_basic", "quad_roots_relations_basic"),
        edge("trig_ratio_basic", "trig_special_angles_basic"),
        edge("trig_special_angles_basic", "geo_measure_right_triangle_basic"),
        edge(
            "geo_measure_right_triangle_basic",
            "geo_sine_cosine_law_basic",
        ),
        edge("trig_special_angles_basic", "trig_identities_basic"),
        edge("data_summary_basic", "data_variance_sd_basic"),
        edge("combi_basic", "combi_permutation_basic"),
        edge("combi_permutation_basic", "prob_basic"),
        edge("prob_basic", "prob_complement_basic"),
        edge("int_divisor_multiple_basic", "int_remainder_basic"),
        edge("geo_ratio_theorems", "geo_circle_geometry"),
        edge("exp_log_basic", "exp_log_equations_basic"),
        edge("quad_solve_basic", "induction_basic"),
    ];

    Curriculum { topics, edges }
}

impl Curriculum {
    /// Validate the curriculum for consistency
    ///
    /// Returns a list of validation warnings, or empty Vec if clean.
    /// Dangling edges are reported here as authoring diagnostics even
    /// though sequencing silently ignores them.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for t in &self.topics {
            if t.id.is_empty() {
                warnings.push("Topic has empty ID".to_string());
                continue;
            }
            if !seen.insert(&t.id) {
                warnings.push(format!("Duplicate topic ID '{}'", t.id));
            }
        }

        for e in &self.edges {
            if e.from == e.to {
                warnings.push(format!("Self-dependency on '{}'", e.from));
            }
            if !seen.contains(e.from.as_str()) {
                warnings.push(format!(
                    "Edge references unknown prerequisite '{}'",
                    e.from
                ));
            }
            if !seen.contains(e.to.as_str()) {
                warnings.push(format!("Edge references unknown topic '{}'", e.to));
            }
        }

        warnings
    }

    /// Look up a topic by id
    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }
}
