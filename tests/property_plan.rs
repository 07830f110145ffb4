use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use taskdag::builder::TaskBuilder;
use taskdag::dag::ExecutionPlan;
use taskdag::{Registry, TaskName};

/// Random acyclic dependency lists: task N may only depend on tasks 0..N.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_tasks),
            num_tasks,
        )
        .prop_map(move |raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, deps)| {
                    // Sanitize: only allow deps < i, deduplicated.
                    let valid: HashSet<usize> =
                        deps.into_iter().filter(|_| i > 0).map(|d| d % i).collect();
                    valid.into_iter().collect()
                })
                .collect()
        })
    })
}

fn registry_from(deps: &[Vec<usize>]) -> Registry {
    let mut registry = Registry::new();
    for (i, dep_indices) in deps.iter().enumerate() {
        let task = TaskBuilder::new(format!("task_{i}"))
            .dependencies(
                dep_indices
                    .iter()
                    .map(|d| TaskName::from(format!("task_{d}"))),
            )
            .build(|_args| Ok(()));
        registry.register(task).unwrap();
    }
    registry
}

proptest! {
    /// For every acyclic graph, the resolved order is a valid topological
    /// order: each dependency strictly precedes its dependents and each task
    /// appears exactly once.
    #[test]
    fn test_order_is_topological_and_duplicate_free(deps in dag_strategy(12)) {
        let registry = registry_from(&deps);
        let targets: Vec<TaskName> = (0..deps.len())
            .map(|i| TaskName::from(format!("task_{i}")))
            .collect();

        let plan = ExecutionPlan::resolve(&registry, &targets).unwrap();
        prop_assert_eq!(plan.len(), deps.len());

        let positions: HashMap<&TaskName, usize> = plan
            .order()
            .iter()
            .enumerate()
            .map(|(pos, name)| (name, pos))
            .collect();
        prop_assert_eq!(positions.len(), deps.len(), "each task appears exactly once");

        for (i, dep_indices) in deps.iter().enumerate() {
            let name = TaskName::from(format!("task_{i}"));
            for d in dep_indices {
                let dep = TaskName::from(format!("task_{d}"));
                prop_assert!(
                    positions[&dep] < positions[&name],
                    "{} must precede {}", dep, name
                );
            }
        }
    }

    /// The pending count of a task equals the number of its distinct
    /// immediate dependencies, since every dependency here is a real task.
    #[test]
    fn test_pending_counts_match_immediate_dependencies(deps in dag_strategy(12)) {
        let registry = registry_from(&deps);
        let targets: Vec<TaskName> = (0..deps.len())
            .map(|i| TaskName::from(format!("task_{i}")))
            .collect();

        let plan = ExecutionPlan::resolve(&registry, &targets).unwrap();
        let pending = plan.pending_counts();

        for (i, dep_indices) in deps.iter().enumerate() {
            let name = TaskName::from(format!("task_{i}"));
            prop_assert_eq!(pending[&name], dep_indices.len());
        }
    }
}
