use regressive_goap::{
    create_planner, Action, ActionRef, ActionSet, DomainAction, GoapError, Planner,
    PlannerSettings, State,
};
use std::sync::Arc;
use std::thread;

/// A travel action parameterized by its destination. Every instance is named "Go".
#[derive(Debug)]
struct Go {
    preconditions: State,
    effects: State,
}

impl Go {
    fn to(place: &str) -> ActionRef {
        Arc::new(Go {
            preconditions: State::empty(),
            effects: State::empty().set("isNear", place),
        })
    }
}

impl DomainAction for Go {
    fn name(&self) -> &str {
        "Go"
    }

    fn preconditions(&self) -> &State {
        &self.preconditions
    }

    fn effects(&self) -> &State {
        &self.effects
    }

    fn cost(&self, _state: &State) -> f32 {
        3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimal_planner() -> Box<dyn Planner> {
        create_planner(&PlannerSettings {
            early_exit: false,
            ..PlannerSettings::default()
        })
    }

    #[test]
    fn test_basic_goap_workflow() {
        // Create actions
        let gather_wood = Action::new("gather_wood", 1.0)
            .unwrap()
            .with_precondition("has_axe", true)
            .with_effect("has_wood", true);

        let build_house = Action::new("build_house", 2.0)
            .unwrap()
            .with_precondition("has_wood", true)
            .with_effect("has_house", true);

        // Define the current state
        let current_state = State::empty()
            .set("has_axe", true)
            .set("has_wood", false)
            .set("has_house", false);

        // Define the goal state
        let goal_state = State::empty().set("has_house", true);

        // Find a plan
        let result = optimal_planner()
            .plan_catalog(
                &current_state,
                &goal_state,
                vec![gather_wood.into_ref(), build_house.into_ref()],
            );
        assert_eq!(result.names().unwrap(), ["gather_wood", "build_house"]);
    }

    #[test]
    fn test_impossible_goal() {
        let action = Action::new("impossible_action", 1.0)
            .unwrap()
            .with_precondition("impossible", true)
            .with_effect("goal", true);

        let goal_state = State::empty().set("goal", true);
        let result = optimal_planner()
            .plan_catalog(&State::empty(), &goal_state, vec![action.into_ref()]);

        assert!(!result.is_success());
        assert!(result.plan().is_none());
    }

    #[test]
    fn test_multiple_paths_to_goal() {
        let cheap = Action::new("cheap_action", 1.0)
            .unwrap()
            .with_precondition("start", true)
            .with_effect("goal", true);

        let expensive = Action::new("expensive_action", 5.0)
            .unwrap()
            .with_precondition("start", true)
            .with_effect("goal", true);

        let current_state = State::empty().set("start", true);
        let goal_state = State::empty().set("goal", true);

        let result = optimal_planner()
            .plan_catalog(
                &current_state,
                &goal_state,
                vec![expensive.into_ref(), cheap.into_ref()],
            );
        assert_eq!(result.names().unwrap(), ["cheap_action"]);
        assert_eq!(result.total_cost(&current_state), Some(1.0));
    }

    #[test]
    fn test_invalid_action_cost() {
        let result = Action::new("invalid_action", -1.0);
        assert!(matches!(result, Err(GoapError::InvalidActionCost(_))));
    }

    #[test]
    fn test_invalid_actions_are_ignored() {
        let shortcut = Action::new("shortcut", 0.0)
            .unwrap()
            .with_effect("goal", true)
            .with_valid(false);
        let long_way = Action::new("long_way", 10.0)
            .unwrap()
            .with_effect("goal", true);

        let goal_state = State::empty().set("goal", true);
        let result = optimal_planner()
            .plan_catalog(
                &State::empty(),
                &goal_state,
                vec![shortcut.into_ref(), long_way.into_ref()],
            );
        assert_eq!(result.names().unwrap(), ["long_way"]);
    }

    #[test]
    fn test_numeric_effects_need_exact_match() {
        let earn_ten = Action::new("earn_ten", 1.0)
            .unwrap()
            .with_effect("gold", 10);

        let start = State::empty().set("gold", 5);
        let planner = optimal_planner();

        let exact = planner
            .plan_catalog(&start, &State::empty().set("gold", 10), vec![earn_ten.clone().into_ref()]);
        assert_eq!(exact.names().unwrap(), ["earn_ten"]);

        let other = planner
            .plan_catalog(&start, &State::empty().set("gold", 12), vec![earn_ten.into_ref()]);
        assert!(!other.is_success());
    }

    #[test]
    fn test_state_dependent_cost() {
        let walk = Action::new("walk", 1.0)
            .unwrap()
            .with_effect("at_home", true)
            .with_cost_fn(|state| if state.get_or("is_tired", false) { 10.0 } else { 1.0 });

        let start = State::empty().set("is_tired", true);
        let result = optimal_planner()
            .plan_catalog(&start, &State::empty().set("at_home", true), vec![walk.into_ref()]);

        assert_eq!(result.names().unwrap(), ["walk"]);
        // executed forward, the walk starts out tired
        assert_eq!(result.total_cost(&start), Some(10.0));
        assert_eq!(result.total_cost(&State::empty()), Some(1.0));
    }

    #[test]
    fn test_actions_sharing_a_name() {
        let actions = ActionSet::new(vec![Go::to("Shop"), Go::to("Home")]);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions.lookup("isNear").map(|c| c.len()), Some(2));

        let planner = optimal_planner();
        let start = State::empty().set("isNear", "Tree");
        for place in ["Shop", "Home"] {
            let goal = State::empty().set("isNear", place);
            let result = planner.plan(&start, &goal, &actions);
            let plan = result.plan().unwrap();
            assert_eq!(plan.len(), 1);
            assert_eq!(plan[0].name(), "Go");
            assert!(start.apply(plan[0].effects()).is_superstate_of(&goal));
        }
    }

    #[test]
    fn test_concurrent_planning() {
        let step_one = Action::new("step_one", 1.0)
            .unwrap()
            .with_precondition("ready", true)
            .with_effect("halfway", true)
            .into_ref();
        let step_two = Action::new("step_two", 1.0)
            .unwrap()
            .with_precondition("halfway", true)
            .with_effect("done", true)
            .into_ref();

        let actions = Arc::new(ActionSet::new(vec![step_one, step_two]));
        let planner: Arc<dyn Planner> = Arc::from(optimal_planner());
        let start = State::empty().set("ready", true);
        let goal = State::empty().set("done", true);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let actions = Arc::clone(&actions);
                let planner = Arc::clone(&planner);
                let start = start.clone();
                let goal = goal.clone();
                thread::spawn(move || {
                    let result = planner.plan(&start, &goal, &actions);
                    result
                        .names()
                        .map(|names| names.iter().map(|n| n.to_string()).collect::<Vec<_>>())
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), ["step_one", "step_two"]);
        }
    }

    #[test]
    fn test_visualize_planning() {
        let gather_wood = Action::new("gather_wood", 1.0)
            .unwrap()
            .with_precondition("has_axe", true)
            .with_effect("has_wood", true);
        let build_house = Action::new("build_house", 2.0)
            .unwrap()
            .with_precondition("has_wood", true)
            .with_effect("has_house", true);

        let planner = create_planner(&PlannerSettings {
            create_debug_graph: true,
            ..PlannerSettings::default()
        });

        let current_state = State::empty().set("has_axe", true);
        let goal_state = State::empty().set("has_house", true);
        let result = planner
            .plan_catalog(
                &current_state,
                &goal_state,
                vec![gather_wood.into_ref(), build_house.into_ref()],
            );

        let dot = result.search_tree().unwrap().to_dot().unwrap();
        assert!(dot.contains("digraph SearchTree"));
        assert!(dot.contains("build_house"));
        assert!(dot.contains("has_house: true"));
    }
}
