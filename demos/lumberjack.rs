use regressive_goap::{
    create_planner, Action, ActionRef, Planner, PlannerSettings, Result, State,
};
use std::fs::File;

fn buy(item: &str) -> Result<ActionRef> {
    let has_item = format!("has{}", item);
    Ok(Action::new(format!("Buy {}", item), 2.0)?
        .with_precondition("isNear", "Shop")
        .with_precondition("hasGold", true)
        .with_precondition(has_item.as_str(), false)
        .with_effect(has_item.as_str(), true)
        .with_effect("hasGold", false)
        .into_ref())
}

fn sell(item: &str) -> Result<ActionRef> {
    let has_item = format!("has{}", item);
    Ok(Action::new(format!("Sell {}", item), 1.0)?
        .with_precondition("isNear", "Shop")
        .with_precondition(has_item.as_str(), true)
        .with_effect("hasGold", true)
        .with_effect(has_item.as_str(), false)
        .into_ref())
}

fn go_to(place: &str) -> Result<ActionRef> {
    Ok(Action::new(format!("Go To {}", place), 3.0)?
        .with_effect("isNear", place)
        .into_ref())
}

fn main() -> Result<()> {
    // A lumberjack who wants to be fed and drunk, starting out with only an axe
    let eat_pie = Action::new("Eat Pie", 1.0)?
        .with_precondition("hasPie", true)
        .with_precondition("isHungry", true)
        .with_effect("isHungry", false)
        .with_effect("hasPie", false);

    let chop_wood = Action::new("Chop Wood", 3.0)?
        .with_precondition("isTired", false)
        .with_precondition("hasAxe", true)
        .with_precondition("isNear", "Tree")
        .with_effect("hasWood", true)
        .with_effect("isTired", true);

    let take_nap = Action::new("Take a nap", 3.0)?
        .with_precondition("isNear", "Home")
        .with_precondition("isTired", true)
        .with_effect("isTired", false);

    let drink_alcohol = Action::new("Drink Alcohol", 1.0)?
        .with_precondition("hasAlcohol", true)
        .with_precondition("isSober", true)
        .with_precondition("isDrunk", false)
        .with_effect("hasAlcohol", false)
        .with_effect("isSober", false)
        .with_effect("isDrunk", true);

    let actions = vec![
        buy("Axe")?,
        sell("Wood")?,
        eat_pie.into_ref(),
        buy("Pie")?,
        chop_wood.into_ref(),
        take_nap.into_ref(),
        go_to("Shop")?,
        go_to("Tree")?,
        go_to("Home")?,
        buy("Alcohol")?,
        drink_alcohol.into_ref(),
    ];

    let current_state = State::empty()
        .set("isHungry", true)
        .set("isSober", true)
        .set("hasAxe", true);
    let goal_state = State::empty().set("isHungry", false).set("isDrunk", true);

    let planner = create_planner(&PlannerSettings {
        create_debug_graph: true,
        ..PlannerSettings::default()
    });
    let result = planner.plan_catalog(&current_state, &goal_state, actions);

    match result.plan() {
        Some(plan) => {
            println!("Plan from {} to {}:", current_state, goal_state);
            for (step, action) in plan.iter().enumerate() {
                println!("  {:>2}. {}", step + 1, action.name());
            }
            if let Some(cost) = result.total_cost(&current_state) {
                println!("Total cost: {}", cost);
            }
        }
        None => println!("No plan reaches {}", goal_state),
    }

    // Render the explored search tree
    if let Some(tree) = result.search_tree() {
        let mut file = File::create("./lumberjack_search_tree.dot")?;
        tree.write_dot(&mut file)?;
        println!(
            "Wrote {} nodes to lumberjack_search_tree.dot",
            tree.nodes().len()
        );
    }

    Ok(())
}
