//! A tab script as a UI host would run it: once per user interaction.
//!
//! Run with `RUST_LOG=debug` to see the state events.

use flexi_logger::Logger;
use tabstate::{StateManager, StateValue};

fn show(picked_option: Option<&str>, threshold: Option<f64>) {
    // 1. A state manager for this tab
    let state = StateManager::new("example_tab");

    // 2. Defaults, seeded only on the first run
    state.init([
        ("selected_option", StateValue::from("A")),
        ("threshold", StateValue::from(0.5_f64)),
        ("auto_refresh", StateValue::from(false)),
    ]);

    // 3. Widgets report what the user picked
    if let Some(option) = picked_option {
        state.set("selected_option", option);
    }
    if let Some(threshold) = threshold {
        state.set("threshold", threshold);
    }

    // 4. This tab's state
    println!("Current state (this tab):");
    for (key, value) in state.get_all() {
        println!("  {key} = {:?}", value.as_json());
    }

    // 5. Cross-tab read
    let city = state.get_from_tab_or("data_explorer", "selected_city", "N/A");
    println!("City selected in Data Explorer: {}", city.as_str().unwrap_or("?"));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _logger = Logger::try_with_env_or_str("info")?.start()?;

    StateManager::new("data_explorer").init([("selected_city", StateValue::from("Barcelona"))]);

    show(None, None);
    show(Some("C"), None);
    show(None, Some(0.8));

    println!("{}", StateManager::debug_view());

    let path = std::env::temp_dir().join("tabstate_example_state.json");
    StateManager::save_all(&path)?;
    println!("saved to {}", path.display());
    Ok(())
}
