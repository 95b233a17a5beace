use anyhow::Result;

use triage_core::preferences::icon_name;
use triage_core::{AssignmentToggles, Config, PreferenceStore, SearchMode, SearchToggles, Theme};

use super::{open_preferences, ModeTarget};

pub fn mode(config: &Config, target: Option<ModeTarget>) -> Result<()> {
    let mut store = open_preferences(config)?;

    match target {
        None => {
            print_search_modes(&store)?;
            print_assignment_mode(&store)?;
        }
        Some(ModeTarget::Search { mode: None }) => print_search_modes(&store)?,
        Some(ModeTarget::Search { mode: Some(mode) }) => {
            SearchToggles::load(&store)?.set_mode(&mut store, mode)?;
            println!("Search mode set to {}", mode);
            println!("{}", mode.placeholder());
        }
        Some(ModeTarget::Assignment { mode: None }) => print_assignment_mode(&store)?,
        Some(ModeTarget::Assignment { mode: Some(mode) }) => {
            let mut toggles = AssignmentToggles::load(&store)?;
            if toggles.set_mode(&mut store, mode)? {
                println!("Assignment mode set to {}", mode);
            } else {
                println!("Assignment mode is already {}", mode);
            }
            println!("{}", mode.placeholder());
        }
    }
    Ok(())
}

fn print_search_modes(store: &dyn PreferenceStore) -> Result<()> {
    let toggles = SearchToggles::load(store)?;
    let theme = Theme::load(store)?;
    let active = toggles.active_mode();

    println!("Search mode: {} ({})", active, active.label());
    for mode in SearchMode::ALL {
        println!(
            "  {:<9} {:<4} {}",
            mode.as_str(),
            if toggles.is_on(mode) { "on" } else { "off" },
            toggles.icon(mode, theme)
        );
    }
    Ok(())
}

fn print_assignment_mode(store: &dyn PreferenceStore) -> Result<()> {
    let toggles = AssignmentToggles::load(store)?;
    let mode = toggles.mode();
    println!("Assignment mode: {}", mode);
    println!("  {}", mode.placeholder());
    Ok(())
}

pub fn theme(config: &Config, theme: Option<Theme>) -> Result<()> {
    let mut store = open_preferences(config)?;

    let theme = match theme {
        Some(theme) => {
            theme.save(&mut store)?;
            theme
        }
        None => Theme::load(&store)?,
    };

    println!("Theme: {}", theme);
    println!("  Toggle icon: {}", icon_name("theme", theme.is_dark(), theme));
    Ok(())
}
