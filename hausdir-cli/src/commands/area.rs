use anyhow::Result;

use super::print_json;
use crate::App;
use crate::render::Render;

pub fn run(app: &App, label: &str) -> Result<()> {
    let cache = app.dataset()?;

    let Some(area) = cache.area_by_label(label)? else {
        anyhow::bail!(
            "No unit matches '{label}'.\n\n\
            Labels end in a type and a number, e.g. \"Wohnung 12\" or \"Haus A - Keller 3\"."
        );
    };

    let resolved = cache.resolve_area(&area)?;

    if app.json {
        return print_json(&resolved);
    }

    println!("{}", resolved.render());
    Ok(())
}

pub fn building(app: &App, id: u32) -> Result<()> {
    let cache = app.dataset()?;

    let Some(resolved) = cache.resolve_building(id)? else {
        anyhow::bail!("Building {id} not found");
    };

    if app.json {
        return print_json(&resolved);
    }

    println!("{}", resolved.render());
    Ok(())
}
