//! Ingredients command - CRUD over the ingredient table

use super::Context;
use anyhow::Result;
use owo_colors::OwoColorize;
use pantry_catalog::{IngredientRecord, IngredientUpdate, NewIngredient};
use pantry_cli::output::{format_count, format_score, Status};
use pantry_core::Error;

/// List a page of ingredients
pub fn list(ctx: &Context, count: Option<usize>, after: usize) -> Result<()> {
    let catalog = ctx.open_catalog()?;
    let rows = catalog.ingredients(ctx.page(count, after));

    if ctx.json {
        return ctx.print_json(&rows);
    }

    if rows.is_empty() {
        Status::info("No ingredients");
        return Ok(());
    }

    println!(
        "  {:<6} {:<28} {:>8}  {}",
        "ID".dimmed(),
        "Name".dimmed(),
        "Score".dimmed(),
        "Description".dimmed()
    );
    println!("  {}", "─".repeat(60).dimmed());
    for row in &rows {
        print_row(row);
    }
    println!();
    println!(
        "  {} of {}",
        format_count(rows.len(), "ingredient", "ingredients"),
        catalog.ingredient_count()
    );
    Ok(())
}

fn print_row(row: &IngredientRecord) {
    println!(
        "  {:<6} {:<28} {:>8}  {}",
        row.id,
        row.name,
        format_score(row.score),
        row.description.dimmed()
    );
}

/// Add an ingredient and save the catalog
pub fn add(ctx: &Context, name: String, description: String, score: f64) -> Result<()> {
    let catalog = ctx.open_catalog()?;
    let record = catalog
        .add_ingredient(NewIngredient::new(name, description, score))
        .map_err(Error::from)?;
    ctx.save_catalog(&catalog)?;

    report(ctx, "Added", &record)
}

/// Update an ingredient and save the catalog
pub fn update(
    ctx: &Context,
    id: i64,
    name: Option<String>,
    description: Option<String>,
    score: Option<f64>,
) -> Result<()> {
    if name.is_none() && description.is_none() && score.is_none() {
        return Err(Error::invalid_input("Nothing to update")
            .with_suggestion("Pass at least one of --name, --description or --score")
            .into());
    }

    let catalog = ctx.open_catalog()?;
    let record = catalog
        .update_ingredient(id, IngredientUpdate { name, description, score })
        .map_err(Error::from)?;
    ctx.save_catalog(&catalog)?;

    report(ctx, "Updated", &record)
}

/// Remove an ingredient and save the catalog
pub fn remove(ctx: &Context, id: i64) -> Result<()> {
    let catalog = ctx.open_catalog()?;
    let record = catalog.remove_ingredient(id).map_err(Error::from)?;
    ctx.save_catalog(&catalog)?;

    report(ctx, "Removed", &record)
}

fn report(ctx: &Context, verb: &str, record: &IngredientRecord) -> Result<()> {
    if ctx.json {
        return ctx.print_json(record);
    }
    Status::success(&format!("{} ingredient #{} {}", verb, record.id, record.name.bold()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use pantry_core::ErrorCode;

    fn error_code(err: anyhow::Error) -> ErrorCode {
        err.downcast::<Error>().unwrap().code
    }

    #[test]
    fn test_add_persists() {
        let (_dir, ctx) = testing::context();
        add(&ctx, "  Olive Oil ".to_string(), String::new(), 8.5).unwrap();

        let catalog = ctx.open_catalog().unwrap();
        assert_eq!(catalog.ingredient(1).unwrap().name, "olive oil");
    }

    #[test]
    fn test_add_duplicate() {
        let (_dir, ctx) = testing::context();
        add(&ctx, "salt".to_string(), String::new(), 3.0).unwrap();

        let err = add(&ctx, "SALT".to_string(), String::new(), 1.0).unwrap_err();
        assert_eq!(error_code(err), ErrorCode::DuplicateName);
    }

    #[test]
    fn test_update_and_remove() {
        let (_dir, ctx) = testing::context();
        add(&ctx, "salt".to_string(), String::new(), 3.0).unwrap();

        update(&ctx, 1, None, Some("fine grain".to_string()), Some(4.0)).unwrap();
        let record = ctx.open_catalog().unwrap().ingredient(1).unwrap();
        assert_eq!(record.description, "fine grain");
        assert_eq!(record.score, 4.0);

        remove(&ctx, 1).unwrap();
        assert_eq!(ctx.open_catalog().unwrap().ingredient_count(), 0);
    }

    #[test]
    fn test_update_requires_a_field() {
        let (_dir, ctx) = testing::context();
        let err = update(&ctx, 1, None, None, None).unwrap_err();
        assert_eq!(error_code(err), ErrorCode::InvalidInput);
    }

    #[test]
    fn test_remove_missing() {
        let (_dir, ctx) = testing::context();
        let err = remove(&ctx, 42).unwrap_err();
        assert_eq!(error_code(err), ErrorCode::RecordNotFound);
    }
}
