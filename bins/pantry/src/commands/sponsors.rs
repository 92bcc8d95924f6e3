//! Sponsors command - list, add and remove sponsor products

use super::Context;
use anyhow::Result;
use owo_colors::OwoColorize;
use pantry_catalog::NewSponsor;
use pantry_cli::output::Status;
use pantry_core::Error;

/// List a page of sponsors
pub fn list(ctx: &Context, count: Option<usize>, after: usize) -> Result<()> {
    let catalog = ctx.open_catalog()?;
    let rows = catalog.sponsors(ctx.page(count, after));

    if ctx.json {
        return ctx.print_json(&rows);
    }

    if rows.is_empty() {
        Status::info("No sponsors");
        return Ok(());
    }

    for row in &rows {
        println!(
            "  {} {} {} {}",
            format!("#{}", row.id).dimmed(),
            row.sponsor_name.bold(),
            "→".cyan(),
            row.product_name
        );
        if !row.product_description.is_empty() {
            println!("      {}", row.product_description.dimmed());
        }
        if !row.product_picture.is_empty() {
            println!("      {}", row.product_picture.underline());
        }
    }
    Ok(())
}

/// Add a sponsor and save the catalog
pub fn add(
    ctx: &Context,
    sponsor_name: String,
    product_name: String,
    product_description: String,
    product_picture: String,
) -> Result<()> {
    let catalog = ctx.open_catalog()?;
    let record = catalog
        .add_sponsor(NewSponsor {
            sponsor_name,
            product_name,
            product_description,
            product_picture,
        })
        .map_err(Error::from)?;
    ctx.save_catalog(&catalog)?;

    if ctx.json {
        return ctx.print_json(&record);
    }
    Status::success(&format!(
        "Added sponsor #{} {} ({})",
        record.id,
        record.sponsor_name.bold(),
        record.product_name
    ));
    Ok(())
}

/// Remove a sponsor and save the catalog
pub fn remove(ctx: &Context, id: i64) -> Result<()> {
    let catalog = ctx.open_catalog()?;
    let record = catalog.remove_sponsor(id).map_err(Error::from)?;
    ctx.save_catalog(&catalog)?;

    if ctx.json {
        return ctx.print_json(&record);
    }
    Status::success(&format!("Removed sponsor #{} {}", record.id, record.sponsor_name.bold()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use pantry_catalog::Page;
    use pantry_core::ErrorCode;

    #[test]
    fn test_add_list_remove() {
        let (_dir, ctx) = testing::context();
        add(&ctx, "Acme".into(), "Acme Salt".into(), String::new(), String::new()).unwrap();
        add(&ctx, "Olio".into(), "Olio Oil".into(), "cold pressed".into(), String::new()).unwrap();
        list(&ctx, Some(1), 1).unwrap();

        let catalog = ctx.open_catalog().unwrap();
        let page = catalog.sponsors(Page { count: 1, after: 1 });
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].sponsor_name, "Olio");

        remove(&ctx, 1).unwrap();
        assert_eq!(ctx.open_catalog().unwrap().sponsors(Page::default()).len(), 1);
    }

    #[test]
    fn test_add_rejects_blank_names() {
        let (_dir, ctx) = testing::context();
        let err = add(&ctx, "  ".into(), "Salt".into(), String::new(), String::new()).unwrap_err();
        assert_eq!(err.downcast::<Error>().unwrap().code, ErrorCode::InvalidRecord);
    }
}
