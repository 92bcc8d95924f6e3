//! Match command - run text through the matching pipeline

use super::Context;
use anyhow::Result;
use owo_colors::OwoColorize;
use pantry_catalog::CatalogError;
use pantry_cli::output::{self, format_count, format_duration, Status};
use pantry_cli::progress;
use pantry_core::error::ErrorReport;
use pantry_core::Error;
use pantry_search::{IngredientMatcher, MatchReport, MatchResponse, SearchError};
use pantry_telemetry::{metrics, names, Timer};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

const BATCH_CHUNK: usize = 64;

/// One line of a `--lines` run
#[derive(Debug, Serialize)]
struct LineOutcome {
    line: usize,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<MatchResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorReport>,
}

/// Run match command
pub fn run(ctx: &Context, text: Option<String>, file: Option<PathBuf>, lines: bool) -> Result<()> {
    let input = read_input(text, file)?;

    let catalog = ctx.open_catalog()?;
    let matcher = catalog.matcher();
    metrics().gauge(names::VOCABULARY_SIZE, matcher.index().len() as u64);

    if lines {
        return run_lines(ctx, &matcher, &input);
    }

    let started = Instant::now();
    let report = match_one(&matcher, &input)?;

    if ctx.json {
        return ctx.print_json(&MatchResponse::from(report));
    }

    output::print_report(&report);
    if !report.is_empty() {
        println!(
            "\n{} {} matched, average score {} {}",
            "→".cyan(),
            format_count(report.matched.len(), "ingredient", "ingredients"),
            output::format_score(report.average_score).bold(),
            format!("({})", format_duration(started.elapsed())).dimmed()
        );
    }
    Ok(())
}

fn read_input(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::from(e).with_context(format!("Reading {}", path.display()))
            })?;
            Ok(content)
        }
        (None, None) => Err(Error::invalid_input("Text input is required")
            .with_suggestion("Pass the text as an argument or use --file PATH")
            .into()),
    }
}

/// Match one text, recording request metrics
fn match_one(matcher: &IngredientMatcher, text: &str) -> Result<MatchReport, Error> {
    metrics().increment(names::MATCH_REQUESTS);
    let timer = Timer::start(names::MATCH_DURATION);
    let result = matcher.match_text(text);
    timer.stop();

    record(&result);
    result.map_err(search_error)
}

fn record(result: &pantry_search::Result<MatchReport>) {
    match result {
        Ok(report) => {
            metrics().increment_by(names::MATCHED_INGREDIENTS, report.matched.len() as u64)
        }
        Err(_) => metrics().increment(names::MATCH_REJECTED),
    }
}

fn search_error(err: SearchError) -> Error {
    CatalogError::from(err).into()
}

fn run_lines(ctx: &Context, matcher: &IngredientMatcher, input: &str) -> Result<()> {
    let texts: Vec<(usize, &str)> = input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line))
        .collect();

    let pb = progress::quiet(progress::batch_progress(texts.len() as u64, "Matching"), ctx.json);
    let started = Instant::now();

    let mut outcomes = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(BATCH_CHUNK) {
        let batch: Vec<&str> = chunk.iter().map(|&(_, text)| text).collect();
        metrics().increment_by(names::MATCH_REQUESTS, batch.len() as u64);

        for (&(line, text), result) in chunk.iter().zip(matcher.match_batch(&batch)) {
            record(&result);
            let (result, error) = match result {
                Ok(report) => (Some(MatchResponse::from(report)), None),
                Err(e) => (None, Some(search_error(e).to_report())),
            };
            outcomes.push(LineOutcome {
                line,
                text: text.to_string(),
                result,
                error,
            });
        }
        pb.inc(chunk.len() as u64);
    }

    let elapsed = started.elapsed();
    metrics().histogram(names::MATCH_BATCH_DURATION, elapsed.as_secs_f64() * 1000.0);

    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    if failed == 0 {
        progress::finish_success(&pb, "done");
    } else {
        progress::finish_error(&pb, &format!("{} without words", format_count(failed, "line", "lines")));
    }

    if ctx.json {
        return ctx.print_json(&outcomes);
    }

    for outcome in &outcomes {
        Status::header(&format!("line {}: {}", outcome.line, outcome.text.trim()));
        match (&outcome.result, &outcome.error) {
            (Some(response), _) if response.matched_ingredients.is_empty() => {
                Status::info("No ingredients matched")
            }
            (Some(response), _) => {
                for m in &response.matched_ingredients {
                    println!(
                        "  {} {} {}",
                        format!("#{}", m.ingredient_id).dimmed(),
                        m.ingredient_name,
                        output::format_score(m.ingredient_score).green()
                    );
                }
                println!(
                    "  {} {}",
                    "average".dimmed(),
                    output::format_score(response.average_score).bold()
                );
            }
            (None, Some(error)) => Status::warning(&error.message),
            (None, None) => {}
        }
    }

    println!();
    Status::success(&format!(
        "Matched {} in {}",
        format_count(outcomes.len(), "line", "lines"),
        format_duration(elapsed)
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use pantry_catalog::NewIngredient;
    use pantry_core::ErrorCode;

    fn seed(ctx: &Context) {
        let catalog = ctx.open_catalog().unwrap();
        catalog.add_ingredient(NewIngredient::new("olive oil", "", 8.5)).unwrap();
        catalog.add_ingredient(NewIngredient::new("salt", "", 3.0)).unwrap();
        ctx.save_catalog(&catalog).unwrap();
    }

    fn error_code(err: anyhow::Error) -> ErrorCode {
        err.downcast::<Error>().unwrap().code
    }

    #[test]
    fn test_match_text() {
        let (_dir, ctx) = testing::context();
        seed(&ctx);

        let before = metrics().counter(names::MATCH_REQUESTS);
        run(&ctx, Some("olive oyl and salt".to_string()), None, false).unwrap();
        assert!(metrics().counter(names::MATCH_REQUESTS) > before);
    }

    #[test]
    fn test_empty_input_is_validation_error() {
        let (_dir, ctx) = testing::context();
        seed(&ctx);

        let err = run(&ctx, Some("  ...  ".to_string()), None, false).unwrap_err();
        assert_eq!(error_code(err), ErrorCode::InvalidInput);
    }

    #[test]
    fn test_missing_input() {
        let (_dir, ctx) = testing::context();
        let err = run(&ctx, None, None, false).unwrap_err();
        assert_eq!(error_code(err), ErrorCode::InvalidInput);
    }

    #[test]
    fn test_missing_file() {
        let (dir, ctx) = testing::context();
        let err = run(&ctx, None, Some(dir.path().join("nope.txt")), false).unwrap_err();
        assert_eq!(error_code(err), ErrorCode::FileNotFound);
    }

    #[test]
    fn test_lines_keep_going_past_empty_lines() {
        let (dir, ctx) = testing::context();
        seed(&ctx);

        let path = dir.path().join("recipes.txt");
        fs::write(&path, "olive oil\n\n---\nsalt and pepper\n").unwrap();

        let before = metrics().counter(names::MATCH_REJECTED);
        run(&ctx, None, Some(path), true).unwrap();
        assert!(metrics().counter(names::MATCH_REJECTED) > before);
    }

    #[test]
    fn test_lines_record_batch_duration() {
        let (dir, ctx) = testing::context();
        seed(&ctx);

        let path = dir.path().join("recipes.txt");
        fs::write(&path, "olive oil\nsalt\n").unwrap();
        run(&ctx, None, Some(path), true).unwrap();

        let exported = metrics().export_json();
        let batches = exported["histograms"][names::MATCH_BATCH_DURATION]["count"]
            .as_u64()
            .unwrap_or(0);
        assert!(batches >= 1);
    }

    #[test]
    fn test_match_one_maps_search_errors() {
        let matcher = IngredientMatcher::default();
        let err = match_one(&matcher, "!!!").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
}
