//! Catalog loader: imports ingredient and tag CSVs into the database.
//! Rows already present (by their natural key) are skipped.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use diesel::prelude::*;
use potluck_server::models::{NewIngredient, NewTag};
use potluck_server::schema::{ingredients, tags};
use potluck_server::validation::normalize_name;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "load_data")]
#[command(about = "Load catalog CSVs into the database", long_about = None)]
struct Cli {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load ingredients from a headerless CSV of (name, measurement_unit)
    Ingredients {
        #[arg(long, default_value = "data/ingredients.csv")]
        file: PathBuf,
    },
    /// Load tags from a headerless CSV of (name, color, slug)
    Tags {
        #[arg(long, default_value = "data/tags.csv")]
        file: PathBuf,
    },
}

fn parse_ingredient_row(row: &csv::StringRecord) -> Result<(String, String)> {
    let name = row.get(0).context("missing ingredient name column")?;
    let unit = row.get(1).context("missing measurement unit column")?;
    let name = normalize_name(name);
    let unit = unit.trim().to_string();
    if name.is_empty() || unit.is_empty() {
        anyhow::bail!("empty ingredient name or unit");
    }
    Ok((name, unit))
}

fn parse_tag_row(row: &csv::StringRecord) -> Result<(String, String, String)> {
    let name = row.get(0).context("missing tag name column")?;
    let color = row.get(1).context("missing tag color column")?;
    let slug = row.get(2).context("missing tag slug column")?;
    let name = normalize_name(name);
    let color = color.trim().to_string();
    let slug = slug.trim().to_lowercase();
    if name.is_empty() || slug.is_empty() {
        anyhow::bail!("empty tag name or slug");
    }
    Ok((name, color, slug))
}

fn load_ingredients(conn: &mut PgConnection, file: &Path) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(file)
        .with_context(|| format!("failed to open {}", file.display()))?;

    let mut inserted = 0usize;
    let mut skipped = 0usize;

    for (line, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("bad CSV record at line {}", line + 1))?;
        let (name, measurement_unit) = parse_ingredient_row(&row)
            .with_context(|| format!("invalid ingredient at line {}", line + 1))?;

        let affected = diesel::insert_into(ingredients::table)
            .values(&NewIngredient {
                name: &name,
                measurement_unit: &measurement_unit,
            })
            .on_conflict_do_nothing()
            .execute(conn)?;

        if affected == 0 {
            tracing::info!(%name, %measurement_unit, "ingredient already present, skipping");
            skipped += 1;
        } else {
            inserted += 1;
        }
    }

    tracing::info!(inserted, skipped, "ingredient load complete");
    Ok(())
}

fn load_tags(conn: &mut PgConnection, file: &Path) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(file)
        .with_context(|| format!("failed to open {}", file.display()))?;

    let mut inserted = 0usize;
    let mut skipped = 0usize;

    for (line, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("bad CSV record at line {}", line + 1))?;
        let (name, color, slug) =
            parse_tag_row(&row).with_context(|| format!("invalid tag at line {}", line + 1))?;

        let color = if color.is_empty() {
            None
        } else {
            Some(color.as_str())
        };

        let affected = diesel::insert_into(tags::table)
            .values(&NewTag {
                name: &name,
                color,
                slug: &slug,
            })
            .on_conflict_do_nothing()
            .execute(conn)?;

        if affected == 0 {
            tracing::info!(%name, %slug, "tag already present, skipping");
            skipped += 1;
        } else {
            inserted += 1;
        }
    }

    tracing::info!(inserted, skipped, "tag load complete");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut conn = PgConnection::establish(&cli.database_url)
        .context("failed to connect to the database")?;

    match cli.command {
        Commands::Ingredients { file } => load_ingredients(&mut conn, &file)?,
        Commands::Tags { file } => load_tags(&mut conn, &file)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn ingredient_row_is_normalized() {
        let (name, unit) = parse_ingredient_row(&record(&["  wHOLE milk ", " ml "])).unwrap();
        assert_eq!(name, "Whole milk");
        assert_eq!(unit, "ml");
    }

    #[test]
    fn ingredient_row_rejects_blanks() {
        assert!(parse_ingredient_row(&record(&["", "g"])).is_err());
        assert!(parse_ingredient_row(&record(&["Salt", "  "])).is_err());
        assert!(parse_ingredient_row(&record(&["Salt"])).is_err());
    }

    #[test]
    fn tag_row_lowercases_slug() {
        let (name, color, slug) = parse_tag_row(&record(&["dinner", "#FF0000", "DINNER"])).unwrap();
        assert_eq!(name, "Dinner");
        assert_eq!(color, "#FF0000");
        assert_eq!(slug, "dinner");
    }

    #[test]
    fn tag_row_allows_empty_color() {
        let (_, color, _) = parse_tag_row(&record(&["lunch", "", "lunch"])).unwrap();
        assert!(color.is_empty());
    }
}
