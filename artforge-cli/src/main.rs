use artforge_core::{DEFAULT_SERVER, ForgeClient, Row};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "artforge-cli")]
#[command(about = "A CLI for the Art Forge data-to-art backend")]
struct Cli {
    /// Base URL of the backend server
    #[arg(long, default_value = DEFAULT_SERVER, global = true)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the dataset and print it as a table
    Show,
    /// Generate art from the dataset and download the image
    Generate {
        /// JSON file holding an edited row array (defaults to the dataset as served)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output image file path
        #[arg(short, long, default_value = "generated_art.png")]
        output: PathBuf,
    },
}

fn print_table(columns: &[String], rows: &[Row]) {
    println!("{}", columns.join("\t"));
    for row in rows {
        let line: Vec<String> = columns
            .iter()
            .map(|col| match row.get(col) {
                Some(value) => value.display(),
                None => String::new(),
            })
            .collect();
        println!("{}", line.join("\t"));
    }
}

fn read_rows(path: &PathBuf) -> Result<Vec<Row>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let rows: Vec<Row> = serde_json::from_str(&text)?;
    Ok(rows)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let client = ForgeClient::new(&cli.server)?;

    match cli.command {
        Commands::Show => {
            println!("Loading data from {}...", client.base_url());
            match client.load_data().await {
                Ok(table) => {
                    print_table(&table.columns, &table.rows);
                    println!("{} rows, {} columns", table.row_count(), table.columns.len());
                }
                Err(e) => {
                    eprintln!("Load failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Generate { input, output } => {
            let rows = match input {
                Some(path) => match read_rows(&path) {
                    Ok(rows) => rows,
                    Err(e) => {
                        eprintln!("Failed to read {}: {}", path.display(), e);
                        std::process::exit(1);
                    }
                },
                None => match client.load_data().await {
                    Ok(table) => table.rows,
                    Err(e) => {
                        eprintln!("Load failed: {}", e);
                        std::process::exit(1);
                    }
                },
            };

            if rows.is_empty() {
                eprintln!("No rows to generate from.");
                std::process::exit(1);
            }

            println!("Generating art from {} rows...", rows.len());
            match client.generate_art(rows).await {
                Ok(art) => {
                    println!("{}", art.message);
                    println!("Image available at: {}", art.image_url);
                }
                Err(e) => {
                    eprintln!("Generation failed: {}", e);
                    std::process::exit(1);
                }
            }

            match client.download_image(&output).await {
                Ok(()) => println!("Image saved to: {}", output.display()),
                Err(e) => {
                    eprintln!("Download failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use artforge_core::CellValue;

    #[test]
    fn rows_parse_from_json_file_shape() {
        let rows: Vec<Row> =
            serde_json::from_str(r#"[{"a": 1.5, "b": "x"}, {"a": 2, "b": "y"}]"#).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["a"], CellValue::Number(1.5));
        assert_eq!(rows[1]["b"], CellValue::Text("y".to_string()));
    }
}
