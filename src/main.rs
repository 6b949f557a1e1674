use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use invoice_draft::currency::CURRENCY_OPTIONS;
use invoice_draft::draft::SavedInvoiceData;
use invoice_draft::workflow::{InvoiceStatus, SubmitState};
use invoice_draft::{init_logging, ArtifactWorkflow, BackendConfig, InvoiceDraft};

#[derive(Parser)]
#[command(name = "invoice-draft", version, about = "Edit, price and render invoice drafts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the totals breakdown of a saved draft
    Totals {
        /// Invoice `data` document (JSON)
        draft: PathBuf,
    },
    /// Generate the PDF and write it to the download directory
    Download { draft: PathBuf },
    /// Render a preview and write it next to the downloads
    Preview {
        draft: PathBuf,
        /// Where to write the preview (defaults to the download directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Validate and save the draft
    Save {
        draft: PathBuf,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        client: Option<String>,
    },
    /// Save, then download regardless of the save result
    Submit {
        draft: PathBuf,
        #[arg(long)]
        user: Option<String>,
    },
    /// Change the status of a saved invoice
    Status {
        invoice_id: String,
        /// draft, sent, paid, overdue or cancelled
        status: InvoiceStatus,
        #[arg(long)]
        user: Option<String>,
    },
    /// Delete a saved invoice
    Delete {
        invoice_id: String,
        #[arg(long)]
        user: Option<String>,
    },
    /// Upload a logo image and print its hosted URL
    UploadLogo { file: PathBuf },
    /// List supported currencies
    Currencies,
}

fn load_draft(path: &Path) -> anyhow::Result<InvoiceDraft> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let data: SavedInvoiceData =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(InvoiceDraft::from_saved(data))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    if let Commands::Currencies = cli.command {
        for option in CURRENCY_OPTIONS {
            println!("{:<4} {:<4} {}", option.code, option.symbol, option.label);
        }
        return Ok(());
    }

    let config = BackendConfig::from_env().context("loading configuration")?;

    match cli.command {
        Commands::Totals { draft } => {
            let draft = load_draft(&draft)?;
            let totals = draft.totals(config.total_policy);
            let currency = &draft.currency;
            println!("Subtotal  {}", currency.format_amount(totals.subtotal));
            if draft.discount.enabled() {
                println!("Discount -{}", currency.format_amount(totals.discount));
            }
            if draft.tax.enabled() {
                println!("Tax       {}", currency.format_amount(totals.tax));
            }
            if draft.shipping.enabled() {
                println!("Shipping  {}", currency.format_amount(totals.shipping));
            }
            println!("Total     {}", currency.format_amount(totals.total));
        }
        Commands::Download { draft } => {
            let workflow = ArtifactWorkflow::from_config(&config)?;
            let draft = load_draft(&draft)?;
            let path = workflow
                .request_download(&draft)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Invoice downloaded to {}", path.display());
        }
        Commands::Preview { draft, out } => {
            let workflow = ArtifactWorkflow::from_config(&config)?;
            let draft = load_draft(&draft)?;
            let handle = workflow
                .request_preview(&draft)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            let artifact = handle.artifact();
            let path = out.unwrap_or_else(|| {
                config
                    .download_dir
                    .join(format!("preview.{}", artifact.kind.extension()))
            });
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &artifact.data).with_context(|| format!("writing {}", path.display()))?;
            println!("Preview ({}) written to {}", artifact.mime_type(), path.display());
            handle.release();
        }
        Commands::Save { draft, user, client } => {
            let workflow = ArtifactWorkflow::from_config(&config)?;
            let draft = load_draft(&draft)?;
            let outcome = workflow
                .save_draft_for_client(&draft, user.as_deref(), client.as_deref())
                .await;
            println!("{}", outcome.message());
            if !outcome.is_saved() {
                bail!("invoice not saved");
            }
        }
        Commands::Submit { draft, user } => {
            let workflow = ArtifactWorkflow::from_config(&config)?;
            let draft = load_draft(&draft)?;
            let outcome = workflow.submit(&draft, user.as_deref()).await;
            println!("{}", outcome.message());
            if outcome.state() == SubmitState::Failed {
                bail!("download failed");
            }
        }
        Commands::Status { invoice_id, status, user } => {
            let workflow = ArtifactWorkflow::from_config(&config)?;
            workflow
                .update_status(&invoice_id, status, user.as_deref())
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Invoice {} marked {}", invoice_id, status.as_str());
        }
        Commands::Delete { invoice_id, user } => {
            let workflow = ArtifactWorkflow::from_config(&config)?;
            workflow
                .delete_invoice(&invoice_id, user.as_deref())
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Invoice {} deleted", invoice_id);
        }
        Commands::UploadLogo { file } => {
            let workflow = ArtifactWorkflow::from_config(&config)?;
            let data = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let filename = file
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("logo");
            let url = workflow
                .upload_logo(filename, data)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("{}", url);
        }
        Commands::Currencies => {}
    }

    Ok(())
}
