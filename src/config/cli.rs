use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "case-resolver")]
#[command(about = "Resolve census cases and request fulfilments")]
pub struct CliArgs {
    #[arg(long, default_value = "./config/case-resolver.toml")]
    pub config: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Cases at a unique property reference number
    Uprn {
        uprn: String,
        #[arg(long)]
        valid_address_only: bool,
    },
    /// Case by case id
    CaseId { case_id: String },
    /// Case by numeric case reference
    Reference { case_ref: i64 },
    /// Case linked to a questionnaire id
    Qid { qid: String },
    /// CCS cases at a postcode
    CcsPostcode { postcode: String },
    /// Whether a case id exists
    Exists { case_id: String },
    /// CCS questionnaire link for a case id
    CcsQid { case_id: String },
    /// Publish a fulfilment requested event
    Fulfilment {
        #[arg(long)]
        case_id: String,
        #[arg(long)]
        fulfilment_code: String,
        #[arg(long)]
        individual_case_id: Option<String>,
        #[arg(long)]
        uac: String,
        #[arg(long)]
        qid: String,
    },
}
