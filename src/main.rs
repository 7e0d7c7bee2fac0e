use anyhow::Context;
use case_resolver::utils::{logger, validation::Validate};
use case_resolver::utils::error::ErrorCategory;
use case_resolver::{
    CaseApiError, CaseService, CliArgs, Command, Dataset, FulfilmentService, HttpEventPublisher,
    TomlConfig, UacQidCreated,
};
use clap::Parser;
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn exit_code(error: &CaseApiError) -> i32 {
    match error.category() {
        ErrorCategory::NotFound => 2,
        ErrorCategory::InvalidInput => 3,
        ErrorCategory::Transport => 4,
        ErrorCategory::Storage | ErrorCategory::Configuration => 1,
    }
}

async fn send_fulfilment(
    config: &TomlConfig,
    case_id: String,
    fulfilment_code: String,
    individual_case_id: Option<String>,
    uac: String,
    qid: String,
) -> anyhow::Result<()> {
    let publisher = HttpEventPublisher::new(
        &config.publisher.endpoint,
        config.publisher.vhost(),
        &config.publisher.username,
        &config.publisher.password,
        config.publisher.timeout(),
    )?;
    let service = FulfilmentService::from_config(publisher, config);

    let uac_qid_created = UacQidCreated {
        uac,
        qid,
        case_id: Some(case_id.clone()),
    };
    service
        .build_and_send_fulfilment_request(
            &case_id,
            &fulfilment_code,
            individual_case_id.as_deref(),
            uac_qid_created,
        )
        .await?;

    tracing::info!(
        "Fulfilment request published to {}",
        service.destination().exchange
    );
    Ok(())
}

async fn lookup(config: &TomlConfig, command: Command) -> anyhow::Result<()> {
    let fixture_path = config.fixture_path()?;
    let (case_store, link_store) = Dataset::from_file(fixture_path)
        .with_context(|| format!("loading fixtures from {}", fixture_path))?
        .into_stores()?;
    let service = CaseService::new(case_store, link_store);

    match command {
        Command::Uprn {
            uprn,
            valid_address_only,
        } => print_json(&service.find_by_uprn(&uprn, valid_address_only).await?),
        Command::CaseId { case_id } => print_json(&service.find_by_case_id(&case_id).await?),
        Command::Reference { case_ref } => {
            print_json(&service.find_by_reference(case_ref).await?)
        }
        Command::Qid { qid } => print_json(&service.find_case_by_qid(&qid).await?),
        Command::CcsPostcode { postcode } => {
            print_json(&service.find_ccs_cases_by_postcode(&postcode).await?)
        }
        Command::Exists { case_id } => print_json(&service.case_exists(&case_id).await?),
        Command::CcsQid { case_id } => {
            print_json(&service.find_ccs_link_by_case_id(&case_id).await?)
        }
        Command::Fulfilment { .. } => anyhow::bail!("fulfilment is not a lookup command"),
    }
}

async fn run(args: CliArgs, config: TomlConfig) -> anyhow::Result<()> {
    match args.command {
        Command::Fulfilment {
            case_id,
            fulfilment_code,
            individual_case_id,
            uac,
            qid,
        } => {
            send_fulfilment(
                &config,
                case_id,
                fulfilment_code,
                individual_case_id,
                uac,
                qid,
            )
            .await
        }
        command => lookup(&config, command).await,
    }
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let config = match TomlConfig::from_file(&args.config).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    logger::init_logger(args.verbose, config.log_format());
    tracing::info!("Starting case-resolver");
    tracing::debug!("Command: {:?}", args.command);

    if let Err(e) = run(args, config).await {
        let code = match e.downcast_ref::<CaseApiError>() {
            Some(case_error) => {
                tracing::error!(
                    "❌ Request failed: {} (Category: {:?}, Status: {})",
                    case_error,
                    case_error.category(),
                    case_error.status_code()
                );
                exit_code(case_error)
            }
            None => {
                tracing::error!("❌ Request failed: {:#}", e);
                1
            }
        };

        eprintln!("❌ {:#}", e);
        std::process::exit(code);
    }
}
