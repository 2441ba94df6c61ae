mod config;
mod output;

use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use futures::future::join_all;
use serde_json::Value;

use kubemulti_columns::{ExtractorTable, Projector, format_labels};
use kubemulti_k8s::{KubeClient, Record, ResourceDescriptor, ResourceResolver};

use crate::config::Config;
use crate::output::{OutputFormat, Table, records_from_json, write_json, write_names};

/// Kubemulti - kubectl-style resource listing across many clusters
#[derive(Parser, Debug)]
#[command(name = "kubemulti")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to <config dir>/kubemulti/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Kubeconfig file (defaults to $KUBECONFIG or ~/.kube/config)
    #[arg(long, global = true, value_name = "PATH")]
    kubeconfig: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List resources of a type in every selected context
    Get(GetArgs),

    /// Show which API resource a type name resolves to
    Resolve {
        #[arg(value_name = "TYPE")]
        resource_type: String,

        #[command(flatten)]
        contexts: ContextArgs,
    },

    /// Print a table for JSON read from a file or stdin, without a cluster
    Render {
        #[arg(value_name = "TYPE")]
        resource_type: String,

        /// JSON object or List; stdin when omitted
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        #[arg(long)]
        show_labels: bool,

        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },
}

#[derive(ClapArgs, Debug)]
struct ContextArgs {
    /// Context to query; repeat for several
    #[arg(long = "context", value_name = "CONTEXT")]
    contexts: Vec<String>,

    /// Query every context in the kubeconfig
    #[arg(long, conflicts_with = "contexts")]
    all_contexts: bool,
}

#[derive(ClapArgs, Debug)]
struct GetArgs {
    #[arg(value_name = "TYPE")]
    resource_type: String,

    #[arg(value_name = "NAME")]
    name: Option<String>,

    #[arg(short, long)]
    namespace: Option<String>,

    #[arg(short = 'A', long, conflicts_with_all = ["namespace", "name"])]
    all_namespaces: bool,

    /// Label selector, e.g. app=web
    #[arg(short = 'l', long)]
    selector: Option<String>,

    #[command(flatten)]
    contexts: ContextArgs,

    #[arg(long)]
    show_labels: bool,

    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = run(args).await;

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let projector = Projector::new(config.column_registry(), ExtractorTable::builtin());

    match args.command {
        Command::Get(get) => {
            let kube = open_kubeconfig(args.kubeconfig.as_ref(), &config)?;
            run_get(&kube, &config, &projector, &get).await
        }
        Command::Resolve {
            resource_type,
            contexts,
        } => {
            let kube = open_kubeconfig(args.kubeconfig.as_ref(), &config)?;
            run_resolve(&kube, &config, &resource_type, &contexts).await
        }
        Command::Render {
            resource_type,
            file,
            show_labels,
            output,
        } => run_render(&projector, &resource_type, file.as_ref(), show_labels, output),
    }
}

fn open_kubeconfig(explicit: Option<&PathBuf>, config: &Config) -> Result<KubeClient> {
    let client = match explicit.or(config.kubeconfig.as_ref()) {
        Some(path) => KubeClient::from_path(path),
        None => KubeClient::new(),
    };
    Ok(client?)
}

/// Contexts to query: flags, then config, then the current context
fn select_contexts(kube: &KubeClient, args: &ContextArgs, config: &Config) -> Result<Vec<String>> {
    if args.all_contexts {
        return Ok(kube.get_contexts().into_iter().map(|c| c.name).collect());
    }
    if !args.contexts.is_empty() {
        return Ok(args.contexts.clone());
    }
    if !config.contexts.is_empty() {
        return Ok(config.contexts.clone());
    }
    kube.current_context()
        .map(|c| vec![c.to_string()])
        .context("No context selected and the kubeconfig has no current context")
}

/// What one context returned for a `get`
struct Listing {
    descriptor: ResourceDescriptor,
    records: Vec<Record>,
}

async fn fetch_listing(
    kube: &KubeClient,
    resolver: &ResourceResolver,
    context: &str,
    namespace: Option<&str>,
    get: &GetArgs,
) -> Result<Listing> {
    let client = kube.client_for_context(context).await?;
    let catalog = kube.discover(&client).await;
    let descriptor = resolver
        .resolve(&catalog, &get.resource_type)
        .with_context(|| format!("Failed to resolve resource type '{}'", get.resource_type))?;

    tracing::debug!(%context, %descriptor, ?namespace, "Listing");

    let records = match &get.name {
        Some(name) => vec![kube.get_record(&client, &descriptor, namespace, name).await?],
        None => {
            kube.list_records(&client, &descriptor, namespace, get.selector.as_deref())
                .await?
        }
    };

    Ok(Listing {
        descriptor,
        records,
    })
}

async fn run_get(
    kube: &KubeClient,
    config: &Config,
    projector: &Projector,
    get: &GetArgs,
) -> Result<()> {
    let contexts = select_contexts(kube, &get.contexts, config)?;
    let context_namespaces: HashMap<String, Option<String>> = kube
        .get_contexts()
        .into_iter()
        .map(|c| (c.name, c.namespace))
        .collect();
    let resolver = ResourceResolver::default();

    let namespace_for = |context: &str| -> Option<String> {
        if get.all_namespaces {
            return None;
        }
        get.namespace
            .clone()
            .or_else(|| config.namespace.clone())
            .or_else(|| context_namespaces.get(context).cloned().flatten())
            .or_else(|| Some("default".to_string()))
    };

    let results = join_all(contexts.iter().map(|context| {
        let namespace = namespace_for(context);
        let resolver = &resolver;
        async move {
            let listing =
                fetch_listing(kube, resolver, context, namespace.as_deref(), get).await;
            (context.as_str(), listing)
        }
    }))
    .await;

    let mut listings = Vec::new();
    let mut failures = 0;
    for (context, result) in results {
        match result {
            Ok(listing) => listings.push((context, listing)),
            Err(e) => {
                failures += 1;
                eprintln!("error: context {context}: {e:#}");
            }
        }
    }

    if listings.is_empty() && failures > 0 {
        anyhow::bail!("All {failures} context(s) failed");
    }

    let mut stdout = std::io::stdout().lock();
    match get.output {
        OutputFormat::Json => {
            let records = listings.iter().flat_map(|(_, l)| &l.records);
            return write_json(&mut stdout, records).context("Failed to write output");
        }
        OutputFormat::Name => {
            for (_, listing) in &listings {
                write_names(&mut stdout, &listing.descriptor, &listing.records)
                    .context("Failed to write output")?;
            }
            return Ok(());
        }
        OutputFormat::Table => {}
    }

    let Some((_, first)) = listings.first() else {
        return Ok(());
    };
    let layout = Layout {
        projector,
        resource: first.descriptor.resource.clone(),
        namespaced: listings.iter().any(|(_, l)| l.descriptor.namespaced),
        show_labels: get.show_labels,
        now: Utc::now(),
    };

    let mut table = Table::new(layout.header(true));
    for (context, listing) in &listings {
        for record in &listing.records {
            table.push(layout.row(Some(context), record));
        }
    }

    if table.is_empty() {
        eprintln!("No resources found.");
        return Ok(());
    }

    table
        .write_to(&mut stdout)
        .context("Failed to write output")
}

async fn run_resolve(
    kube: &KubeClient,
    config: &Config,
    resource_type: &str,
    args: &ContextArgs,
) -> Result<()> {
    let contexts = select_contexts(kube, args, config)?;
    let resolver = ResourceResolver::default();

    let results = join_all(contexts.iter().map(|context| {
        let resolver = &resolver;
        async move {
            let resolved: Result<ResourceDescriptor> = async {
                let client = kube.client_for_context(context).await?;
                let catalog = kube.discover(&client).await;
                Ok(resolver.resolve(&catalog, resource_type)?)
            }
            .await;
            (context.as_str(), resolved)
        }
    }))
    .await;

    let mut table = Table::new(["CONTEXT", "RESOURCE", "API VERSION", "NAMESPACED"]);
    let mut failures = 0;
    for (context, result) in results {
        match result {
            Ok(descriptor) => table.push(vec![
                context.to_string(),
                descriptor.to_string(),
                descriptor.api_version(),
                descriptor.namespaced.to_string(),
            ]),
            Err(e) => {
                failures += 1;
                eprintln!("error: context {context}: {e:#}");
            }
        }
    }

    if table.is_empty() && failures > 0 {
        anyhow::bail!("All {failures} context(s) failed");
    }

    table
        .write_to(&mut std::io::stdout().lock())
        .context("Failed to write output")
}

fn run_render(
    projector: &Projector,
    resource_type: &str,
    file: Option<&PathBuf>,
    show_labels: bool,
    output: OutputFormat,
) -> Result<()> {
    let input = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let value: Value = serde_json::from_str(&input).context("Input is not valid JSON")?;
    let records = records_from_json(value);

    // Without a cluster only the static tables are available
    let catalog: Vec<kubemulti_k8s::APIResourceList> = Vec::new();
    let descriptor = kubemulti_k8s::resolve(&catalog, resource_type)?;

    let mut stdout = std::io::stdout().lock();
    match output {
        OutputFormat::Json => {
            return write_json(&mut stdout, &records).context("Failed to write output");
        }
        OutputFormat::Name => {
            return write_names(&mut stdout, &descriptor, &records)
                .context("Failed to write output");
        }
        OutputFormat::Table => {}
    }

    let layout = Layout {
        projector,
        resource: descriptor.resource,
        namespaced: descriptor.namespaced,
        show_labels,
        now: Utc::now(),
    };

    let mut table = Table::new(layout.header(false));
    for record in &records {
        table.push(layout.row(None, record));
    }

    table
        .write_to(&mut stdout)
        .context("Failed to write output")
}

/// Table shape for one resource type
struct Layout<'a> {
    projector: &'a Projector,
    resource: String,
    namespaced: bool,
    show_labels: bool,
    now: DateTime<Utc>,
}

impl Layout<'_> {
    fn header(&self, with_context: bool) -> Vec<String> {
        let mut header = Vec::new();
        if with_context {
            header.push("CONTEXT".to_string());
        }
        if self.namespaced {
            header.push("NAMESPACE".to_string());
        }
        header.push("NAME".to_string());
        header.extend(
            self.projector
                .header(&self.resource)
                .into_iter()
                .map(str::to_string),
        );
        if self.show_labels {
            header.push("LABELS".to_string());
        }
        header
    }

    fn row(&self, context: Option<&str>, record: &Record) -> Vec<String> {
        let mut row = Vec::new();
        if let Some(context) = context {
            row.push(context.to_string());
        }
        if self.namespaced {
            row.push(record.namespace().unwrap_or("").to_string());
        }
        row.push(record.name().unwrap_or("<unknown>").to_string());
        row.extend(self.projector.row_at(&self.resource, record, self.now));
        if self.show_labels {
            row.push(format_labels(record.labels()));
        }
        row
    }
}
